//! Writing the collection and environments to disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::convert::Conversion;
use crate::document::SpecDocument;
use crate::error::Result;

/// Folder name used when a title sanitizes to nothing.
pub const FALLBACK_FOLDER_NAME: &str = "API_Project";

/// Turn an API title into a directory name.
///
/// Alphanumerics, `-` and `_` are kept; spaces and everything else become
/// `_`; leading and trailing `_` are trimmed.
#[must_use]
pub fn project_folder_name(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_FOLDER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Directory the outputs for `title` go into.
#[must_use]
pub fn output_dir(config: &ProjectConfig, title: &str) -> PathBuf {
    if config.project_subdir {
        config.output_dir.join(project_folder_name(title))
    } else {
        config.output_dir.clone()
    }
}

/// Directory the outputs for `doc` go into.
///
/// A document without `info.title` uses [`FALLBACK_FOLDER_NAME`].
#[must_use]
pub fn document_output_dir(config: &ProjectConfig, doc: &SpecDocument) -> PathBuf {
    output_dir(config, doc.declared_title().unwrap_or(FALLBACK_FOLDER_NAME))
}

/// Write the collection and every environment into `dir`.
///
/// Creates `dir` if needed and returns the written paths, collection first.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written. Files written before the failure are left in place.
pub fn write_outputs(
    conversion: &Conversion,
    dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(conversion.environments.len() + 1);
    let collection_path = dir.join(&config.output_collection);
    write_json(&collection_path, &conversion.collection)?;
    written.push(collection_path);

    for generated in &conversion.environments {
        let path = dir.join(generated.file_name(&config.environment_file_stem));
        write_json(&path, &generated.environment)?;
        written.push(path);
    }
    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::{convert_str, ConvertConfig};

    #[test]
    fn folder_name_sanitizing() {
        assert_eq!(project_folder_name("My Shop API"), "My_Shop_API");
        assert_eq!(project_folder_name("Billing (v2) / Admin"), "Billing__v2____Admin");
        assert_eq!(project_folder_name("  spaced-out_name  "), "spaced-out_name");
        assert_eq!(project_folder_name("***"), FALLBACK_FOLDER_NAME);
        assert_eq!(project_folder_name(""), FALLBACK_FOLDER_NAME);
    }

    #[test]
    fn output_dir_respects_subdir_flag() {
        let mut config = ProjectConfig::default();
        assert_eq!(output_dir(&config, "Shop API"), PathBuf::from("JSON/Shop_API"));
        config.project_subdir = false;
        assert_eq!(output_dir(&config, "Shop API"), PathBuf::from("JSON"));
    }

    #[test]
    fn untitled_document_uses_fallback_folder() {
        let config = ProjectConfig::default();
        let untitled = SpecDocument::parse(r#"{"info": {"version": "1"}, "paths": {}}"#).unwrap();
        assert_eq!(
            document_output_dir(&config, &untitled),
            PathBuf::from("JSON").join(FALLBACK_FOLDER_NAME)
        );

        let titled = SpecDocument::parse("info:\n  title: Shop API\npaths: {}\n").unwrap();
        assert_eq!(document_output_dir(&config, &titled), PathBuf::from("JSON/Shop_API"));
    }

    #[test]
    fn writes_collection_then_environments() {
        let conversion = convert_str(
            r#"{"info": {"title": "Out"}, "paths": {"/a": {"get": {}}}}"#,
            &ConvertConfig::new("http://x"),
        )
        .unwrap();
        let dir = std::env::temp_dir().join("openapi_postman_output_test");
        let config = ProjectConfig::default();

        let written = write_outputs(&conversion, &dir, &config).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "postman_collection.json",
                "postman_environment_admin.json",
                "postman_environment_teacher.json",
                "postman_environment_student.json",
            ]
        );

        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.starts_with("{\n  \"info\""));
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed["info"]["name"], "Out");

        std::fs::remove_dir_all(&dir).ok();
    }
}
