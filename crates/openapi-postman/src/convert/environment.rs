//! Postman environments that pair with a generated collection.

use postman_core::{EnvVariable, Environment};

use super::ConvertConfig;
use crate::document::SpecDocument;

/// Value written to `_postman_exported_using`.
pub const EXPORTED_USING: &str = "OpenAPI to Postman Converter";

/// Id of the environment generated when no roles are configured.
pub const FLAT_ENVIRONMENT_ID: &str = "auto-generated-env";

const ENVIRONMENT_SCOPE: &str = "environment";

/// Keys the hooks manage themselves; captured variables never shadow them.
const RESERVED_KEYS: &[&str] = &["base_url", "access_token", "token_expiry", "user_id", "role"];

/// An environment and the role it was generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEnvironment {
    /// Role name, or `None` for the single flat environment.
    pub role: Option<String>,
    /// The environment document.
    pub environment: Environment,
}

impl GeneratedEnvironment {
    /// Output file name: `<stem>_<role>.json`, or `<stem>.json` when flat.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        match &self.role {
            Some(role) => format!("{stem}_{}.json", role.to_lowercase()),
            None => format!("{stem}.json"),
        }
    }
}

/// One environment per configured role, or a single flat one.
pub(crate) fn generate(doc: &SpecDocument, config: &ConvertConfig) -> Vec<GeneratedEnvironment> {
    let title = doc.title();
    if config.roles.is_empty() {
        let values = variables(config, None);
        return vec![GeneratedEnvironment {
            role: None,
            environment: environment(
                FLAT_ENVIRONMENT_ID.to_string(),
                format!("{title} Environment"),
                values,
                config,
            ),
        }];
    }

    config
        .roles
        .iter()
        .map(|role| {
            let id = format!("{FLAT_ENVIRONMENT_ID}-{}", role.to_lowercase());
            let name = format!("{title} Environment ({role})");
            GeneratedEnvironment {
                role: Some(role.clone()),
                environment: environment(id, name, variables(config, Some(role)), config),
            }
        })
        .collect()
}

fn environment(
    id: String,
    name: String,
    values: Vec<EnvVariable>,
    config: &ConvertConfig,
) -> Environment {
    Environment {
        id,
        name,
        values,
        variable_scope: ENVIRONMENT_SCOPE.to_string(),
        exported_at: config.exported_at.clone(),
        exported_using: EXPORTED_USING.to_string(),
    }
}

fn variables(config: &ConvertConfig, role: Option<&str>) -> Vec<EnvVariable> {
    let mut values = vec![
        EnvVariable::new("base_url", config.base_url()),
        EnvVariable::secret("access_token", ""),
        EnvVariable::new("token_expiry", ""),
        EnvVariable::new("user_id", ""),
    ];
    if let Some(role) = role {
        values.push(EnvVariable::new("role", &role.to_lowercase()));
    }

    let captured = config
        .request_captures
        .iter()
        .map(|capture| capture.variable.as_str())
        .chain(config.field_injectors.values().map(|i| i.variable.as_str()));
    for key in captured {
        if RESERVED_KEYS.contains(&key) || values.iter().any(|v| v.key == key) {
            continue;
        }
        values.push(EnvVariable::new(key, ""));
    }
    values
}
