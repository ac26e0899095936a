//! Project-level converter configuration loaded from JSON or YAML.
//!
//! Externalizes the project-specific knobs (spec URL, base URL, output
//! layout, public endpoints, per-endpoint body tweaks, credential field
//! names) so they live next to the project instead of being hardcoded.
//! JSON is valid YAML, so both `config.json` and `config.yaml` load through
//! the same parser.
//!
//! # File format
//!
//! ```json
//! {
//!   "openapi_url": "http://localhost:8000/openapi.json",
//!   "base_url": "http://localhost:8000",
//!   "output_collection": "postman_collection.json",
//!
//!   "auth_policy": "allowlist",
//!   "public_paths": ["/common/signup", "/common/login", "/common/verify", "/"],
//!   "roles": ["Admin", "Teacher", "Student"],
//!
//!   "body_overrides": {
//!     "/common/verify": { "mobile": "{{mobile}}", "otp": "1234" }
//!   },
//!   "field_injectors": {
//!     "/common/verify": { "variable": "mobile", "field": "mobile", "defaults": { "otp": "1234" } }
//!   },
//!   "request_captures": [
//!     { "path": "/common/login", "field": "mobile", "variable": "mobile" }
//!   ],
//!   "credentials": {
//!     "token_fields": ["access_token", "token", "accessToken"],
//!     "wrappers": ["data", "result"],
//!     "token_lifetime_hours": 24
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::convert::AuthPolicy;
use crate::error::{Error, Result};

/// Configuration file name read from the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Endpoints reachable without a bearer token.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/common/signup",
    "/common/login",
    "/common/verify",
    "/",
    "/docs",
    "/openapi.json",
    "/redoc",
];

/// Role labels that each get their own environment.
pub const DEFAULT_ROLES: &[&str] = &["Admin", "Teacher", "Student"];

const VERIFY_PATH: &str = "/common/verify";
const LOGIN_PATH: &str = "/common/login";
const MOBILE: &str = "mobile";
const DEFAULT_OTP: &str = "1234";

/// Project-level converter config.
///
/// Loaded from a file via [`ProjectConfig::load`], then applied to a
/// [`ConvertConfig`](crate::ConvertConfig) via
/// [`ConvertConfig::with_project_config`](crate::ConvertConfig::with_project_config).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Where to fetch the `OpenAPI` document (URL or local file path).
    pub openapi_url: Option<String>,

    /// Base URL stored in the collection and environment `base_url` variables.
    pub base_url: Option<String>,

    /// File name of the generated collection.
    pub output_collection: String,

    /// Root output directory.
    pub output_dir: PathBuf,

    /// Nest outputs under a folder named after the sanitized API title.
    pub project_subdir: bool,

    /// Environment file name stem (`<stem>_<role>.json`, or `<stem>.json`).
    pub environment_file_stem: String,

    /// Which endpoints get an explicit bearer auth block.
    pub auth_policy: AuthPolicy,

    /// Public endpoint paths for the allowlist policy and the token-check hook.
    pub public_paths: Vec<String>,

    /// Role labels; an empty list produces a single flat environment.
    pub roles: Vec<String>,

    /// Per-endpoint field overrides applied to synthesized request bodies.
    pub body_overrides: BTreeMap<String, Map<String, Value>>,

    /// Per-endpoint pre-request scripts injecting a stored variable into the body.
    pub field_injectors: BTreeMap<String, FieldInjector>,

    /// Request body fields stored into the environment after a successful call.
    pub request_captures: Vec<RequestCapture>,

    /// Response field names scanned by the credential-capture hook.
    pub credentials: CredentialFields,

    /// Maximum schema nesting depth followed by the example synthesizer.
    pub max_depth: usize,
}

/// Pre-request hook that copies an environment variable into a body field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInjector {
    /// Environment variable to read.
    pub variable: String,
    /// Top-level body field to overwrite.
    pub field: String,
    /// Fields filled in when the body is missing, malformed, or lacks them.
    #[serde(default)]
    pub defaults: Map<String, Value>,
}

/// A request body field captured into the environment after a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCapture {
    /// URL fragment identifying the request (substring match).
    pub path: String,
    /// Top-level field of the outgoing JSON body.
    pub field: String,
    /// Environment variable to store the value in.
    pub variable: String,
}

/// Field names scanned in successful responses.
///
/// Each list is checked at the top level of the response first, then one
/// level inside each wrapper object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CredentialFields {
    /// Candidate access-token fields.
    pub token_fields: Vec<String>,
    /// Candidate role fields.
    pub role_fields: Vec<String>,
    /// Candidate user-identifier fields.
    pub user_id_fields: Vec<String>,
    /// Wrapper objects searched one level deep.
    pub wrappers: Vec<String>,
    /// Lifetime assumed for a freshly captured token.
    pub token_lifetime_hours: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            openapi_url: None,
            base_url: None,
            output_collection: "postman_collection.json".to_string(),
            output_dir: PathBuf::from("JSON"),
            project_subdir: true,
            environment_file_stem: "postman_environment".to_string(),
            auth_policy: AuthPolicy::default(),
            public_paths: strings(DEFAULT_PUBLIC_PATHS),
            roles: strings(DEFAULT_ROLES),
            body_overrides: default_body_overrides(),
            field_injectors: default_field_injectors(),
            request_captures: default_request_captures(),
            credentials: CredentialFields::default(),
            max_depth: crate::convert::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for CredentialFields {
    fn default() -> Self {
        Self {
            token_fields: strings(&["access_token", "token", "accessToken"]),
            role_fields: strings(&["role"]),
            user_id_fields: strings(&["user_id"]),
            wrappers: strings(&["data", "result"]),
            token_lifetime_hours: 24,
        }
    }
}

/// Verify endpoint: send the stored mobile template and a fixed test OTP.
pub(crate) fn default_body_overrides() -> BTreeMap<String, Map<String, Value>> {
    let mut fields = Map::new();
    fields.insert(MOBILE.to_string(), Value::from("{{mobile}}"));
    fields.insert("otp".to_string(), Value::from(DEFAULT_OTP));
    BTreeMap::from([(VERIFY_PATH.to_string(), fields)])
}

/// Verify endpoint: inject the mobile number captured at login.
pub(crate) fn default_field_injectors() -> BTreeMap<String, FieldInjector> {
    let mut defaults = Map::new();
    defaults.insert("otp".to_string(), Value::from(DEFAULT_OTP));
    BTreeMap::from([(
        VERIFY_PATH.to_string(),
        FieldInjector {
            variable: MOBILE.to_string(),
            field: MOBILE.to_string(),
            defaults,
        },
    )])
}

/// Login endpoint: remember the mobile number that was sent.
pub(crate) fn default_request_captures() -> Vec<RequestCapture> {
    vec![RequestCapture {
        path: LOGIN_PATH.to_string(),
        field: MOBILE.to_string(),
        variable: MOBILE.to_string(),
    }]
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl ProjectConfig {
    /// Load config from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// The configured spec location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if `openapi_url` is absent or blank.
    pub fn openapi_url(&self) -> Result<&str> {
        required(self.openapi_url.as_deref(), "openapi_url")
    }

    /// The configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if `base_url` is absent or blank.
    pub fn base_url(&self) -> Result<&str> {
        required(self.base_url.as_deref(), "base_url")
    }

    /// Check every key needed for a full run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] for the first missing key.
    pub fn validate(&self) -> Result<()> {
        self.openapi_url()?;
        self.base_url()?;
        if self.output_collection.trim().is_empty() {
            return Err(Error::MissingConfig {
                key: "output_collection",
            });
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingConfig { key })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserialize_defaults() {
        let config: ProjectConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert!(config.openapi_url.is_none());
        assert_eq!(config.output_collection, "postman_collection.json");
        assert_eq!(config.output_dir, PathBuf::from("JSON"));
        assert!(config.project_subdir);
        assert_eq!(config.auth_policy, AuthPolicy::Allowlist);
        assert_eq!(config.public_paths.len(), 7);
        assert_eq!(config.roles, vec!["Admin", "Teacher", "Student"]);
        assert!(config.body_overrides.contains_key("/common/verify"));
        assert_eq!(config.field_injectors["/common/verify"].variable, "mobile");
        assert_eq!(config.request_captures[0].path, "/common/login");
        assert_eq!(config.credentials.token_lifetime_hours, 24);
    }

    #[test]
    fn deserialize_json_config() {
        let json = r#"{
            "openapi_url": "http://localhost:8000/openapi.json",
            "base_url": "http://localhost:8000",
            "output_collection": "api.postman_collection.json",
            "auth_policy": "declarative",
            "roles": [],
            "body_overrides": {"/otp": {"code": "0000"}},
            "credentials": {"token_fields": ["jwt"]}
        }"#;
        let config: ProjectConfig = serde_yaml_ng::from_str(json).unwrap();
        assert_eq!(config.openapi_url().unwrap(), "http://localhost:8000/openapi.json");
        assert_eq!(config.base_url().unwrap(), "http://localhost:8000");
        assert_eq!(config.output_collection, "api.postman_collection.json");
        assert_eq!(config.auth_policy, AuthPolicy::Declarative);
        assert!(config.roles.is_empty());
        assert_eq!(config.body_overrides["/otp"]["code"], "0000");
        assert!(!config.body_overrides.contains_key("/common/verify"));
        assert_eq!(config.credentials.token_fields, vec!["jwt"]);
        // Other credential lists keep defaults
        assert_eq!(config.credentials.wrappers, vec!["data", "result"]);
    }

    #[test]
    fn validate_reports_missing_keys_in_order() {
        let config = ProjectConfig::default();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfig { key: "openapi_url" })
        ));

        let config = ProjectConfig {
            openapi_url: Some("http://x/openapi.json".to_string()),
            base_url: Some("   ".to_string()),
            ..ProjectConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfig { key: "base_url" })
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("openapi-postman-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"openapi_url": "spec.yaml", "base_url": "http://api.local"}"#,
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.openapi_url.as_deref(), Some("spec.yaml"));
        config.validate().unwrap();

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = ProjectConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn load_malformed_file_returns_error() {
        let dir = std::env::temp_dir().join("openapi-postman-config-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"base_url": [[["#).unwrap();

        let result = ProjectConfig::load(&path);
        assert!(matches!(result, Err(Error::Yaml(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
