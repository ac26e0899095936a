//! `OpenAPI` → Postman conversion pipeline.
//!
//! The pipeline is read-only over the input document:
//! - [`example`]: JSON example bodies synthesized from schemas
//! - [`endpoint`]: operations described and mapped to request items
//! - [`auth`]: per-request auth policy
//! - [`scripts`]: collection and request hooks that propagate credentials
//! - [`collection`]: request items grouped into folders
//! - [`environment`]: environments that pair with the collection

mod auth;
mod collection;
mod endpoint;
mod environment;
mod example;
mod helpers;
mod scripts;

use std::collections::BTreeMap;

use postman_core::Collection;
use serde_json::{Map, Value};

pub use auth::{is_public_path, AuthPolicy};
pub use collection::{DEFAULT_COLLECTION_DESCRIPTION, DEFAULT_COLLECTION_NAME, EXPORTER_ID};
pub use endpoint::{
    apply_body_overrides, Endpoint, EndpointMapper, HttpMethod, ParamLocation, Parameter,
    BASE_URL_VARIABLE, DEFAULT_GROUP,
};
pub use environment::{GeneratedEnvironment, EXPORTED_USING, FLAT_ENVIRONMENT_ID};
pub use example::{SchemaType, Synthesizer, DEFAULT_MAX_DEPTH};
pub use helpers::for_each_operation;

use crate::config::{
    default_body_overrides, default_field_injectors, default_request_captures, strings,
    CredentialFields, FieldInjector, RequestCapture, DEFAULT_PUBLIC_PATHS, DEFAULT_ROLES,
};
use crate::document::SpecDocument;
use crate::error;

/// Configuration for the conversion pipeline.
///
/// Construct with [`ConvertConfig::new`] and configure via
/// [`with_project_config`](Self::with_project_config) (file-based) or
/// individual builder methods (programmatic).
///
/// # Example
///
/// ```ignore
/// let config = ConvertConfig::new("http://localhost:8000")
///     .auth_policy(AuthPolicy::Declarative)
///     .roles(&["Admin", "Viewer"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Value of the `base_url` collection and environment variable.
    base_url: String,

    /// How per-request auth is decided.
    auth_policy: AuthPolicy,

    /// Paths that never need a token under [`AuthPolicy::Allowlist`].
    public_paths: Vec<String>,

    /// Fixed example-body values, keyed by path.
    body_overrides: BTreeMap<String, Map<String, Value>>,

    /// Request-level hooks that fill bodies from the environment, keyed by path.
    field_injectors: BTreeMap<String, FieldInjector>,

    /// Request fields remembered after a successful response.
    request_captures: Vec<RequestCapture>,

    /// Response fields scanned for credentials.
    credentials: CredentialFields,

    /// One environment per role; empty means a single flat environment.
    roles: Vec<String>,

    /// Example synthesis recursion limit.
    max_depth: usize,

    /// `_postman_exported_at` for generated environments.
    exported_at: String,
}

impl ConvertConfig {
    /// Create a config with default settings for the given server root.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth_policy: AuthPolicy::default(),
            public_paths: strings(DEFAULT_PUBLIC_PATHS),
            body_overrides: default_body_overrides(),
            field_injectors: default_field_injectors(),
            request_captures: default_request_captures(),
            credentials: CredentialFields::default(),
            roles: strings(DEFAULT_ROLES),
            max_depth: DEFAULT_MAX_DEPTH,
            exported_at: String::new(),
        }
    }

    /// Apply settings from a [`ProjectConfig`](crate::ProjectConfig).
    ///
    /// Builder methods called after this will override config values.
    #[must_use]
    pub fn with_project_config(mut self, project: &crate::ProjectConfig) -> Self {
        if let Some(base_url) = project.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url.to_string();
        }
        self.auth_policy = project.auth_policy;
        self.public_paths.clone_from(&project.public_paths);
        self.body_overrides.clone_from(&project.body_overrides);
        self.field_injectors.clone_from(&project.field_injectors);
        self.request_captures.clone_from(&project.request_captures);
        self.credentials.clone_from(&project.credentials);
        self.roles.clone_from(&project.roles);
        self.max_depth = project.max_depth;
        self
    }

    /// The configured server root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the auth policy.
    #[must_use]
    pub fn auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.auth_policy = policy;
        self
    }

    /// Set the public path allowlist.
    #[must_use]
    pub fn public_paths(mut self, paths: &[&str]) -> Self {
        self.public_paths = strings(paths);
        self
    }

    /// Set the per-path body overrides.
    #[must_use]
    pub fn body_overrides(mut self, overrides: BTreeMap<String, Map<String, Value>>) -> Self {
        self.body_overrides = overrides;
        self
    }

    /// Set the per-path field injectors.
    #[must_use]
    pub fn field_injectors(mut self, injectors: BTreeMap<String, FieldInjector>) -> Self {
        self.field_injectors = injectors;
        self
    }

    /// Set the request captures.
    #[must_use]
    pub fn request_captures(mut self, captures: Vec<RequestCapture>) -> Self {
        self.request_captures = captures;
        self
    }

    /// Set the credential field lists.
    #[must_use]
    pub fn credentials(mut self, credentials: CredentialFields) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the roles. An empty list yields one flat environment.
    #[must_use]
    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles = strings(roles);
        self
    }

    /// Set the example synthesis depth limit.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the export timestamp written into environments.
    #[must_use]
    pub fn exported_at(mut self, timestamp: &str) -> Self {
        self.exported_at = timestamp.to_string();
        self
    }
}

/// Output of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The generated collection.
    pub collection: Collection,
    /// The generated environments, in role order.
    pub environments: Vec<GeneratedEnvironment>,
}

impl Conversion {
    /// Number of request items across all folders.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.collection.request_count()
    }

    /// Number of folders.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.collection.item.len()
    }
}

/// Convert a parsed specification into a collection and its environments.
#[must_use]
pub fn convert(doc: &SpecDocument, config: &ConvertConfig) -> Conversion {
    let collection = collection::assemble(doc, config);
    let environments = environment::generate(doc, config);
    tracing::debug!(
        title = doc.title(),
        version = doc.version(),
        environments = environments.len(),
        "converted specification"
    );
    Conversion {
        collection,
        environments,
    }
}

/// Parse `input` (JSON or YAML) and convert it.
///
/// # Errors
///
/// Returns an error if the input is neither valid JSON nor valid YAML, or
/// does not hold a mapping at the top level.
pub fn convert_str(input: &str, config: &ConvertConfig) -> error::Result<Conversion> {
    let doc = SpecDocument::parse(input)?;
    Ok(convert(&doc, config))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ProjectConfig;

    #[test]
    fn project_config_overrides_defaults() {
        let project: ProjectConfig = serde_yaml_ng::from_str(
            "base_url: http://api.test\nauth_policy: declarative\nroles: []\nmax_depth: 3\n",
        )
        .unwrap();
        let config = ConvertConfig::new("http://localhost").with_project_config(&project);

        assert_eq!(config.base_url(), "http://api.test");
        assert_eq!(config.auth_policy, AuthPolicy::Declarative);
        assert!(config.roles.is_empty());
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.public_paths.len(), DEFAULT_PUBLIC_PATHS.len());
    }

    #[test]
    fn builder_after_project_config_wins() {
        let project = ProjectConfig::default();
        let config = ConvertConfig::new("http://a")
            .with_project_config(&project)
            .public_paths(&["/health"])
            .roles(&["Ops"]);

        // No base_url in the project config keeps the constructor value.
        assert_eq!(config.base_url(), "http://a");
        assert_eq!(config.public_paths, vec!["/health"]);
        assert_eq!(config.roles, vec!["Ops"]);
    }

    #[test]
    fn convert_str_counts() {
        let input = json!({"paths": {
            "/a": {"get": {"tags": ["x"]}, "post": {}},
            "/b": {"get": {"tags": ["x"]}}
        }});
        let conversion = convert_str(&input.to_string(), &ConvertConfig::new("http://x")).unwrap();
        assert_eq!(conversion.endpoint_count(), 3);
        assert_eq!(conversion.group_count(), 2);
        assert_eq!(conversion.environments.len(), 3);
    }

    #[test]
    fn convert_str_rejects_non_mapping() {
        assert!(convert_str("- a\n- b\n", &ConvertConfig::new("http://x")).is_err());
    }
}
