//! Postman Environment document model.

use serde::{Deserialize, Serialize};

/// A named set of substitutable variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Stable environment identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Variable records.
    #[serde(default)]
    pub values: Vec<EnvVariable>,
    /// Postman variable scope (always `environment`).
    #[serde(rename = "_postman_variable_scope", default)]
    pub variable_scope: String,
    /// Export timestamp (RFC 3339, may be empty).
    #[serde(rename = "_postman_exported_at", default)]
    pub exported_at: String,
    /// Name of the exporting tool.
    #[serde(rename = "_postman_exported_using", default)]
    pub exported_using: String,
}

impl Environment {
    /// Look up a variable record by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnvVariable> {
        self.values.iter().find(|v| v.key == key)
    }

    /// Variable keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.key.as_str()).collect()
    }
}

/// Postman environment variable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvVariableType {
    /// Plain value.
    #[default]
    Default,
    /// Masked in the Postman UI.
    Secret,
}

/// One environment variable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVariable {
    /// Variable key.
    pub key: String,
    /// Initial value.
    #[serde(default)]
    pub value: String,
    /// Value type.
    #[serde(rename = "type", default)]
    pub var_type: EnvVariableType,
    /// Whether the variable is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl EnvVariable {
    /// Enabled, default-typed variable.
    #[must_use]
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            var_type: EnvVariableType::Default,
            enabled: true,
        }
    }

    /// Enabled, secret-typed variable.
    #[must_use]
    pub fn secret(key: &str, value: &str) -> Self {
        Self {
            var_type: EnvVariableType::Secret,
            ..Self::new(key, value)
        }
    }

    /// Whether this variable is secret-typed.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.var_type == EnvVariableType::Secret
    }
}
