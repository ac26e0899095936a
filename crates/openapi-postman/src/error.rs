//! Typed error enum for the `openapi-postman` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.
//!
//! Schema resolution and example synthesis never fail: unresolved
//! references and malformed schemas degrade to empty values instead.

/// Errors produced by `openapi-postman` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading config or spec files, writing outputs).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure (config file or YAML spec).
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing or serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Network failure while fetching the remote spec.
    #[cfg(feature = "fetch")]
    #[error("failed to fetch OpenAPI spec from {url}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The spec server answered with a non-success status.
    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// Numeric HTTP status code.
        status: u16,
    },

    /// A required configuration key is absent or empty.
    ///
    /// Raised before any network activity so a bad config never triggers a fetch.
    #[error("configuration is missing required key '{key}'")]
    MissingConfig {
        /// The missing key.
        key: &'static str,
    },

    /// The spec document root is not a JSON object.
    #[error("OpenAPI document root must be an object, found {found}")]
    InvalidDocument {
        /// Kind of value found at the root.
        found: &'static str,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
