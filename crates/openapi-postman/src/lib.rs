#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
pub mod convert;
mod document;
mod error;
#[cfg(feature = "fetch")]
mod fetch;
mod output;
mod report;

pub use config::{
    CredentialFields, FieldInjector, ProjectConfig, RequestCapture, DEFAULT_CONFIG_FILE,
    DEFAULT_PUBLIC_PATHS, DEFAULT_ROLES,
};
pub use convert::{
    convert, convert_str, AuthPolicy, Conversion, ConvertConfig, GeneratedEnvironment,
};
pub use document::{empty_fragment, ref_pointer, SpecDocument, DEFAULT_MAX_REF_HOPS};
pub use error::{Error, Result};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_spec, load_spec, FETCH_TIMEOUT};
pub use output::{
    document_output_dir, output_dir, project_folder_name, write_outputs, FALLBACK_FOLDER_NAME,
};
pub use report::{Report, Step};

/// The Postman document model, re-exported for callers that inspect results.
pub use postman_core as postman;
