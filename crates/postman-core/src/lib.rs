//! Typed Postman documents for the openapi-postman ecosystem.
//!
//! This crate provides serde models for the two build products of the
//! converter: a Postman Collection v2.1 ([`Collection`]) and a Postman
//! Environment ([`Environment`]). Field order follows the layout Postman
//! itself exports, so serialized output diffs cleanly against hand exports.
//!
//! `openapi-postman` builds these values; you should not need to depend on
//! this crate directly unless you post-process the generated documents.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod collection;
mod environment;

pub use collection::{
    Auth, AuthParam, AuthType, Body, BodyOptions, Collection, Event, Folder, Header, Info, Listen,
    PathVariable, QueryParam, RawOptions, Request, RequestItem, Script, Url, Variable,
    BEARER_TOKEN_VARIABLE, COLLECTION_SCHEMA_URL,
};
pub use environment::{EnvVariable, EnvVariableType, Environment};
