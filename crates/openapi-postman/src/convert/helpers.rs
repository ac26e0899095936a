//! Shared document traversal helpers used across conversion modules.

use serde_json::{Map, Value};

use super::endpoint::HttpMethod;
use crate::document::SpecDocument;

/// Iterate over all operations in the spec, calling
/// `f(path, method, operation, path_item)` in document order.
///
/// Only recognized HTTP method keys are visited; path-level metadata
/// (`summary`, `parameters`, `servers`) and vendor extensions (`x-*`) are
/// skipped.
pub fn for_each_operation<'a>(
    doc: &'a SpecDocument,
    mut f: impl FnMut(&'a str, HttpMethod, &'a Value, &'a Map<String, Value>),
) {
    for (path, path_item) in doc.paths() {
        for (method_key, operation) in path_item {
            let Some(method) = HttpMethod::parse(method_key) else {
                tracing::debug!(path, key = %method_key, "skipping non-operation key");
                continue;
            };
            if !operation.is_object() {
                continue;
            }
            f(path, method, operation, path_item);
        }
    }
}

/// A string field that is present and non-empty.
pub fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
