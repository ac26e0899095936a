//! The parsed `OpenAPI` document and local `$ref` resolution.
//!
//! The document is kept as a generic JSON tree because paths, methods and
//! schemas are open-ended. Object key order is preserved (`serde_json` is
//! built with `preserve_order`), which keeps every downstream iteration, and
//! therefore the generated collection, deterministic.

use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Shared empty mapping returned for unresolvable references.
static EMPTY_FRAGMENT: LazyLock<Value> = LazyLock::new(|| Value::Object(Map::new()));

/// Default number of `$ref` hops followed by [`SpecDocument::resolve_chain`].
pub const DEFAULT_MAX_REF_HOPS: usize = 16;

/// A parsed, read-only `OpenAPI` document.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    root: Value,
}

impl SpecDocument {
    /// Wrap an already-parsed JSON tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the root is not an object.
    pub fn from_value(root: Value) -> Result<Self> {
        if root.is_object() {
            Ok(Self { root })
        } else {
            Err(Error::InvalidDocument {
                found: value_kind(&root),
            })
        }
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or the root is not an object.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Parse a YAML document.
    ///
    /// Non-string mapping keys (e.g. unquoted `200:` response codes) are
    /// stringified.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or the root is not a mapping.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(text)?;
        Self::from_value(yaml_to_json(yaml))
    }

    /// Parse JSON, falling back to YAML for documents that do not look like JSON.
    ///
    /// Text starting with `{` is treated strictly as JSON so a truncated or
    /// malformed JSON response is reported as such.
    ///
    /// # Errors
    ///
    /// Returns the JSON or YAML parse error, or [`Error::InvalidDocument`].
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(root) => Self::from_value(root),
            Err(err) if text.trim_start().starts_with('{') => Err(err.into()),
            Err(_) => Self::from_yaml(text),
        }
    }

    /// The raw document tree.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// `info.title`, or `"API"` when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        self.info_str("title").unwrap_or("API")
    }

    /// `info.version`, or `"unknown"` when absent.
    #[must_use]
    pub fn version(&self) -> &str {
        self.info_str("version").unwrap_or("unknown")
    }

    /// `info.description`, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.info_str("description")
    }

    /// `info.title`, if present.
    #[must_use]
    pub fn declared_title(&self) -> Option<&str> {
        self.info_str("title")
    }

    fn info_str(&self, key: &str) -> Option<&str> {
        self.root.get("info")?.get(key)?.as_str()
    }

    /// Iterate `(path template, path item)` pairs in document order.
    ///
    /// Path items that are not objects are skipped.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|paths| paths.iter())
            .filter_map(|(path, item)| Some((path.as_str(), item.as_object()?)))
    }

    /// Resolve a local `$ref` pointer in `fragment`, one hop.
    ///
    /// Fragments without a `$ref` are returned unchanged. Pointers that are
    /// not local (`#/...`), point at a missing location, or point at a
    /// non-mapping value resolve to an empty mapping. The document is never
    /// modified.
    #[must_use]
    pub fn resolve<'a>(&'a self, fragment: &'a Value) -> &'a Value {
        let Some(pointer) = ref_pointer(fragment) else {
            return fragment;
        };

        match self.lookup(pointer) {
            Some(target) if target.is_object() => target,
            _ => {
                tracing::warn!(pointer, "unresolved $ref, substituting empty schema");
                &EMPTY_FRAGMENT
            }
        }
    }

    /// Follow `$ref` chains for at most `max_hops` hops.
    ///
    /// A chain still pointing somewhere after `max_hops` (e.g. a schema that
    /// references itself) resolves to an empty mapping.
    #[must_use]
    pub fn resolve_chain<'a>(&'a self, fragment: &'a Value, max_hops: usize) -> &'a Value {
        let mut current = fragment;
        for _ in 0..max_hops {
            if ref_pointer(current).is_none() {
                return current;
            }
            current = self.resolve(current);
        }

        if ref_pointer(current).is_some() {
            tracing::warn!("$ref chain exceeds {max_hops} hops, substituting empty schema");
            return &EMPTY_FRAGMENT;
        }
        current
    }

    /// Look up a local pointer such as `#/components/schemas/Foo`.
    ///
    /// Segments use JSON Pointer escaping (`~1` for `/`, `~0` for `~`).
    #[must_use]
    pub fn lookup(&self, pointer: &str) -> Option<&Value> {
        let path = pointer.strip_prefix('#')?;
        if path.is_empty() {
            return Some(&self.root);
        }
        self.root.pointer(path)
    }
}

/// The `$ref` string of a fragment, if it has one.
#[must_use]
pub fn ref_pointer(fragment: &Value) -> Option<&str> {
    fragment.get("$ref")?.as_str()
}

/// An empty mapping with a `'static` lifetime.
#[must_use]
pub fn empty_fragment() -> &'static Value {
    &EMPTY_FRAGMENT
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a YAML tree into a JSON tree, stringifying non-string keys.
fn yaml_to_json(value: serde_yaml_ng::Value) -> Value {
    use serde_yaml_ng::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
