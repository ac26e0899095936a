//! Example value synthesis from schema fragments.
//!
//! Produces a representative request body for a schema: every declared
//! property is included (the `required` list is intentionally not consulted),
//! explicit `example`s win, and everything else falls back to a per-type
//! default. Synthesis never fails; unresolvable or malformed schemas yield
//! an empty mapping.

use serde_json::{Map, Value};

use crate::document::{SpecDocument, DEFAULT_MAX_REF_HOPS};

/// Default maximum object/array nesting followed during synthesis.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Placeholder name used for a top-level scalar schema.
const ROOT_NAME: &str = "value";

/// Placeholder name used for array items.
const ITEMS_NAME: &str = "items";

/// Schema type discriminator derived from the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl SchemaType {
    /// Parse a `type` keyword value, or `None` if unrecognized.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The type declared by `schema`, if it has a `type` keyword.
    ///
    /// Unrecognized names map to [`SchemaType::String`]. `OpenAPI` 3.1 type
    /// arrays use their first non-`"null"` entry.
    fn declared(schema: &Value) -> Option<Self> {
        let declared = schema.get("type")?;
        let name = match declared {
            Value::String(name) => Some(name.as_str()),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null"),
            _ => None,
        };
        Some(name.and_then(Self::parse).unwrap_or(Self::String))
    }
}

/// Synthesizes example values, resolving `$ref`s against a document.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    doc: &'a SpecDocument,
    max_depth: usize,
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer with the default depth limit.
    #[must_use]
    pub fn new(doc: &'a SpecDocument) -> Self {
        Self {
            doc,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit object/array nesting; deeper levels synthesize as empty.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Synthesize an example for a (possibly `$ref`) schema.
    ///
    /// Schemas with `properties` (or without any type) produce a mapping;
    /// scalar and array schemas produce the matching value.
    #[must_use]
    pub fn example(&self, schema: &Value) -> Value {
        let schema = self.resolve(schema);
        if schema.get("properties").is_some() {
            return self.object_example(schema, 0);
        }

        match self.select(schema) {
            None | Some((SchemaType::Object, _)) => self.object_example(schema, 0),
            Some((kind, selected)) => self.typed_example(ROOT_NAME, selected, kind, 0),
        }
    }

    fn resolve<'s>(&'s self, schema: &'s Value) -> &'s Value {
        self.doc.resolve_chain(schema, DEFAULT_MAX_REF_HOPS)
    }

    /// Pick the effective type and the schema that declares it.
    ///
    /// `anyOf` uses its first alternative carrying a `type` (string if none
    /// do); otherwise the schema's own `type`, then `properties` imply an
    /// object.
    fn select<'s>(&'s self, schema: &'s Value) -> Option<(SchemaType, &'s Value)> {
        if let Some(alternatives) = schema.get("anyOf").and_then(Value::as_array) {
            let typed = alternatives
                .iter()
                .map(|alt| self.resolve(alt))
                .find_map(|alt| Some((SchemaType::declared(alt)?, alt)));
            return Some(typed.unwrap_or((SchemaType::String, schema)));
        }

        if let Some(kind) = SchemaType::declared(schema) {
            return Some((kind, schema));
        }

        schema
            .get("properties")
            .is_some()
            .then_some((SchemaType::Object, schema))
    }

    fn object_example(&self, schema: &Value, depth: usize) -> Value {
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return Value::Object(Map::new());
        };

        let example = properties
            .iter()
            .map(|(name, prop)| (name.clone(), self.property_example(name, prop, depth)))
            .collect();
        Value::Object(example)
    }

    fn property_example(&self, name: &str, prop: &Value, depth: usize) -> Value {
        if let Some(example) = prop.get("example") {
            return example.clone();
        }

        let resolved = self.resolve(prop);
        if let Some(example) = resolved.get("example") {
            return example.clone();
        }

        let (kind, selected) = self
            .select(resolved)
            .unwrap_or((SchemaType::String, resolved));
        self.typed_example(name, selected, kind, depth)
    }

    fn typed_example(&self, name: &str, schema: &Value, kind: SchemaType, depth: usize) -> Value {
        match kind {
            SchemaType::String => schema
                .get("enum")
                .and_then(Value::as_array)
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or_else(|| Value::String(format!("<{name}>"))),
            SchemaType::Integer => Value::from(0),
            SchemaType::Number => Value::from(0.0),
            SchemaType::Boolean => Value::Bool(false),
            SchemaType::Array => {
                let items = schema
                    .get("items")
                    .filter(|items| items.as_object().is_some_and(|m| !m.is_empty()));
                match items {
                    Some(items) if depth < self.max_depth => {
                        Value::Array(vec![self.property_example(ITEMS_NAME, items, depth + 1)])
                    }
                    _ => Value::Array(Vec::new()),
                }
            }
            SchemaType::Object if depth < self.max_depth => {
                self.object_example(schema, depth + 1)
            }
            SchemaType::Object => Value::Object(Map::new()),
        }
    }
}
