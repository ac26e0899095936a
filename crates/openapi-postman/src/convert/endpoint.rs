//! Endpoint descriptors and their mapping to Postman request items.

use std::fmt;

use postman_core::{Body, Header, PathVariable, QueryParam, Request, RequestItem, Url};
use serde_json::{Map, Value};

use super::example::Synthesizer;
use super::helpers::non_empty_str;
use super::{scripts, ConvertConfig};
use crate::document::{SpecDocument, DEFAULT_MAX_REF_HOPS};

/// Folder name for operations without tags.
pub const DEFAULT_GROUP: &str = "Default";

/// Postman variable holding the server root.
pub const BASE_URL_VARIABLE: &str = "{{base_url}}";

const JSON_MEDIA_TYPE: &str = "application/json";

/// The HTTP methods that identify operations in a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
}

impl HttpMethod {
    /// Every recognized method.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Options,
        Self::Head,
    ];

    /// Parse a path-item key, ignoring case. Other keys yield `None`.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(key))
    }

    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is sent. Header and cookie parameters are not mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// URL query string.
    Query,
    /// Templated path segment.
    Path,
}

impl ParamLocation {
    fn parse(location: &str) -> Option<Self> {
        match location {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            _ => None,
        }
    }
}

/// A query or path parameter after `$ref` resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter is sent.
    pub location: ParamLocation,
    /// Whether the operation requires it.
    pub required: bool,
    /// Description text, empty when absent.
    pub description: String,
}

impl Parameter {
    fn from_value(value: &Value) -> Option<Self> {
        let location = ParamLocation::parse(value.get("in")?.as_str()?)?;
        Some(Self {
            name: value.get("name")?.as_str()?.to_string(),
            location,
            required: value.get("required").and_then(Value::as_bool).unwrap_or(false),
            description: value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// One (path, method) operation, with references already followed.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    /// Path template, e.g. `/users/{id}`.
    pub path: &'a str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Operation summary, if non-empty.
    pub summary: Option<&'a str>,
    /// Operation description, if non-empty.
    pub description: Option<&'a str>,
    /// Path-level parameters merged with operation parameters.
    pub parameters: Vec<Parameter>,
    /// JSON request body schema, if the operation declares one.
    pub body_schema: Option<&'a Value>,
    /// The operation's `security` requirement list, if declared.
    pub security: Option<&'a Value>,
    /// Operation tags in declaration order.
    pub tags: Vec<&'a str>,
}

impl<'a> Endpoint<'a> {
    /// Describe an operation.
    ///
    /// Parameters declared on the path item are inherited; an operation
    /// parameter with the same name and location replaces the inherited one.
    #[must_use]
    pub fn from_operation(
        doc: &'a SpecDocument,
        path: &'a str,
        method: HttpMethod,
        operation: &'a Value,
        path_item: &'a Map<String, Value>,
    ) -> Self {
        let mut parameters: Vec<Parameter> = Vec::new();
        let declared = path_item
            .get("parameters")
            .into_iter()
            .chain(operation.get("parameters"))
            .filter_map(Value::as_array)
            .flatten();
        for raw in declared {
            let resolved = doc.resolve_chain(raw, DEFAULT_MAX_REF_HOPS);
            let Some(param) = Parameter::from_value(resolved) else {
                continue;
            };
            match parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        Self {
            path,
            method,
            summary: non_empty_str(operation, "summary"),
            description: non_empty_str(operation, "description"),
            parameters,
            body_schema: body_schema(doc, operation),
            security: operation.get("security"),
            tags: operation
                .get("tags")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .collect(),
        }
    }

    /// The folder this endpoint belongs to: its first tag, or `Default`.
    #[must_use]
    pub fn group(&self) -> &'a str {
        self.tags.first().copied().unwrap_or(DEFAULT_GROUP)
    }

    /// Request name: the summary, or `METHOD path`.
    #[must_use]
    pub fn name(&self) -> String {
        self.summary
            .map_or_else(|| format!("{} {}", self.method, self.path), ToString::to_string)
    }
}

/// The `application/json` schema of an operation's request body.
fn body_schema<'a>(doc: &'a SpecDocument, operation: &'a Value) -> Option<&'a Value> {
    let body = doc.resolve_chain(operation.get("requestBody")?, DEFAULT_MAX_REF_HOPS);
    let content = body.get("content")?.as_object()?;
    let media = content.get(JSON_MEDIA_TYPE).or_else(|| {
        content
            .iter()
            .find(|(media_type, _)| media_type.starts_with(JSON_MEDIA_TYPE))
            .map(|(_, media)| media)
    })?;
    media
        .get("schema")
        .filter(|schema| schema.as_object().is_some_and(|s| !s.is_empty()))
}

/// Replace fields of an example body with fixed values.
///
/// Only fields already present in the example are replaced; nothing is added.
pub fn apply_body_overrides(example: &mut Value, overrides: &Map<String, Value>) {
    let Some(body) = example.as_object_mut() else {
        return;
    };
    for (field, value) in overrides {
        if let Some(slot) = body.get_mut(field) {
            slot.clone_from(value);
        }
    }
}

/// Turns endpoint descriptors into Postman request items.
#[derive(Debug, Clone, Copy)]
pub struct EndpointMapper<'a> {
    config: &'a ConvertConfig,
    synthesizer: Synthesizer<'a>,
}

impl<'a> EndpointMapper<'a> {
    /// Create a mapper bound to one document and configuration.
    #[must_use]
    pub fn new(doc: &'a SpecDocument, config: &'a ConvertConfig) -> Self {
        Self {
            config,
            synthesizer: Synthesizer::new(doc).max_depth(config.max_depth),
        }
    }

    /// Map one endpoint to a request item.
    #[must_use]
    pub fn map(&self, endpoint: &Endpoint<'_>) -> RequestItem {
        let config = self.config;
        let mut url = Url {
            raw: format!("{BASE_URL_VARIABLE}{}", endpoint.path),
            host: vec![BASE_URL_VARIABLE.to_string()],
            path: endpoint
                .path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(ToString::to_string)
                .collect(),
            ..Url::default()
        };

        for param in &endpoint.parameters {
            match param.location {
                ParamLocation::Query => url.query.push(QueryParam {
                    key: param.name.clone(),
                    value: String::new(),
                    description: param.description.clone(),
                    disabled: !param.required,
                }),
                ParamLocation::Path => url.variable.push(PathVariable {
                    key: param.name.clone(),
                    value: String::new(),
                    description: param.description.clone(),
                }),
            }
        }

        let body = endpoint.body_schema.map(|schema| {
            let mut example = self.synthesizer.example(schema);
            if let Some(overrides) = config.body_overrides.get(endpoint.path) {
                apply_body_overrides(&mut example, overrides);
            }
            Body::raw_json(format!("{example:#}"))
        });

        let event = config
            .field_injectors
            .get(endpoint.path)
            .map(scripts::injector_event)
            .into_iter()
            .collect();

        RequestItem {
            name: endpoint.name(),
            request: Request {
                method: endpoint.method.to_string(),
                header: vec![Header::text("Content-Type", JSON_MEDIA_TYPE)],
                url,
                description: endpoint.description.map(ToString::to_string),
                auth: config
                    .auth_policy
                    .auth_for(endpoint.path, endpoint.security, &config.public_paths),
                body,
            },
            event,
            response: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use postman_core::{AuthType, Listen};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::convert::AuthPolicy;

    fn describe<'a>(doc: &'a SpecDocument, path: &'a str, method: &str) -> Endpoint<'a> {
        let (path, item) = doc.paths().find(|(p, _)| *p == path).unwrap();
        let method = HttpMethod::parse(method).unwrap();
        let key = item
            .keys()
            .find(|k| k.eq_ignore_ascii_case(method.as_str()))
            .unwrap();
        Endpoint::from_operation(doc, path, method, &item[key], item)
    }

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("PATCH"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("trace"), None);
        assert_eq!(HttpMethod::parse("parameters"), None);
    }

    #[test]
    fn merges_path_level_and_ref_parameters() {
        let doc = SpecDocument::from_value(json!({
            "paths": {"/users/{id}": {
                "parameters": [
                    {"name": "id", "in": "path", "required": true},
                    {"name": "verbose", "in": "query", "description": "old"}
                ],
                "get": {"parameters": [
                    {"$ref": "#/components/parameters/Verbose"},
                    {"name": "X-Trace", "in": "header"}
                ]}
            }},
            "components": {"parameters": {
                "Verbose": {
                    "name": "verbose", "in": "query", "required": true, "description": "new"
                }
            }}
        }))
        .unwrap();

        let endpoint = describe(&doc, "/users/{id}", "get");
        assert_eq!(
            endpoint.parameters,
            vec![
                Parameter {
                    name: "id".into(),
                    location: ParamLocation::Path,
                    required: true,
                    description: String::new(),
                },
                Parameter {
                    name: "verbose".into(),
                    location: ParamLocation::Query,
                    required: true,
                    description: "new".into(),
                },
            ]
        );
    }

    #[test]
    fn name_and_group_defaults() {
        let doc = SpecDocument::from_value(json!({"paths": {
            "/a": {"get": {"summary": "List A", "tags": ["alpha", "beta"]}, "post": {"summary": ""}}
        }}))
        .unwrap();

        let get = describe(&doc, "/a", "get");
        assert_eq!(get.name(), "List A");
        assert_eq!(get.group(), "alpha");

        let post = describe(&doc, "/a", "post");
        assert_eq!(post.name(), "POST /a");
        assert_eq!(post.group(), DEFAULT_GROUP);
    }

    #[test]
    fn body_schema_follows_ref_request_body() {
        let doc = SpecDocument::from_value(json!({
            "paths": {"/w": {"post": {"requestBody": {"$ref": "#/components/requestBodies/W"}}}},
            "components": {"requestBodies": {"W": {"content": {
                "application/json; charset=utf-8": {"schema": {"type": "object"}}
            }}}}
        }))
        .unwrap();

        let endpoint = describe(&doc, "/w", "post");
        assert_eq!(endpoint.body_schema, Some(&json!({"type": "object"})));
    }

    #[test]
    fn empty_or_non_json_body_is_ignored() {
        let doc = SpecDocument::from_value(json!({"paths": {"/w": {
            "post": {"requestBody": {"content": {"application/json": {"schema": {}}}}},
            "put": {"requestBody": {"content": {"text/plain": {"schema": {"type": "string"}}}}}
        }}}))
        .unwrap();

        assert!(describe(&doc, "/w", "post").body_schema.is_none());
        assert!(describe(&doc, "/w", "put").body_schema.is_none());
    }

    #[test]
    fn maps_request_item() {
        let doc = SpecDocument::from_value(json!({"paths": {"/widgets/{id}": {"put": {
            "summary": "Update widget",
            "description": "Replaces a widget",
            "security": [{"bearer": []}],
            "parameters": [
                {"name": "id", "in": "path", "required": true},
                {"name": "dry_run", "in": "query"},
                {"name": "version", "in": "query", "required": true}
            ],
            "requestBody": {"content": {"application/json": {"schema": {
                "type": "object",
                "properties": {"name": {"type": "string"}, "count": {"type": "integer"}}
            }}}}
        }}}}))
        .unwrap();
        let config = ConvertConfig::new("http://localhost:8000");
        let mapper = EndpointMapper::new(&doc, &config);

        let item = mapper.map(&describe(&doc, "/widgets/{id}", "put"));
        let request = &item.request;
        assert_eq!(item.name, "Update widget");
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url.raw, "{{base_url}}/widgets/{id}");
        assert_eq!(request.url.host, vec!["{{base_url}}"]);
        assert_eq!(request.url.path, vec!["widgets", "{id}"]);
        assert_eq!(request.url.variable[0].key, "id");
        assert_eq!(request.url.query[0].key, "dry_run");
        assert!(request.url.query[0].disabled);
        assert_eq!(request.url.query[1].key, "version");
        assert!(!request.url.query[1].disabled);
        assert_eq!(request.description.as_deref(), Some("Replaces a widget"));
        assert_eq!(request.header[0].key, "Content-Type");
        assert_eq!(request.auth.as_ref().unwrap().auth_type, AuthType::Bearer);
        assert_eq!(
            request.body.as_ref().unwrap().raw,
            indoc! {r#"
                {
                  "name": "<name>",
                  "count": 0
                }"#}
        );
        assert!(item.event.is_empty());
        assert!(item.response.is_empty());
    }

    #[test]
    fn overrides_replace_only_existing_fields() {
        let mut example = json!({"mobile": "<mobile>", "otp": "<otp>"});
        let overrides = json!({"mobile": "{{mobile}}", "otp": "1234", "extra": 1});
        apply_body_overrides(&mut example, overrides.as_object().unwrap());
        assert_eq!(example, json!({"mobile": "{{mobile}}", "otp": "1234"}));

        let mut scalar = json!(3);
        apply_body_overrides(&mut scalar, overrides.as_object().unwrap());
        assert_eq!(scalar, json!(3));
    }

    #[test]
    fn verify_endpoint_gets_override_and_injector() {
        let doc = SpecDocument::from_value(json!({"paths": {"/common/verify": {"post": {
            "requestBody": {"content": {"application/json": {"schema": {
                "type": "object",
                "properties": {"mobile": {"type": "string"}, "otp": {"type": "string"}}
            }}}}
        }}}}))
        .unwrap();
        let config = ConvertConfig::new("http://localhost:8000");
        let endpoint = describe(&doc, "/common/verify", "post");
        let item = EndpointMapper::new(&doc, &config).map(&endpoint);

        let body: Value = serde_json::from_str(&item.request.body.unwrap().raw).unwrap();
        assert_eq!(body, json!({"mobile": "{{mobile}}", "otp": "1234"}));
        assert_eq!(item.event.len(), 1);
        assert_eq!(item.event[0].listen, Listen::Prerequest);
        // Public under the default allowlist.
        assert_eq!(item.request.auth.unwrap().auth_type, AuthType::Noauth);
    }

    #[test]
    fn declarative_policy_leaves_unsecured_requests_inheriting() {
        let doc = SpecDocument::from_value(json!({"paths": {"/open": {"get": {}}}})).unwrap();
        let config = ConvertConfig::new("http://x").auth_policy(AuthPolicy::Declarative);
        let item = EndpointMapper::new(&doc, &config).map(&describe(&doc, "/open", "get"));
        assert!(item.request.auth.is_none());
        assert!(item.request.body.is_none());
    }
}
