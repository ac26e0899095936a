//! Postman Collection v2.1 document model.
//!
//! Only the subset the converter emits is modeled: tag folders holding raw
//! JSON requests, bearer/no-auth blocks, and JavaScript lifecycle scripts.

use serde::{Deserialize, Serialize};

/// JSON schema URL identifying the Postman Collection v2.1 format.
pub const COLLECTION_SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Postman variable template that carries the bearer token.
pub const BEARER_TOKEN_VARIABLE: &str = "{{access_token}}";

/// Root of a Postman Collection v2.1 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection metadata.
    pub info: Info,
    /// Tag folders, in first-seen order.
    #[serde(default)]
    pub item: Vec<Folder>,
    /// Collection-level auth default inherited by every request.
    pub auth: Auth,
    /// Collection-level lifecycle scripts.
    #[serde(default)]
    pub event: Vec<Event>,
    /// Collection variables (at least `base_url`).
    #[serde(default)]
    pub variable: Vec<Variable>,
}

impl Collection {
    /// Total number of requests across all folders.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.item.iter().map(|folder| folder.item.len()).sum()
    }

    /// Look up a folder by name.
    #[must_use]
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.item.iter().find(|folder| folder.name == name)
    }

    /// Iterate over every request item in folder order.
    pub fn requests(&self) -> impl Iterator<Item = &RequestItem> {
        self.item.iter().flat_map(|folder| folder.item.iter())
    }
}

/// Collection metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Format schema URL, normally [`COLLECTION_SCHEMA_URL`].
    pub schema: String,
    /// Identifier of the exporting tool.
    #[serde(rename = "_exporter_id", default)]
    pub exporter_id: String,
}

/// A folder grouping requests that share their first `OpenAPI` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Tag name.
    pub name: String,
    /// Requests in document order.
    #[serde(default)]
    pub item: Vec<RequestItem>,
}

/// One request entry inside a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    /// Display name (operation summary or `METHOD /path`).
    pub name: String,
    /// The request itself.
    pub request: Request,
    /// Item-level lifecycle scripts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Event>,
    /// Saved response examples. Always emitted, usually empty.
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
}

/// Request definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Upper-case HTTP method.
    pub method: String,
    /// Request headers.
    #[serde(default)]
    pub header: Vec<Header>,
    /// Structured URL.
    pub url: Url,
    /// Operation description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Item-level auth override. Absent means "inherit from collection".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    /// Raw request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

/// Request header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
    /// Postman value type (`text`).
    #[serde(rename = "type", default = "text_type")]
    pub header_type: String,
}

impl Header {
    /// Build a plain-text header.
    #[must_use]
    pub fn text(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            header_type: text_type(),
        }
    }
}

fn text_type() -> String {
    "text".to_string()
}

/// Structured request URL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Url {
    /// Full templated URL, e.g. `{{base_url}}/users/{id}`.
    pub raw: String,
    /// Host segments; the converter always emits a single templated host.
    #[serde(default)]
    pub host: Vec<String>,
    /// Path segments with empty segments removed.
    #[serde(default)]
    pub path: Vec<String>,
    /// Query parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<QueryParam>,
    /// Path variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<PathVariable>,
}

/// Query parameter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Parameter name.
    pub key: String,
    /// Placeholder value.
    #[serde(default)]
    pub value: String,
    /// Parameter description.
    #[serde(default)]
    pub description: String,
    /// Whether Postman leaves the parameter unchecked.
    #[serde(default)]
    pub disabled: bool,
}

/// Path variable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathVariable {
    /// Variable name.
    pub key: String,
    /// Placeholder value.
    #[serde(default)]
    pub value: String,
    /// Variable description.
    #[serde(default)]
    pub description: String,
}

/// Auth scheme discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// Explicitly no auth, overriding any inherited default.
    Noauth,
}

/// Auth block at collection or request level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    /// Scheme.
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    /// Bearer parameters; empty for [`AuthType::Noauth`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bearer: Vec<AuthParam>,
}

impl Auth {
    /// Bearer auth forwarding [`BEARER_TOKEN_VARIABLE`].
    #[must_use]
    pub fn bearer() -> Self {
        Self {
            auth_type: AuthType::Bearer,
            bearer: vec![AuthParam {
                key: "token".to_string(),
                value: BEARER_TOKEN_VARIABLE.to_string(),
                param_type: "string".to_string(),
            }],
        }
    }

    /// Explicit no-auth override.
    #[must_use]
    pub fn noauth() -> Self {
        Self {
            auth_type: AuthType::Noauth,
            bearer: Vec::new(),
        }
    }

    /// Whether this block forwards a bearer token.
    #[must_use]
    pub fn is_bearer(&self) -> bool {
        self.auth_type == AuthType::Bearer
    }
}

/// Auth parameter (key/value/type triple).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthParam {
    /// Parameter key (`token` for bearer).
    pub key: String,
    /// Parameter value.
    pub value: String,
    /// Value type.
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Raw request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Body mode; the converter only emits `raw`.
    pub mode: String,
    /// Body text.
    pub raw: String,
    /// Editor options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BodyOptions>,
}

impl Body {
    /// A raw body tagged as JSON.
    #[must_use]
    pub fn raw_json(raw: String) -> Self {
        Self {
            mode: "raw".to_string(),
            raw,
            options: Some(BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            }),
        }
    }
}

/// Body editor options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    /// Raw-mode options.
    pub raw: RawOptions,
}

/// Raw-mode body options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOptions {
    /// Syntax language (`json`).
    pub language: String,
}

/// Collection variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub key: String,
    /// Initial value.
    pub value: String,
    /// Value type.
    #[serde(rename = "type")]
    pub var_type: String,
}

impl Variable {
    /// String-typed variable.
    #[must_use]
    pub fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            var_type: "string".to_string(),
        }
    }
}

/// Script trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listen {
    /// Runs before the request is sent.
    Prerequest,
    /// Runs after the response arrives.
    Test,
}

/// Lifecycle script attached to a collection or request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Trigger.
    pub listen: Listen,
    /// Script body.
    pub script: Script,
}

impl Event {
    /// JavaScript event from pre-split source lines.
    #[must_use]
    pub fn javascript(listen: Listen, exec: Vec<String>) -> Self {
        Self {
            listen,
            script: Script {
                script_type: "text/javascript".to_string(),
                exec,
            },
        }
    }
}

/// Script source, one entry per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// MIME type of the script.
    #[serde(rename = "type")]
    pub script_type: String,
    /// Source lines.
    #[serde(default)]
    pub exec: Vec<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn bearer_auth_serializes_postman_shape() {
        let value = serde_json::to_value(Auth::bearer()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "bearer",
                "bearer": [{"key": "token", "value": "{{access_token}}", "type": "string"}]
            })
        );
    }

    #[test]
    fn noauth_omits_bearer_list() {
        let value = serde_json::to_value(Auth::noauth()).unwrap();
        assert_eq!(value, json!({"type": "noauth"}));
    }

    #[test]
    fn request_item_omits_empty_optional_fields() {
        let item = RequestItem {
            name: "List".to_string(),
            request: Request {
                method: "GET".to_string(),
                header: vec![Header::text("Content-Type", "application/json")],
                url: Url {
                    raw: "{{base_url}}/things".to_string(),
                    host: vec!["{{base_url}}".to_string()],
                    path: vec!["things".to_string()],
                    ..Url::default()
                },
                description: None,
                auth: None,
                body: None,
            },
            event: Vec::new(),
            response: Vec::new(),
        };

        let value = serde_json::to_value(&item).unwrap();
        let request = value["request"].as_object().unwrap();
        assert!(!request.contains_key("auth"));
        assert!(!request.contains_key("body"));
        assert!(!request["url"].as_object().unwrap().contains_key("query"));
        assert!(!value.as_object().unwrap().contains_key("event"));
        assert_eq!(value["response"], json!([]));
    }

    #[test]
    fn raw_json_body_tags_language() {
        let value = serde_json::to_value(Body::raw_json("{}".to_string())).unwrap();
        assert_eq!(
            value,
            json!({"mode": "raw", "raw": "{}", "options": {"raw": {"language": "json"}}})
        );
    }

    #[test]
    fn event_listen_serializes_lowercase() {
        let event = Event::javascript(Listen::Prerequest, vec!["// hi".to_string()]);
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["listen"], "prerequest");
        assert_eq!(value["script"]["type"], "text/javascript");
    }

    #[test]
    fn collection_counts_requests_across_folders() {
        let json = json!({
            "info": {"name": "T", "schema": COLLECTION_SCHEMA_URL},
            "item": [
                {"name": "A", "item": [
                    {"name": "a1", "request": {"method": "GET", "url": {"raw": "x"}}},
                    {"name": "a2", "request": {"method": "POST", "url": {"raw": "y"}}}
                ]},
                {"name": "B", "item": [
                    {"name": "b1", "request": {"method": "GET", "url": {"raw": "z"}}}
                ]}
            ],
            "auth": {"type": "bearer", "bearer": []}
        });

        let collection: Collection = serde_json::from_value(json).unwrap();
        assert_eq!(collection.request_count(), 3);
        assert_eq!(collection.folder("B").unwrap().item[0].name, "b1");
        assert!(collection.folder("C").is_none());
        assert_eq!(
            collection.requests().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["a1", "a2", "b1"]
        );
    }
}
