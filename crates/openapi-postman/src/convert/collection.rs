//! Collection assembly: request items grouped into tag folders under one collection.

use std::collections::HashMap;

use postman_core::{Auth, Collection, Folder, Info, Variable, COLLECTION_SCHEMA_URL};

use super::endpoint::{Endpoint, EndpointMapper};
use super::helpers::for_each_operation;
use super::{scripts, ConvertConfig};
use crate::document::SpecDocument;

/// Collection name when the spec has no `info.title`.
pub const DEFAULT_COLLECTION_NAME: &str = "API Collection";

/// Collection description when the spec has no `info.description`.
pub const DEFAULT_COLLECTION_DESCRIPTION: &str = "Imported from OpenAPI specification";

/// Value written to `info._exporter_id`.
pub const EXPORTER_ID: &str = "openapi-converter";

/// Build the collection: one folder per group, first-seen order.
pub(crate) fn assemble(doc: &SpecDocument, config: &ConvertConfig) -> Collection {
    let mapper = EndpointMapper::new(doc, config);
    let mut folders: Vec<Folder> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for_each_operation(doc, |path, method, operation, path_item| {
        let endpoint = Endpoint::from_operation(doc, path, method, operation, path_item);
        let group = endpoint.group();
        let slot = *index.entry(group).or_insert_with(|| {
            folders.push(Folder {
                name: group.to_string(),
                item: Vec::new(),
            });
            folders.len() - 1
        });
        folders[slot].item.push(mapper.map(&endpoint));
    });

    let collection = Collection {
        info: Info {
            name: doc
                .declared_title()
                .unwrap_or(DEFAULT_COLLECTION_NAME)
                .to_string(),
            description: doc
                .description()
                .unwrap_or(DEFAULT_COLLECTION_DESCRIPTION)
                .to_string(),
            schema: COLLECTION_SCHEMA_URL.to_string(),
            exporter_id: EXPORTER_ID.to_string(),
        },
        item: folders,
        auth: Auth::bearer(),
        event: scripts::collection_events(config),
        variable: vec![Variable::string("base_url", config.base_url())],
    };

    tracing::debug!(
        requests = collection.request_count(),
        folders = collection.item.len(),
        "assembled collection"
    );
    collection
}

#[cfg(test)]
mod tests {
    use postman_core::{AuthType, Listen};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn folder_names(collection: &Collection) -> Vec<&str> {
        collection.item.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn groups_in_first_seen_order() {
        let doc = SpecDocument::from_value(json!({"paths": {
            "/z": {"get": {"tags": ["zeta"]}},
            "/a": {"get": {"tags": ["alpha"]}, "post": {"tags": ["zeta"]}},
            "/n": {"get": {}}
        }}))
        .unwrap();

        let collection = assemble(&doc, &ConvertConfig::new("http://x"));
        assert_eq!(folder_names(&collection), vec!["zeta", "alpha", "Default"]);
        let zeta = collection.folder("zeta").unwrap();
        let names: Vec<&str> = zeta.item.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["GET /z", "POST /a"]);
    }

    #[test]
    fn info_defaults_and_collection_level_settings() {
        let doc = SpecDocument::from_value(json!({"paths": {}})).unwrap();
        let collection = assemble(&doc, &ConvertConfig::new("http://localhost:8000"));

        assert_eq!(collection.info.name, DEFAULT_COLLECTION_NAME);
        assert_eq!(collection.info.description, DEFAULT_COLLECTION_DESCRIPTION);
        assert_eq!(collection.info.schema, COLLECTION_SCHEMA_URL);
        assert_eq!(collection.info.exporter_id, EXPORTER_ID);
        assert!(collection.item.is_empty());
        assert_eq!(collection.auth.auth_type, AuthType::Bearer);
        assert_eq!(collection.event[0].listen, Listen::Prerequest);
        assert_eq!(collection.event[1].listen, Listen::Test);
        assert_eq!(collection.variable.len(), 1);
        assert_eq!(collection.variable[0].key, "base_url");
        assert_eq!(collection.variable[0].value, "http://localhost:8000");
    }

    #[test]
    fn info_uses_declared_values() {
        let doc = SpecDocument::from_value(json!({
            "info": {"title": "Shop", "description": "Shop API"},
            "paths": {}
        }))
        .unwrap();
        let collection = assemble(&doc, &ConvertConfig::new("http://x"));
        assert_eq!(collection.info.name, "Shop");
        assert_eq!(collection.info.description, "Shop API");
    }
}
