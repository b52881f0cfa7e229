//! Raw model document ingestion.
//!
//! The host collaborator hands the core a JSON model document (entities,
//! fields, enums, uniqueness groups). Ingestion is a structural copy into
//! the internal model with name-based lookup; field semantics are not
//! interpreted here. A missing or malformed document is fatal.

use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, IngestResult};
use crate::model::{DataModel, Entity, EnumDef, Field, FieldKind, UniqueGroup};

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    enums: Vec<RawEnum>,
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEnum {
    name: String,
    #[serde(default)]
    values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    name: String,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    unique_groups: Vec<RawUniqueGroup>,
    #[serde(default)]
    primary_key: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    kind: RawFieldKind,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    is_list: bool,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    has_default_value: bool,
    #[serde(default)]
    is_id: bool,
    #[serde(default)]
    is_unique: bool,
    #[serde(default)]
    relation_fields: Vec<String>,
    #[serde(default)]
    documentation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawFieldKind {
    Scalar,
    Enum,
    Relation,
}

impl DataModel {
    /// Ingest a model document from JSON text.
    pub fn from_json(text: &str) -> IngestResult<Self> {
        let raw: RawDocument = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Ingest a model document from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> IngestResult<Self> {
        let raw: RawDocument = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> IngestResult<Self> {
        if raw.entities.is_empty() {
            return Err(IngestError::NoEntities);
        }

        let enums = raw
            .enums
            .into_iter()
            .map(|e| EnumDef::new(e.name, e.values))
            .collect::<Vec<_>>();

        let entities = raw
            .entities
            .into_iter()
            .map(|e| {
                let fields = e.fields.into_iter().map(Field::from).collect();
                Entity {
                    name: e.name,
                    fields,
                    unique_groups: e
                        .unique_groups
                        .into_iter()
                        .map(|g| UniqueGroup {
                            name: g.name,
                            fields: g.fields,
                        })
                        .collect(),
                    primary_key: e.primary_key,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            enums = enums.len(),
            entities = entities.len(),
            "ingested model document"
        );

        Ok(Self { enums, entities })
    }
}

#[derive(Debug, Deserialize)]
struct RawUniqueGroup {
    #[serde(default)]
    name: Option<String>,
    fields: Vec<String>,
}

impl From<RawField> for Field {
    fn from(raw: RawField) -> Self {
        let kind = match raw.kind {
            RawFieldKind::Scalar => FieldKind::Scalar,
            RawFieldKind::Enum => FieldKind::Enum,
            RawFieldKind::Relation => FieldKind::Relation {
                fk_fields: raw.relation_fields,
            },
        };
        Field {
            name: raw.name,
            kind,
            type_name: raw.type_name,
            is_list: raw.is_list,
            is_required: raw.is_required,
            has_default: raw.has_default_value,
            is_id: raw.is_id,
            is_unique: raw.is_unique,
            documentation: raw.documentation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "enums": [{ "name": "Role", "values": ["ADMIN", "USER"] }],
        "entities": [{
            "name": "User",
            "fields": [
                { "name": "id", "kind": "scalar", "type": "Int",
                  "isRequired": true, "isId": true, "hasDefaultValue": true },
                { "name": "role", "kind": "enum", "type": "Role", "isRequired": true },
                { "name": "posts", "kind": "relation", "type": "Post", "isList": true }
            ],
            "uniqueGroups": [{ "fields": ["a", "b"] }],
            "primaryKey": ["id"]
        }]
    }"#;

    #[test]
    fn test_ingest_document() {
        let model = DataModel::from_json(DOC).unwrap();
        assert_eq!(model.enums.len(), 1);
        assert_eq!(model.entities.len(), 1);

        let user = model.entity("User").unwrap();
        assert_eq!(user.fields.len(), 3);
        assert_eq!(user.primary_key.as_deref(), Some(&["id".to_string()][..]));
        assert_eq!(user.unique_groups.len(), 1);

        let id = user.field("id").unwrap();
        assert!(id.is_id);
        assert!(id.has_default);

        let posts = user.field("posts").unwrap();
        assert!(posts.is_relation());
        assert!(posts.is_list);
        assert_eq!(posts.relation_target(), Some("Post"));
    }

    #[test]
    fn test_ingest_malformed() {
        assert!(matches!(
            DataModel::from_json("not json"),
            Err(IngestError::Malformed(_))
        ));
    }

    #[test]
    fn test_ingest_empty_document() {
        assert!(matches!(
            DataModel::from_json(r#"{ "enums": [], "entities": [] }"#),
            Err(IngestError::NoEntities)
        ));
    }

    #[test]
    fn test_flags_default_off() {
        let doc = r#"{ "entities": [{ "name": "T", "fields": [
            { "name": "x", "kind": "scalar", "type": "String" }
        ] }] }"#;
        let model = DataModel::from_json(doc).unwrap();
        let x = model.entity("T").unwrap().field("x").unwrap();
        assert!(!x.is_required);
        assert!(!x.is_list);
        assert!(!x.is_id);
    }
}
