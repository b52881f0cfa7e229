//! Internal data model.
//!
//! This module defines the structures a generation pass walks: entities with
//! ordered fields, globally declared enums, and uniqueness metadata. The
//! types are a structural copy of the raw model document (see [`ingest`]);
//! no field semantics are transformed here.

mod ingest;

use serde::{Deserialize, Serialize};

/// A complete ingested data model.
///
/// Entities keep their declared order, which is also emission order. Enums
/// are global and addressable by name before any entity is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    /// Globally declared enums.
    pub enums: Vec<EnumDef>,

    /// Entities in declaration order.
    pub entities: Vec<Entity>,
}

impl DataModel {
    /// Create a model from already-built parts.
    pub fn new(enums: Vec<EnumDef>, entities: Vec<Entity>) -> Self {
        Self { enums, entities }
    }

    /// Look up an enum definition by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// A globally declared enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum name, unique within the model.
    pub name: String,

    /// Literal value names in declaration order.
    pub values: Vec<String>,
}

impl EnumDef {
    /// Create an enum definition.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// One data-model type with named, typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name, unique within the model.
    pub name: String,

    /// Fields in declaration order (significant for output stability).
    pub fields: Vec<Field>,

    /// Declared multi-field unique-constraint groups.
    #[serde(default)]
    pub unique_groups: Vec<UniqueGroup>,

    /// Primary-key group, possibly composite.
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,
}

impl Entity {
    /// Create an entity with the given fields.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            unique_groups: Vec::new(),
            primary_key: None,
        }
    }

    /// Add a unique-constraint group.
    pub fn with_unique_group(mut self, group: UniqueGroup) -> Self {
        self.unique_groups.push(group);
        self
    }

    /// Set the primary-key group.
    pub fn with_primary_key(mut self, fields: Vec<String>) -> Self {
        self.primary_key = Some(fields);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Scalar and enum fields, in declaration order.
    pub fn value_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_relation())
    }

    /// Relation fields, in declaration order.
    pub fn relation_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_relation())
    }
}

/// A named multi-field uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueGroup {
    /// Optional constraint name.
    #[serde(default)]
    pub name: Option<String>,

    /// Member field names.
    pub fields: Vec<String>,
}

impl UniqueGroup {
    /// Create an unnamed group over the given field names.
    pub fn new(fields: Vec<String>) -> Self {
        Self { name: None, fields }
    }
}

/// Kind of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Built-in scalar type.
    Scalar,

    /// Reference to a globally declared enum.
    Enum,

    /// Reference to another entity.
    Relation {
        /// Local scalar field names carrying the relation's foreign key.
        fk_fields: Vec<String>,
    },
}

/// One field of an entity.
///
/// Invariant: `is_list` and `is_required` are orthogonal — a list field is
/// never individually nullable, since absence is an empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,

    /// Field kind.
    pub kind: FieldKind,

    /// Declared type name. For relation fields this is the related entity's
    /// name; for enum fields the enum's name.
    pub type_name: String,

    /// Multi-valued field.
    pub is_list: bool,

    /// Required (non-nullable) field.
    pub is_required: bool,

    /// Field carries a declared default value.
    pub has_default: bool,

    /// Identifier field.
    pub is_id: bool,

    /// Individually unique field.
    pub is_unique: bool,

    /// Free-text documentation, possibly carrying an override expression.
    pub documentation: Option<String>,
}

impl Field {
    fn base(name: impl Into<String>, kind: FieldKind, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
            is_list: false,
            is_required: true,
            has_default: false,
            is_id: false,
            is_unique: false,
            documentation: None,
        }
    }

    /// Create a scalar field (required, single-valued).
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::base(name, FieldKind::Scalar, type_name)
    }

    /// Create an enum field (required, single-valued).
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::base(name, FieldKind::Enum, enum_name)
    }

    /// Create a relation field targeting another entity.
    pub fn relation(
        name: impl Into<String>,
        target: impl Into<String>,
        fk_fields: Vec<String>,
    ) -> Self {
        Self::base(name, FieldKind::Relation { fk_fields }, target)
    }

    /// Mark as list-valued.
    pub fn with_list(mut self, is_list: bool) -> Self {
        self.is_list = is_list;
        self
    }

    /// Set the required flag.
    pub fn with_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    /// Set the default-value flag.
    pub fn with_default(mut self, has_default: bool) -> Self {
        self.has_default = has_default;
        self
    }

    /// Mark as identifier.
    pub fn with_id(mut self, is_id: bool) -> Self {
        self.is_id = is_id;
        self
    }

    /// Mark as individually unique.
    pub fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    /// Attach a documentation string.
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Whether this is a relation field.
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation { .. })
    }

    /// Related entity name, for relation fields.
    pub fn relation_target(&self) -> Option<&str> {
        if self.is_relation() {
            Some(&self.type_name)
        } else {
            None
        }
    }

    /// Foreign-key carrier field names (empty for non-relations).
    pub fn fk_fields(&self) -> &[String] {
        match &self.kind {
            FieldKind::Relation { fk_fields } => fk_fields,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builders() {
        let field = Field::scalar("email", "String")
            .with_required(false)
            .with_unique(true)
            .with_documentation("@zod .email()");

        assert_eq!(field.name, "email");
        assert_eq!(field.kind, FieldKind::Scalar);
        assert!(!field.is_required);
        assert!(field.is_unique);
        assert!(!field.is_relation());
        assert!(field.fk_fields().is_empty());
    }

    #[test]
    fn test_relation_field() {
        let field = Field::relation("author", "User", vec!["authorId".to_string()]);
        assert!(field.is_relation());
        assert_eq!(field.relation_target(), Some("User"));
        assert_eq!(field.fk_fields(), ["authorId".to_string()]);
    }

    #[test]
    fn test_entity_lookup() {
        let entity = Entity::new(
            "Post",
            vec![
                Field::scalar("id", "Int").with_id(true),
                Field::relation("author", "User", vec!["authorId".to_string()]),
            ],
        );

        assert!(entity.field("id").is_some());
        assert!(entity.field("missing").is_none());
        assert_eq!(entity.value_fields().count(), 1);
        assert_eq!(entity.relation_fields().count(), 1);
    }

    #[test]
    fn test_model_lookup() {
        let model = DataModel::new(
            vec![EnumDef::new("Role", vec!["ADMIN".to_string()])],
            vec![Entity::new("User", vec![])],
        );

        assert!(model.enum_def("Role").is_some());
        assert!(model.enum_def("Missing").is_none());
        assert!(model.entity("User").is_some());
    }
}
