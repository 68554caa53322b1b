//! Resource schema capabilities.
//!
//! The querystring accessors only need a small view of a resource schema:
//! which fields are declared, which of them are relationships, and which
//! storage attribute a field maps to. [`ResourceSchema`] captures that view
//! so any storage or validation backend can supply it; [`SchemaRegistry`]
//! resolves a schema from a JSON:API type name.
//!
//! [`StaticSchema`] and [`SchemaSet`] are plain-data implementations that
//! can be built in code or deserialized from JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Separator between relationship names in include paths and sort fields.
pub const SPLIT_REL: &str = ".";

/// Field and relationship metadata for one resource type.
pub trait ResourceSchema {
    /// The JSON:API type name (e.g. `user`).
    fn type_name(&self) -> &str;

    /// Display name used in error messages (e.g. `UserSchema`).
    fn name(&self) -> &str {
        self.type_name()
    }

    /// Names of all declared fields, relationships included.
    fn declared_fields(&self) -> Vec<&str>;

    /// Names of the declared fields that are relationships.
    fn relationships(&self) -> Vec<&str>;

    /// Storage attribute behind `field`, when it differs from the field name.
    fn attribute(&self, field: &str) -> Option<&str>;

    /// Returns `true` when `field` is declared.
    fn has_field(&self, field: &str) -> bool {
        self.declared_fields().contains(&field)
    }

    /// Returns `true` when `field` is a relationship.
    fn is_relationship(&self, field: &str) -> bool {
        self.relationships().contains(&field)
    }

    /// Resolves a declared field to its storage name.
    fn model_field(&self, field: &str) -> String {
        self.attribute(field).unwrap_or(field).to_string()
    }
}

/// Resolves schemas by JSON:API type name.
pub trait SchemaRegistry {
    /// Returns the schema registered for `type_name`.
    fn schema_for_type(&self, type_name: &str) -> Option<&dyn ResourceSchema>;
}

/// A declared schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as exposed over JSON:API.
    pub name: String,
    /// Storage attribute, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Whether the field is a relationship.
    #[serde(default)]
    pub relationship: bool,
}

/// A schema described as plain data.
///
/// # Example
///
/// ```rust
/// use jsonapi_querystring::{ResourceSchema, StaticSchema};
///
/// let schema = StaticSchema::new("post")
///     .field("title")
///     .aliased_field("created", "created_at")
///     .relationship("author");
///
/// assert_eq!(schema.model_field("created"), "created_at");
/// assert!(schema.is_relationship("author"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSchema {
    /// The JSON:API type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Display name; defaults to the type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl StaticSchema {
    /// Creates a schema without fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            fields: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a plain field.
    pub fn field(self, name: impl Into<String>) -> Self {
        self.push(name.into(), None, false)
    }

    /// Declares a field stored under a different attribute.
    pub fn aliased_field(self, name: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.push(name.into(), Some(attribute.into()), false)
    }

    /// Declares a relationship field.
    pub fn relationship(self, name: impl Into<String>) -> Self {
        self.push(name.into(), None, true)
    }

    fn push(mut self, name: String, attribute: Option<String>, relationship: bool) -> Self {
        self.fields.push(FieldDef {
            name,
            attribute,
            relationship,
        });
        self
    }
}

impl ResourceSchema for StaticSchema {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_name)
    }

    fn declared_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn relationships(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.relationship)
            .map(|f| f.name.as_str())
            .collect()
    }

    fn attribute(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.attribute.as_deref())
    }
}

/// A registry of [`StaticSchema`]s keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: HashMap<String, StaticSchema>,
}

impl SchemaSet {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema, replacing any schema with the same type name.
    pub fn insert(&mut self, schema: StaticSchema) {
        self.schemas.insert(schema.type_name.clone(), schema);
    }

    /// Builder-style [`SchemaSet::insert`].
    pub fn with(mut self, schema: StaticSchema) -> Self {
        self.insert(schema);
        self
    }

    /// Parses a JSON array of schemas.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let schemas: Vec<StaticSchema> = serde_json::from_str(json)?;
        Ok(schemas.into_iter().collect())
    }

    /// Returns the schema for `type_name` as its concrete type.
    pub fn get(&self, type_name: &str) -> Option<&StaticSchema> {
        self.schemas.get(type_name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<StaticSchema> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = StaticSchema>>(iter: I) -> Self {
        let mut set = SchemaSet::new();
        for schema in iter {
            set.insert(schema);
        }
        set
    }
}

impl SchemaRegistry for SchemaSet {
    fn schema_for_type(&self, type_name: &str) -> Option<&dyn ResourceSchema> {
        self.schemas
            .get(type_name)
            .map(|schema| schema as &dyn ResourceSchema)
    }
}
