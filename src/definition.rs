//! Field definitions emitted for the document store
//!
//! Serialization follows the shape the object-modeling layer expects:
//!
//! ```text
//! { "name": { "type": "String", "minlength": 3, "required": true },
//!   "tags": { "type": ["String"] },
//!   "owner": [ { "type": "ObjectId", "ref": "User" } ],
//!   "address": { "street": { "type": "String" } } }
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::Result;
use crate::node::{Annotation, REF_KEY};

/// Option key set on required fields
pub const REQUIRED_KEY: &str = "required";

/// Option key holding enumerated values
pub const ENUM_KEY: &str = "enum";

/// Key of the resolved type
pub const TYPE_KEY: &str = "type";

// =============================================================================
// Target Types
// =============================================================================

/// Resolved type tag of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    String,
    Number,
    Boolean,
    Date,
    Buffer,
    /// Opaque identifier of another document
    ObjectId,
    /// Accepts any value
    Mixed,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::String => "String",
            TargetType::Number => "Number",
            TargetType::Boolean => "Boolean",
            TargetType::Date => "Date",
            TargetType::Buffer => "Buffer",
            TargetType::ObjectId => "ObjectId",
            TargetType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Type
// =============================================================================

/// Value of a definition's `type` key
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// `"String"`
    Scalar(TargetType),
    /// `["String"]`
    ScalarArray(TargetType),
    /// `[ { ... } ]`
    DefinitionArray(Box<Definition>),
    /// `{ field: ... }`
    Nested(SchemaDefinition),
    /// Raw `type` value supplied by an annotation
    Override(Value),
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldType::Scalar(t) => t.serialize(serializer),
            FieldType::ScalarArray(t) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(t)?;
                seq.end()
            }
            FieldType::DefinitionArray(def) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(def.as_ref())?;
                seq.end()
            }
            FieldType::Nested(fields) => fields.serialize(serializer),
            FieldType::Override(value) => value.serialize(serializer),
        }
    }
}

// =============================================================================
// Field Definition
// =============================================================================

/// A `{ type, ...options }` descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub field_type: FieldType,
    /// Everything except `type`, in emission order
    pub options: Map<String, Value>,
}

impl FieldDefinition {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            options: Map::new(),
        }
    }

    pub fn scalar(target: TargetType) -> Self {
        Self::new(FieldType::Scalar(target))
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: Value) {
        self.options.insert(key.into(), value);
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Overlay annotation entries; existing keys are overwritten in place.
    ///
    /// A `type` entry replaces the computed type.
    pub fn merge_annotation(&mut self, annotation: &Annotation) {
        for (key, value) in annotation.entries() {
            if key == TYPE_KEY {
                self.field_type = FieldType::Override(value.clone());
            } else {
                self.options.insert(key.clone(), value.clone());
            }
        }
    }

    /// Referenced entity name, if any
    pub fn reference(&self) -> Option<&str> {
        self.options.get(REF_KEY).and_then(|v| v.as_str())
    }

    /// Opaque identifier fields are exempt from the required flag
    pub fn is_reference_typed(&self) -> bool {
        match &self.field_type {
            FieldType::Scalar(target) => *target == TargetType::ObjectId,
            FieldType::Override(Value::String(name)) => name == TargetType::ObjectId.as_str(),
            _ => false,
        }
    }

    pub fn set_required(&mut self) {
        self.options.insert(REQUIRED_KEY.to_string(), Value::Bool(true));
    }

    pub fn is_required(&self) -> bool {
        self.options.get(REQUIRED_KEY) == Some(&Value::Bool(true))
    }
}

impl Serialize for FieldDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.options.len() + 1))?;
        map.serialize_entry(TYPE_KEY, &self.field_type)?;
        for (key, value) in &self.options {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Output for one schema node
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// `{ type, ...options }`
    Field(FieldDefinition),
    /// Nested object mapping without a `type` key
    Nested(SchemaDefinition),
    /// `[ { type, ref } ]`
    ReferenceArray(FieldDefinition),
}

impl Definition {
    /// Referenced entity name of a plain field
    pub fn reference(&self) -> Option<&str> {
        match self {
            Definition::Field(field) => field.reference(),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDefinition> {
        match self {
            Definition::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Coerce into a `{ type, ... }` descriptor so options can be attached
    pub fn into_field(self) -> FieldDefinition {
        match self {
            Definition::Field(field) => field,
            Definition::Nested(fields) => FieldDefinition::new(FieldType::Nested(fields)),
            reference_array @ Definition::ReferenceArray(_) => {
                FieldDefinition::new(FieldType::DefinitionArray(Box::new(reference_array)))
            }
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<FieldDefinition> for Definition {
    fn from(field: FieldDefinition) -> Self {
        Definition::Field(field)
    }
}

impl Serialize for Definition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Definition::Field(field) => field.serialize(serializer),
            Definition::Nested(fields) => fields.serialize(serializer),
            Definition::ReferenceArray(field) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(field)?;
                seq.end()
            }
        }
    }
}

// =============================================================================
// Schema Definition
// =============================================================================

/// Ordered mapping from field name to definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    fields: Vec<(String, Definition)>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping its first position
    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = definition,
            None => self.fields.push((name, definition)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, def)| def)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for SchemaDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, def) in &self.fields {
            map.serialize_entry(name, def)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_serializes_type_first() {
        let mut field = FieldDefinition::scalar(TargetType::String);
        field.set_option("minlength", json!(3));
        field.set_required();

        let text = serde_json::to_string(&field).unwrap();
        assert_eq!(text, r#"{"type":"String","minlength":3,"required":true}"#);
    }

    #[test]
    fn test_reference_array_shape() {
        let mut field = FieldDefinition::scalar(TargetType::ObjectId);
        field.set_option("ref", json!("User"));
        let def = Definition::ReferenceArray(field);

        assert_eq!(
            def.to_json().unwrap(),
            json!([{ "type": "ObjectId", "ref": "User" }])
        );
        assert_eq!(def.reference(), None);
    }

    #[test]
    fn test_merge_annotation_overrides_in_place() {
        let mut field = FieldDefinition::scalar(TargetType::Number);
        field.set_option("min", json!(3));
        field.set_option("max", json!(5));
        field.merge_annotation(&Annotation::new().with("min", 1).with("index", true));

        let keys: Vec<&String> = field.options.keys().collect();
        assert_eq!(keys, vec!["min", "max", "index"]);
        assert_eq!(field.option("min"), Some(&json!(1)));
    }

    #[test]
    fn test_reference_typed() {
        assert!(FieldDefinition::scalar(TargetType::ObjectId).is_reference_typed());
        assert!(!FieldDefinition::scalar(TargetType::String).is_reference_typed());

        let mut by_name = FieldDefinition::scalar(TargetType::String);
        by_name.set_option("ref", json!("User"));
        assert!(!by_name.is_reference_typed());

        let mut overridden = FieldDefinition::scalar(TargetType::String);
        overridden.merge_annotation(&Annotation::new().with("type", "ObjectId"));
        assert!(overridden.is_reference_typed());
    }

    #[test]
    fn test_annotation_type_replaces_computed_type() {
        let mut field = FieldDefinition::scalar(TargetType::Number);
        field.set_option("min", json!(0));
        field.merge_annotation(&Annotation::new().with("type", "Decimal128"));

        assert_eq!(field.field_type, FieldType::Override(json!("Decimal128")));
        assert_eq!(field.option("type"), None);
        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"type":"Decimal128","min":0}"#
        );
    }

    #[test]
    fn test_schema_definition_preserves_insert_order() {
        let mut schema = SchemaDefinition::new();
        schema.insert("b", FieldDefinition::scalar(TargetType::String).into());
        schema.insert("a", FieldDefinition::scalar(TargetType::Number).into());
        schema.insert("b", FieldDefinition::scalar(TargetType::Boolean).into());

        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            serde_json::to_string(&schema).unwrap(),
            r#"{"b":{"type":"Boolean"},"a":{"type":"Number"}}"#
        );
    }

    #[test]
    fn test_into_field_wraps_nested() {
        let mut inner = SchemaDefinition::new();
        inner.insert("street", FieldDefinition::scalar(TargetType::String).into());

        let field = Definition::Nested(inner).into_field();
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({ "type": { "street": { "type": "String" } } })
        );
    }
}
