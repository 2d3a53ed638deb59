//! Schema Translation
//!
//! Recursive walk from [`SchemaNode`] to [`Definition`]. Every node kind has
//! one translator; the dispatcher matches the node sum type exhaustively.
//!
//! Rules applied on the way:
//! - a node's annotation bag is merged over its definition (override wins)
//! - object fields listed as required get `required: true`, unless the field
//!   holds an opaque identifier (see [`RequiredPolicy`] for nested objects)
//! - arrays of references collapse to `[ { type, ref } ]`
//! - unions of literals take their type from the first option

pub mod primitive;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::definition::{Definition, FieldDefinition, FieldType, SchemaDefinition, TargetType, ENUM_KEY};
use crate::error::{Result, SchemaError};
use crate::node::{
    Annotation, ArrayNode, EnumerationNode, ObjectNode, ReferenceNode, SchemaNode, REF_KEY,
};
use crate::parse::{SchemaParser, DEFAULT_ANNOTATION_KEY, DEFAULT_MAX_DEPTH};

pub use primitive::{renamed_option, target_type, OPTION_RENAMES, PRIMITIVE_TYPES};

// =============================================================================
// Options
// =============================================================================

/// Which object fields may carry `required: true`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPolicy {
    /// Only `{ type, ... }` descriptors; nested objects are left as-is
    #[default]
    LeavesOnly,
    /// Required nested objects are wrapped as `{ type: { ... }, required: true }`
    IncludeNested,
}

/// Translator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Key of the annotation bag in raw JSON schemas
    pub annotation_key: String,
    pub required_policy: RequiredPolicy,
    /// Maximum node nesting depth
    pub max_depth: usize,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            annotation_key: DEFAULT_ANNOTATION_KEY.to_string(),
            required_policy: RequiredPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// =============================================================================
// Translator
// =============================================================================

/// Stateless schema translator
#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(options: TranslatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Parser configured with this translator's annotation key and depth limit
    pub fn parser(&self) -> SchemaParser {
        SchemaParser::new(self.options.annotation_key.clone(), self.options.max_depth)
    }

    /// Parse and translate a raw JSON root schema
    pub fn translate_value(&self, schema: &Value) -> Result<SchemaDefinition> {
        let root = self.parser().parse(schema)?;
        self.translate_root(&root)
    }

    /// Translate a root node, which must be an object
    pub fn translate_root(&self, root: &SchemaNode) -> Result<SchemaDefinition> {
        match root {
            SchemaNode::Object(node) => self.translate_object(node, 0),
            other => Err(SchemaError::NotAnObject {
                found: other.kind_name().to_string(),
            }),
        }
    }

    /// Translate any node
    pub fn translate_node(&self, node: &SchemaNode) -> Result<Definition> {
        self.translate_at(node, 0)
    }

    fn translate_at(&self, node: &SchemaNode, depth: usize) -> Result<Definition> {
        if depth > self.options.max_depth {
            return Err(SchemaError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        debug!(kind = node.kind_name(), depth, "translating node");
        match node {
            SchemaNode::Primitive(n) => Ok(Definition::Field(primitive::translate_primitive(n))),
            SchemaNode::Object(n) => {
                let fields = self.translate_object(n, depth)?;
                Ok(with_annotation(Definition::Nested(fields), n.annotation.as_ref()))
            }
            SchemaNode::Array(n) => self.translate_array(n, depth),
            SchemaNode::Reference(n) => Ok(translate_reference(n)),
            SchemaNode::Enumeration(n) => self.translate_enumeration(n, depth),
            SchemaNode::Any(n) => Ok(with_annotation(
                FieldDefinition::scalar(TargetType::Mixed).into(),
                n.annotation.as_ref(),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Object
    // -------------------------------------------------------------------------

    fn translate_object(&self, node: &ObjectNode, depth: usize) -> Result<SchemaDefinition> {
        let mut fields = SchemaDefinition::new();

        for (name, child) in &node.properties {
            let mut def = self.translate_at(child, depth + 1)?;
            if node.is_required(name) {
                def = self.mark_required(def);
            }
            fields.insert(name.clone(), def);
        }

        Ok(fields)
    }

    fn mark_required(&self, def: Definition) -> Definition {
        match def {
            Definition::Field(mut field) if !field.is_reference_typed() => {
                field.set_required();
                Definition::Field(field)
            }
            Definition::Nested(fields) if self.options.required_policy == RequiredPolicy::IncludeNested => {
                let mut field = FieldDefinition::new(FieldType::Nested(fields));
                field.set_required();
                Definition::Field(field)
            }
            other => other,
        }
    }

    // -------------------------------------------------------------------------
    // Array
    // -------------------------------------------------------------------------

    fn translate_array(&self, node: &ArrayNode, depth: usize) -> Result<Definition> {
        let item = self.translate_at(&node.items, depth + 1)?;

        match item {
            Definition::Field(mut field) if field.reference().is_some() => {
                if let Some(annotation) = &node.annotation {
                    field.merge_annotation(annotation);
                }
                Ok(Definition::ReferenceArray(field))
            }
            other => Ok(self.wrap_array(other, node)),
        }
    }

    fn wrap_array(&self, item: Definition, node: &ArrayNode) -> Definition {
        let field_type = match item {
            Definition::Field(FieldDefinition {
                field_type: FieldType::Scalar(target),
                ..
            }) if node.items.is_primitive() => FieldType::ScalarArray(target),
            other => FieldType::DefinitionArray(Box::new(other)),
        };

        with_annotation(FieldDefinition::new(field_type).into(), node.annotation.as_ref())
    }

    // -------------------------------------------------------------------------
    // Enumeration
    // -------------------------------------------------------------------------

    fn translate_enumeration(&self, node: &EnumerationNode, depth: usize) -> Result<Definition> {
        let mut field = self.translate_at(&node.base, depth + 1)?.into_field();
        field.set_option(ENUM_KEY, Value::Array(node.values.clone()));

        if let Some(annotation) = &node.annotation {
            field.merge_annotation(annotation);
        }

        Ok(Definition::Field(field))
    }
}

fn translate_reference(node: &ReferenceNode) -> Definition {
    let mut field = FieldDefinition::scalar(TargetType::String);
    field.set_option(REF_KEY, Value::String(node.target.clone()));

    with_annotation(field.into(), node.annotation.as_ref())
}

/// Merge an annotation, promoting nested objects to `{ type: { ... } }` first
fn with_annotation(def: Definition, annotation: Option<&Annotation>) -> Definition {
    match annotation {
        Some(annotation) if !annotation.is_empty() => {
            let mut field = def.into_field();
            field.merge_annotation(annotation);
            Definition::Field(field)
        }
        _ => def,
    }
}

/// Translate a raw JSON root schema with default options
pub fn translate(schema: &Value) -> Result<SchemaDefinition> {
    Translator::default().translate_value(schema)
}
