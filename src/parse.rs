//! Schema Node Parsing
//!
//! Turns TypeBox-style JSON into the typed [`SchemaNode`] model. Kind markers in
//! the source format are not mutually exclusive, so detection follows a fixed
//! order and the first match wins:
//!
//! 1. `type` is a primitive tag (`string`, `integer`, `number`, `boolean`, `Date`, `Uint8Array`)
//! 2. `type` is `object`
//! 3. `type` is `array`
//! 4. `$ref` is present
//! 5. `anyOf` is present (union of literals)
//! 6. `kind` is `Any` (wildcard)
//!
//! A string `type` outside the table is an unsupported primitive kind; anything
//! else is an unsupported node.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::node::{
    Annotation, AnyNode, ArrayNode, EnumerationNode, ObjectNode, PrimitiveKind, PrimitiveNode,
    ReferenceNode, SchemaNode,
};

/// Default key of the annotation bag
pub const DEFAULT_ANNOTATION_KEY: &str = "mongoose";

/// Key carrying the TypeBox kind marker
pub const KIND_KEY: &str = "kind";

/// Default nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser from raw JSON schemas to [`SchemaNode`]
#[derive(Debug, Clone)]
pub struct SchemaParser {
    annotation_key: String,
    max_depth: usize,
}

impl Default for SchemaParser {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATION_KEY, DEFAULT_MAX_DEPTH)
    }
}

impl SchemaParser {
    pub fn new(annotation_key: impl Into<String>, max_depth: usize) -> Self {
        Self {
            annotation_key: annotation_key.into(),
            max_depth,
        }
    }

    pub fn annotation_key(&self) -> &str {
        &self.annotation_key
    }

    /// Parse a single schema node
    pub fn parse(&self, schema: &Value) -> Result<SchemaNode> {
        self.parse_at(schema, 0)
    }

    fn parse_at(&self, schema: &Value, depth: usize) -> Result<SchemaNode> {
        if depth > self.max_depth {
            return Err(SchemaError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let obj = schema.as_object().ok_or_else(|| SchemaError::unsupported(schema))?;
        let annotation = self.annotation(obj)?;
        let json_type = obj.get("type").and_then(|v| v.as_str());

        if let Some(kind) = json_type.and_then(PrimitiveKind::from_tag) {
            debug!(kind = kind.tag(), depth, "primitive node");
            let attributes: Map<String, Value> = obj
                .iter()
                .filter(|(k, _)| *k != "type" && **k != self.annotation_key)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            return Ok(SchemaNode::Primitive(PrimitiveNode {
                kind,
                attributes,
                annotation,
            }));
        }

        match json_type {
            Some("object") => return self.parse_object(obj, annotation, depth),
            Some("array") => return self.parse_array(schema, obj, annotation, depth),
            _ => {}
        }

        if let Some(target) = obj.get("$ref") {
            let target = target.as_str().ok_or_else(|| SchemaError::unsupported(schema))?;
            debug!(reference = target, depth, "reference node");
            return Ok(SchemaNode::Reference(ReferenceNode {
                target: target.to_string(),
                annotation,
            }));
        }

        if let Some(any_of) = obj.get("anyOf") {
            return self.parse_enumeration(any_of, annotation, depth);
        }

        if obj.get(KIND_KEY).and_then(|v| v.as_str()) == Some("Any") {
            debug!(depth, "wildcard node");
            return Ok(SchemaNode::Any(AnyNode { annotation }));
        }

        match json_type {
            Some(other) => Err(SchemaError::UnsupportedPrimitiveKind(other.to_string())),
            None => Err(SchemaError::unsupported(schema)),
        }
    }

    fn annotation(&self, obj: &Map<String, Value>) -> Result<Option<Annotation>> {
        obj.get(&self.annotation_key)
            .map(Annotation::from_value)
            .transpose()
    }

    fn parse_object(
        &self,
        obj: &Map<String, Value>,
        annotation: Option<Annotation>,
        depth: usize,
    ) -> Result<SchemaNode> {
        let required: Vec<String> = obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();

        let mut properties = Vec::new();
        if let Some(props) = obj.get("properties").and_then(|v| v.as_object()) {
            for (name, prop) in props {
                properties.push((name.clone(), self.parse_at(prop, depth + 1)?));
            }
        }

        debug!(fields = properties.len(), depth, "object node");
        Ok(SchemaNode::Object(ObjectNode {
            properties,
            required,
            annotation,
        }))
    }

    fn parse_array(
        &self,
        schema: &Value,
        obj: &Map<String, Value>,
        annotation: Option<Annotation>,
        depth: usize,
    ) -> Result<SchemaNode> {
        // Tuple arrays (`items` as a list) have no single element type
        let items = obj
            .get("items")
            .filter(|v| v.is_object())
            .ok_or_else(|| SchemaError::unsupported(schema))?;

        debug!(depth, "array node");
        Ok(SchemaNode::Array(ArrayNode {
            items: Box::new(self.parse_at(items, depth + 1)?),
            annotation,
        }))
    }

    fn parse_enumeration(
        &self,
        any_of: &Value,
        annotation: Option<Annotation>,
        depth: usize,
    ) -> Result<SchemaNode> {
        let options = any_of.as_array().ok_or_else(|| SchemaError::MalformedEnumeration {
            reason: format!("anyOf must be an array, found {}", any_of),
        })?;
        let first = options.first().ok_or_else(|| SchemaError::MalformedEnumeration {
            reason: "anyOf has no options".to_string(),
        })?;

        let values = options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                option.get("const").cloned().ok_or_else(|| SchemaError::MalformedEnumeration {
                    reason: format!("option {} has no const literal", i),
                })
            })
            .collect::<Result<Vec<Value>>>()?;

        debug!(options = values.len(), depth, "enumeration node");
        let base = self.parse_at(first, depth + 1)?;
        Ok(SchemaNode::Enumeration(EnumerationNode {
            base: Box::new(base),
            values,
            annotation,
        }))
    }
}

/// Parse with the default annotation key and depth limit
pub fn parse_node(schema: &Value) -> Result<SchemaNode> {
    SchemaParser::default().parse(schema)
}
