//! Schema node types
//!
//! The typed input model of the translator. A [`SchemaNode`] is either parsed
//! from TypeBox-style JSON (see [`crate::parse`]) or assembled with the
//! builders below, which mirror `Type.String()`, `Type.Object()` and friends.
//!
//! ```
//! use odm_schemas::SchemaNode;
//!
//! let user = SchemaNode::object()
//!     .field("name", SchemaNode::string().min_length(3))
//!     .optional_field("age", SchemaNode::integer().minimum(0));
//! assert_eq!(user.properties.len(), 2);
//! ```

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

/// Annotation key holding the cross-entity reference name
pub const REF_KEY: &str = "ref";

// =============================================================================
// Primitive Kinds
// =============================================================================

/// Primitive kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
    Date,
    Uint8Array,
}

impl PrimitiveKind {
    /// Parse the `type` tag used by the source schema format
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "Date" => Some(Self::Date),
            "Uint8Array" => Some(Self::Uint8Array),
            _ => None,
        }
    }

    /// The `type` tag used by the source schema format
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "Date",
            Self::Uint8Array => "Uint8Array",
        }
    }

    /// Infer the kind of a literal constant
    fn of_literal(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::String),
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            _ => None,
        }
    }
}

// =============================================================================
// Annotation
// =============================================================================

/// Side-channel overrides for the target document store.
///
/// Entries are merged over the computed field definition and win on key
/// collision, `type` included. The `ref` entry additionally turns a primitive
/// into an entity reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    entries: Map<String, Value>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotation referencing another entity
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new().with(REF_KEY, Value::String(name.into()))
    }

    /// Add an override entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Validate a raw annotation bag
    pub fn from_value(value: &Value) -> Result<Self> {
        let entries = value.as_object().ok_or_else(|| SchemaError::InvalidAnnotation {
            reason: format!("expected an object, found {}", value),
        })?;

        if let Some(reference) = entries.get(REF_KEY) {
            if !reference.is_string() {
                return Err(SchemaError::InvalidAnnotation {
                    reason: format!("`ref` must be a string, found {}", reference),
                });
            }
        }

        Ok(Self {
            entries: entries.clone(),
        })
    }

    /// Referenced entity name, if any
    pub fn ref_name(&self) -> Option<&str> {
        self.entries.get(REF_KEY).and_then(|v| v.as_str())
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

macro_rules! annotatable {
    ($($node:ty),* $(,)?) => {
        $(
            impl $node {
                /// Attach an annotation bag
                pub fn annotate(mut self, annotation: Annotation) -> Self {
                    self.annotation = Some(annotation);
                    self
                }

                /// Mark as a reference to another entity
                pub fn reference_to(self, name: impl Into<String>) -> Self {
                    let annotation = self.annotation.clone().unwrap_or_default();
                    self.annotate(annotation.with(REF_KEY, Value::String(name.into())))
                }
            }
        )*
    };
}

annotatable!(PrimitiveNode, ObjectNode, ArrayNode, ReferenceNode, EnumerationNode, AnyNode);

// =============================================================================
// Node Kinds
// =============================================================================

/// `string`, `integer`, `number`, `boolean`, `Date` or `Uint8Array`
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    pub kind: PrimitiveKind,
    /// Constraint keywords in declaration order (`minLength`, `default`, ...)
    pub attributes: Map<String, Value>,
    pub annotation: Option<Annotation>,
}

impl PrimitiveNode {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            attributes: Map::new(),
            annotation: None,
        }
    }

    /// Set a raw constraint keyword
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn min_length(self, value: u64) -> Self {
        self.attribute("minLength", value)
    }

    pub fn max_length(self, value: u64) -> Self {
        self.attribute("maxLength", value)
    }

    pub fn minimum(self, value: impl Into<Value>) -> Self {
        self.attribute("minimum", value)
    }

    pub fn maximum(self, value: impl Into<Value>) -> Self {
        self.attribute("maximum", value)
    }

    pub fn min_byte_length(self, value: u64) -> Self {
        self.attribute("minByteLength", value)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.attribute("default", value)
    }
}

/// Object with ordered properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    /// Properties in declaration order
    pub properties: Vec<(String, SchemaNode)>,
    /// Names listed in the object's `required` array
    pub required: Vec<String>,
    pub annotation: Option<Annotation>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required property
    pub fn field(self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        let name = name.into();
        let mut this = self.optional_field(name.clone(), node);
        if !this.required.contains(&name) {
            this.required.push(name);
        }
        this
    }

    /// Add a property that is not listed as required
    pub fn optional_field(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        let name = name.into();
        let node = node.into();
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = node,
            None => self.properties.push((name, node)),
        }
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }
}

/// Array with a single element type
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Box<SchemaNode>,
    pub annotation: Option<Annotation>,
}

/// Schema-level `$ref` to another entity
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    pub target: String,
    pub annotation: Option<Annotation>,
}

/// Union of literal constants
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationNode {
    /// Synthetic node built from the first option alone
    pub base: Box<SchemaNode>,
    /// Literal value of every option, in order
    pub values: Vec<Value>,
    pub annotation: Option<Annotation>,
}

impl EnumerationNode {
    pub fn new(base: impl Into<SchemaNode>, values: Vec<Value>) -> Self {
        Self {
            base: Box::new(base.into()),
            values,
            annotation: None,
        }
    }
}

/// Wildcard accepting any value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyNode {
    pub annotation: Option<Annotation>,
}

// =============================================================================
// Schema Node
// =============================================================================

/// One unit of the input schema description
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveNode),
    Object(ObjectNode),
    Array(ArrayNode),
    Reference(ReferenceNode),
    Enumeration(EnumerationNode),
    Any(AnyNode),
}

impl SchemaNode {
    pub fn string() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::String)
    }

    pub fn integer() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::Integer)
    }

    pub fn number() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::Number)
    }

    pub fn boolean() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::Boolean)
    }

    pub fn date() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::Date)
    }

    pub fn uint8_array() -> PrimitiveNode {
        PrimitiveNode::new(PrimitiveKind::Uint8Array)
    }

    pub fn object() -> ObjectNode {
        ObjectNode::new()
    }

    pub fn array(items: impl Into<SchemaNode>) -> ArrayNode {
        ArrayNode {
            items: Box::new(items.into()),
            annotation: None,
        }
    }

    pub fn reference(target: impl Into<String>) -> ReferenceNode {
        ReferenceNode {
            target: target.into(),
            annotation: None,
        }
    }

    pub fn any() -> AnyNode {
        AnyNode::default()
    }

    /// Union of literals, typed after the first literal.
    ///
    /// Fails when `values` is empty or the first literal is not a string,
    /// number or boolean.
    pub fn literal_union<I, V>(values: I) -> Result<EnumerationNode>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let first = values.first().ok_or_else(|| SchemaError::MalformedEnumeration {
            reason: "union has no options".to_string(),
        })?;
        let kind = PrimitiveKind::of_literal(first).ok_or_else(|| SchemaError::MalformedEnumeration {
            reason: format!("literal {} is not a string, number or boolean", first),
        })?;

        Ok(EnumerationNode::new(PrimitiveNode::new(kind), values))
    }

    /// The node's annotation bag, if any
    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            SchemaNode::Primitive(n) => n.annotation.as_ref(),
            SchemaNode::Object(n) => n.annotation.as_ref(),
            SchemaNode::Array(n) => n.annotation.as_ref(),
            SchemaNode::Reference(n) => n.annotation.as_ref(),
            SchemaNode::Enumeration(n) => n.annotation.as_ref(),
            SchemaNode::Any(n) => n.annotation.as_ref(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, SchemaNode::Primitive(_))
    }

    /// Short name of the node kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Primitive(n) => n.kind.tag(),
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
            SchemaNode::Reference(_) => "$ref",
            SchemaNode::Enumeration(_) => "anyOf",
            SchemaNode::Any(_) => "Any",
        }
    }
}

impl From<PrimitiveNode> for SchemaNode {
    fn from(node: PrimitiveNode) -> Self {
        SchemaNode::Primitive(node)
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(node: ObjectNode) -> Self {
        SchemaNode::Object(node)
    }
}

impl From<ArrayNode> for SchemaNode {
    fn from(node: ArrayNode) -> Self {
        SchemaNode::Array(node)
    }
}

impl From<ReferenceNode> for SchemaNode {
    fn from(node: ReferenceNode) -> Self {
        SchemaNode::Reference(node)
    }
}

impl From<EnumerationNode> for SchemaNode {
    fn from(node: EnumerationNode) -> Self {
        SchemaNode::Enumeration(node)
    }
}

impl From<AnyNode> for SchemaNode {
    fn from(node: AnyNode) -> Self {
        SchemaNode::Any(node)
    }
}
