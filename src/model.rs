//! Model schemas
//!
//! A [`ModelSchema`] pairs a translated definition with the schema-level
//! options of the object-modeling layer (`timestamps`, `collection`, ...).
//! Those options are opaque here and passed through untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::definition::SchemaDefinition;
use crate::error::Result;
use crate::node::SchemaNode;
use crate::translate::Translator;

/// Translated definition plus pass-through options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchema {
    pub definition: SchemaDefinition,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ModelSchema {
    /// Translate `root` and attach `options`
    pub fn new(translator: &Translator, root: &SchemaNode, options: Map<String, Value>) -> Result<Self> {
        Ok(Self {
            definition: translator.translate_root(root)?,
            options,
        })
    }

    /// Parse and translate a raw JSON root schema
    pub fn from_value(translator: &Translator, schema: &Value, options: Map<String, Value>) -> Result<Self> {
        Ok(Self {
            definition: translator.translate_value(schema)?,
            options,
        })
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
