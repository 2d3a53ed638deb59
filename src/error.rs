//! Error types for schema translation

use thiserror::Error;

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema translation errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Could not parse entry: {node}")]
    UnsupportedNode { node: String },

    #[error("Unsupported primitive kind: {0}")]
    UnsupportedPrimitiveKind(String),

    #[error("Malformed enumeration: {reason}")]
    MalformedEnumeration { reason: String },

    #[error("Root schema must be an object, found {found}")]
    NotAnObject { found: String },

    #[error("Invalid annotation: {reason}")]
    InvalidAnnotation { reason: String },

    #[error("Schema nesting exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Build an `UnsupportedNode` error carrying the node's JSON dump
    pub fn unsupported(node: &serde_json::Value) -> Self {
        Self::UnsupportedNode {
            node: serde_json::to_string(node).unwrap_or_else(|_| "<unserializable>".to_string()),
        }
    }
}
