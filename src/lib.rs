//! ODM Schema Translation
//!
//! Derives document-store field definitions from TypeBox-style schema nodes,
//! so an application can keep a single source-of-truth schema.
//!
//! ## Features
//!
//! - **Typed Nodes**: Input schemas become a [`SchemaNode`] sum type
//! - **Annotations**: Store-specific overrides ride along under a well-known key
//! - **Ordered Output**: Field declaration order survives translation
//! - **Reference Handling**: Entity references map to identifier fields, which are never required
//! - **Batch Export**: Whole directories with checksums and a manifest
//!
//! ## Mapping
//!
//! ```text
//! string      -> String
//! integer     -> Number
//! number      -> Number
//! boolean     -> Boolean
//! Date        -> Date
//! Uint8Array  -> Buffer
//! kind: Any   -> Mixed
//! ref         -> ObjectId
//! ```
//!
//! ```
//! use odm_schemas::translate;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": { "name": { "type": "string", "minLength": 3 } },
//!     "required": ["name"]
//! });
//! let definition = translate(&schema).unwrap();
//! assert_eq!(
//!     definition.to_json().unwrap(),
//!     json!({ "name": { "type": "String", "minlength": 3, "required": true } })
//! );
//! ```

pub mod checksum;
pub mod config;
pub mod definition;
pub mod error;
pub mod export;
pub mod model;
pub mod node;
pub mod parse;
pub mod translate;

pub use checksum::Checksum;
pub use config::{ExportConfig, OdmConfig, OutputFormat, TranslateConfig};
pub use definition::{Definition, FieldDefinition, FieldType, SchemaDefinition, TargetType};
pub use error::{Result, SchemaError};
pub use export::{export_directory, ExportEntry, ExportManifest};
pub use model::ModelSchema;
pub use node::{Annotation, PrimitiveKind, SchemaNode};
pub use parse::{parse_node, SchemaParser};
pub use translate::{translate, RequiredPolicy, Translator, TranslatorOptions};
