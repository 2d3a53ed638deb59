//! Primitive translation and the static lookup tables

use crate::definition::{FieldDefinition, TargetType};
use crate::node::{PrimitiveKind, PrimitiveNode};

/// Primitive kind to target type
pub const PRIMITIVE_TYPES: &[(PrimitiveKind, TargetType)] = &[
    (PrimitiveKind::String, TargetType::String),
    (PrimitiveKind::Integer, TargetType::Number),
    (PrimitiveKind::Number, TargetType::Number),
    (PrimitiveKind::Boolean, TargetType::Boolean),
    (PrimitiveKind::Date, TargetType::Date),
    (PrimitiveKind::Uint8Array, TargetType::Buffer),
];

/// Source constraint keyword to target option name
pub const OPTION_RENAMES: &[(&str, &str)] = &[
    ("maxLength", "maxlength"),
    ("minLength", "minlength"),
    ("minimum", "min"),
    ("maximum", "max"),
    ("default", "default"),
    ("minByteLength", "minlength"),
];

/// Target type for a primitive kind
pub fn target_type(kind: PrimitiveKind) -> TargetType {
    PRIMITIVE_TYPES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, t)| *t)
        .unwrap_or(TargetType::Mixed)
}

/// Target option name for a source keyword, if it is carried over
pub fn renamed_option(keyword: &str) -> Option<&'static str> {
    OPTION_RENAMES
        .iter()
        .find(|(source, _)| *source == keyword)
        .map(|(_, target)| *target)
}

/// Translate a primitive node.
///
/// A `ref` in the annotation forces the opaque identifier type. Annotation
/// entries are merged last and win on collision, so an annotated `type`
/// replaces both.
pub(crate) fn translate_primitive(node: &PrimitiveNode) -> FieldDefinition {
    let references_entity = node
        .annotation
        .as_ref()
        .and_then(|a| a.ref_name())
        .is_some();

    let target = if references_entity {
        TargetType::ObjectId
    } else {
        target_type(node.kind)
    };

    let mut def = FieldDefinition::scalar(target);
    for (keyword, value) in &node.attributes {
        if let Some(option) = renamed_option(keyword) {
            def.set_option(option, value.clone());
        }
    }

    if let Some(annotation) = &node.annotation {
        def.merge_annotation(annotation);
    }

    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Annotation, SchemaNode};
    use serde_json::json;

    #[test]
    fn test_every_kind_has_a_table_entry() {
        for kind in [
            PrimitiveKind::String,
            PrimitiveKind::Integer,
            PrimitiveKind::Number,
            PrimitiveKind::Boolean,
            PrimitiveKind::Date,
            PrimitiveKind::Uint8Array,
        ] {
            assert!(PRIMITIVE_TYPES.iter().any(|(k, _)| *k == kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_renames() {
        assert_eq!(renamed_option("maxLength"), Some("maxlength"));
        assert_eq!(renamed_option("minByteLength"), Some("minlength"));
        assert_eq!(renamed_option("maxByteLength"), None);
        assert_eq!(renamed_option("format"), None);
    }

    #[test]
    fn test_buffer_drops_max_byte_length() {
        let node = SchemaNode::uint8_array()
            .min_byte_length(5)
            .attribute("maxByteLength", 10);
        let def = translate_primitive(&node);

        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({ "type": "Buffer", "minlength": 5 })
        );
    }

    #[test]
    fn test_ref_annotation_forces_object_id() {
        let node = SchemaNode::number().minimum(0).reference_to("Pets");
        let def = translate_primitive(&node);

        assert_eq!(def.field_type, crate::definition::FieldType::Scalar(TargetType::ObjectId));
        assert_eq!(def.reference(), Some("Pets"));
        assert_eq!(def.option("min"), Some(&json!(0)));
    }

    #[test]
    fn test_annotation_wins_on_collision() {
        let node = SchemaNode::string()
            .max_length(10)
            .annotate(Annotation::new().with("maxlength", 20).with("unique", true));
        let def = translate_primitive(&node);

        assert_eq!(def.option("maxlength"), Some(&json!(20)));
        assert_eq!(def.option("unique"), Some(&json!(true)));
    }

    #[test]
    fn test_annotation_type_wins() {
        let node = SchemaNode::number()
            .minimum(0)
            .annotate(Annotation::new().with("type", "Decimal128"));
        let def = translate_primitive(&node);

        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({ "type": "Decimal128", "min": 0 })
        );
    }
}
