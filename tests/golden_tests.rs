//! Golden Tests for Schema Translation
//!
//! Translates fixture schemas end to end and checks the emitted definitions.

use std::path::{Path, PathBuf};

use odm_schemas::{
    export_directory, translate, Annotation, ExportConfig, PrimitiveKind, SchemaDefinition,
    SchemaError, SchemaNode, TargetType, Translator,
};
use serde_json::{json, Value};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> Value {
    let text = std::fs::read_to_string(fixtures_path().join(name)).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn translate_fixture(name: &str) -> SchemaDefinition {
    translate(&fixture(name)).unwrap()
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn test_required_string_scenario() {
    let out = translate_fixture("required_string.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({ "s": { "type": "String", "minlength": 3, "default": "hi", "required": true } })
    );
}

#[test]
fn test_optional_number_scenario() {
    let out = translate_fixture("optional_number.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({ "n": { "type": "Number", "min": 3, "max": 10 } })
    );
}

#[test]
fn test_annotated_ref_array_scenario() {
    let out = translate_fixture("ref_array.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({ "arr": [{ "type": "ObjectId", "ref": "Other" }] })
    );
}

#[test]
fn test_literal_enum_scenario() {
    let out = translate_fixture("literal_enum.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({ "lit": { "type": "String", "enum": ["a", "b", "c"], "required": true } })
    );
}

// =============================================================================
// Petstore
// =============================================================================

#[test]
fn test_order_schema() {
    let out = translate_fixture("order.schema.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({
            "id": { "type": "Number", "unique": true, "required": true },
            "petId": { "type": "ObjectId", "ref": "Pets" },
            "quantity": { "type": "Number", "min": 0, "required": true },
            "shipDate": { "type": "Date", "min": "2020-01-01T00:00:00.000Z", "required": true },
            "status": {
                "type": "String",
                "enum": ["placed", "approved", "delivered"],
                "required": true
            },
            "complete": { "type": "Boolean", "default": false, "required": true }
        })
    );
}

#[test]
fn test_pet_schema() {
    let out = translate_fixture("pet.schema.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({
            "id": { "type": "Number", "unique": true, "required": true },
            "category": {
                "id": { "type": "Number", "required": true },
                "name": { "type": "String", "required": true }
            },
            "name": { "type": "String", "required": true },
            "photoUrls": { "type": ["String"], "required": true },
            "tags": {
                "type": [{
                    "id": { "type": "Number", "required": true },
                    "name": { "type": "String", "required": true }
                }],
                "required": true
            },
            "owner": { "type": "String", "ref": "Users", "required": true },
            "extra": { "type": "Mixed", "required": true },
            "status": {
                "type": "String",
                "enum": ["available", "pending", "sold"],
                "required": true
            }
        })
    );
}

#[test]
fn test_user_schema() {
    let out = translate_fixture("user.schema.json");
    assert_eq!(
        out.to_json().unwrap(),
        json!({
            "id": { "type": "Number", "required": true },
            "username": { "type": "String", "maxlength": 32, "unique": true, "required": true },
            "avatar": { "type": "Buffer", "minlength": 5, "required": true },
            "createdAt": { "type": "Date", "default": "2020-01-01T00:00:00.000Z", "required": true },
            "orders": [{ "type": "String", "ref": "Orders" }]
        })
    );
}

// =============================================================================
// Laws
// =============================================================================

#[test]
fn test_declaration_order_is_preserved() {
    let out = translate_fixture("pet.schema.json");
    assert_eq!(
        out.keys().collect::<Vec<_>>(),
        vec!["id", "category", "name", "photoUrls", "tags", "owner", "extra", "status"]
    );

    let text = serde_json::to_string(&out).unwrap();
    let positions: Vec<usize> = ["\"id\"", "\"category\"", "\"photoUrls\"", "\"status\""]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_primitive_table_law() {
    let cases = [
        (PrimitiveKind::String, TargetType::String),
        (PrimitiveKind::Integer, TargetType::Number),
        (PrimitiveKind::Number, TargetType::Number),
        (PrimitiveKind::Boolean, TargetType::Boolean),
        (PrimitiveKind::Date, TargetType::Date),
        (PrimitiveKind::Uint8Array, TargetType::Buffer),
    ];
    let translator = Translator::default();

    for (kind, expected) in cases {
        let plain = odm_schemas::node::PrimitiveNode::new(kind);
        let referenced = plain.clone().reference_to("Other");

        let plain_def = translator.translate_node(&plain.into()).unwrap();
        let referenced_def = translator.translate_node(&referenced.into()).unwrap();

        assert_eq!(plain_def.to_json().unwrap()["type"], json!(expected.as_str()));
        assert_eq!(referenced_def.to_json().unwrap()["type"], json!("ObjectId"));
    }
}

#[test]
fn test_required_flag_law() {
    let root = SchemaNode::object()
        .field("name", SchemaNode::string())
        .field("owner", SchemaNode::string().reference_to("User"))
        .field("friends", SchemaNode::array(SchemaNode::string().reference_to("User")))
        .field("pet", SchemaNode::reference("Pets"))
        .optional_field("nickname", SchemaNode::string());

    let out = Translator::default().translate_root(&root.into()).unwrap();
    let required: Vec<&str> = out
        .iter()
        .filter(|(_, def)| def.as_field().map(|f| f.is_required()).unwrap_or(false))
        .map(|(name, _)| name)
        .collect();
    assert_eq!(required, vec!["name", "pet"]);
}

#[test]
fn test_annotation_override_law() {
    let annotation = Annotation::new().with("min", 1).with("default", 7);
    let node = SchemaNode::number().minimum(3).maximum(10).default_value(5).annotate(annotation.clone());

    let def = Translator::default().translate_node(&node.into()).unwrap();
    let field = def.as_field().unwrap();
    for (key, value) in annotation.entries() {
        assert_eq!(field.option(key), Some(value));
    }
    assert_eq!(field.option("max"), Some(&json!(10)));

    let retyped = SchemaNode::number()
        .minimum(3)
        .annotate(Annotation::new().with("type", "Decimal128"));
    let def = Translator::default().translate_node(&retyped.into()).unwrap();
    assert_eq!(def.to_json().unwrap(), json!({ "type": "Decimal128", "min": 3 }));
}

#[test]
fn test_enumeration_law() {
    let values = vec![json!("x"), json!("y"), json!("z"), json!("w")];
    let union = SchemaNode::literal_union(values.clone()).unwrap();
    let translator = Translator::default();

    let union_def = translator.translate_node(&union.into()).unwrap().to_json().unwrap();
    let first_def = translator
        .translate_node(&SchemaNode::string().into())
        .unwrap()
        .to_json()
        .unwrap();

    assert_eq!(union_def["type"], first_def["type"]);
    assert_eq!(union_def["enum"], Value::Array(values));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unsupported_field_aborts_translation() {
    let schema = json!({
        "type": "object",
        "properties": {
            "ok": { "type": "string" },
            "bad": { "oneOf": [{ "type": "string" }] }
        }
    });

    match translate(&schema) {
        Err(SchemaError::UnsupportedNode { node }) => assert!(node.contains("oneOf")),
        other => panic!("Expected UnsupportedNode, got {:?}", other),
    }
}

#[test]
fn test_non_object_root_is_rejected() {
    assert!(matches!(
        translate(&json!({ "type": "string" })),
        Err(SchemaError::NotAnObject { .. })
    ));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_fixture_directory() {
    let output = tempfile::tempdir().unwrap();
    let manifest = export_directory(
        &fixtures_path(),
        output.path(),
        &Translator::default(),
        &ExportConfig::default(),
    )
    .unwrap();

    let names: Vec<&str> = manifest.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["literal_enum", "optional_number", "order", "pet", "ref_array", "required_string", "user"]
    );

    for entry in &manifest.entries {
        let written = std::fs::read_to_string(output.path().join(&entry.output_file)).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert!(entry.checksum.verify(&serde_json::to_vec(&value).unwrap()));
    }
}
