// End-to-end scenarios, one test per case. These are the same literal
// input/output pairs the component deciders are unit-tested against
// individually; here they run through the full public pipeline
// (meta-validation, $ref resolution, canonicalization, decision).

use serde_json::json;
use subschema::{is_subschema, SchemaError};

#[test]
fn scenario_1_widened_type_union() {
    let lhs = json!({"type": "integer"});
    let rhs = json!({"type": ["integer", "string"]});
    assert!(is_subschema(&lhs, &rhs).unwrap());
}

#[test]
fn scenario_2_unrelated_types() {
    let lhs = json!({"type": "string"});
    let rhs = json!({"type": "integer"});
    assert!(!is_subschema(&lhs, &rhs).unwrap());
}

#[test]
fn scenario_3_bottom_is_subtype_of_anything() {
    let lhs = json!({"allOf": [{"type": "string"}, {"type": "integer"}]});
    let rhs = json!({"type": "string"});
    assert!(is_subschema(&lhs, &rhs).unwrap());
}

#[test]
fn scenario_4_narrower_required_set() {
    let lhs = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "required": ["name"]
    });
    let rhs = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}, "email": {"type": "string"}},
        "required": ["name", "email"]
    });
    assert!(!is_subschema(&lhs, &rhs).unwrap());
    assert!(is_subschema(&rhs, &lhs).unwrap());
}

#[test]
fn scenario_5_number_interval_vs_integer_interval() {
    let lhs = json!({"type": "number", "minimum": 5.5});
    let rhs = json!({"type": "integer", "minimum": 6});
    assert!(!is_subschema(&lhs, &rhs).unwrap());
    assert!(is_subschema(&rhs, &lhs).unwrap());
}

#[test]
fn scenario_6_integer_equivalent_multiple_of() {
    let lhs = json!({"type": "number", "multipleOf": 1.0});
    let rhs = json!({"type": "integer"});
    assert!(is_subschema(&lhs, &rhs).unwrap());
    assert!(is_subschema(&rhs, &lhs).unwrap());
}

#[test]
fn scenario_7_negated_array_on_rhs_is_unsupported() {
    let lhs = json!({"type": "array"});
    let rhs = json!({"not": {"type": "array", "items": {"type": "string"}}});
    let err = is_subschema(&lhs, &rhs).unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedNegatedArray(_)));
}

#[test]
fn scenario_8_recursive_ref_on_rhs_is_rejected() {
    let lhs = json!({"type": "object"});
    let rhs = json!({
        "definitions": {
            "person": {
                "type": "object",
                "properties": {"friend": {"$ref": "#/definitions/person"}}
            }
        },
        "$ref": "#/definitions/person"
    });
    let err = is_subschema(&lhs, &rhs).unwrap_err();
    match err {
        SchemaError::UnsupportedRecursiveRef { which_side, .. } => {
            assert_eq!(format!("{which_side}"), "RHS");
        }
        other => panic!("expected UnsupportedRecursiveRef, got {other:?}"),
    }
}

#[test]
fn scenario_9_enum_subset() {
    let lhs = json!({"enum": [1, 2]});
    let rhs = json!({"enum": [1, 2, 3, 4]});
    assert!(is_subschema(&lhs, &rhs).unwrap());
    assert!(!is_subschema(&rhs, &lhs).unwrap());
}

#[test]
fn scenario_10_pattern_properties_narrows_bare_object() {
    let lhs = json!({"type": "object", "patternProperties": {"^num": {"type": "number"}}});
    let rhs = json!({"type": "object"});
    assert!(is_subschema(&lhs, &rhs).unwrap());
    assert!(!is_subschema(&rhs, &lhs).unwrap());
}
