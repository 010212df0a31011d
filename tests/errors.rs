// One minimal reproduction per `SchemaError` variant (spec §7), grounded
// on the original `jsonsubschema` project's own `test_exceptions.py`: a
// small, named schema pair per failure mode rather than a single grab-bag
// test.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use subschema::{is_subschema, is_subschema_with_options, DecisionOptions, SchemaError};

#[test]
fn malformed_json_is_reported_by_the_cli_layer_not_the_library() {
    // The library only ever receives already-parsed `serde_json::Value`s;
    // `MalformedJson` is reachable through `serde_json::Error`'s `From`
    // impl, exercised here directly rather than through a CLI process.
    let err: Result<Value, serde_json::Error> = serde_json::from_str("{not json");
    let wrapped: SchemaError = err.unwrap_err().into();
    assert!(matches!(wrapped, SchemaError::MalformedJson(_)));
}

#[test]
fn malformed_schema_fails_meta_validation() {
    let lhs = json!({"type": "number", "multipleOf": 0});
    let rhs = json!({"type": "number"});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::MalformedSchema(_))
    ));
}

#[test]
fn unresolved_ref_to_a_missing_pointer() {
    let lhs = json!({"$ref": "#/definitions/missing"});
    let rhs = json!({"type": "integer"});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::UnresolvedRef(_))
    ));
}

#[test]
fn unsupported_recursive_ref() {
    let lhs = json!({
        "definitions": {
            "person": {
                "type": "object",
                "properties": {"friend": {"$ref": "#/definitions/person"}}
            }
        },
        "$ref": "#/definitions/person"
    });
    let rhs = json!({"type": "object"});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::UnsupportedRecursiveRef { .. })
    ));
}

#[test]
fn unsupported_enum_canonicalization_for_array_literals() {
    let lhs = json!({"enum": [[1, 2], [3, 4]]});
    let rhs = json!({"type": "array"});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::UnsupportedEnumCanonicalization(_))
    ));
}

#[test]
fn unsupported_negated_array() {
    let lhs = json!({"type": "array"});
    let rhs = json!({"not": {"type": "array", "items": {"type": "string"}}});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::UnsupportedNegatedArray(_))
    ));
}

#[test]
fn unsupported_negated_object() {
    let lhs = json!({"type": "object"});
    let rhs = json!({"not": {"type": "object", "properties": {"a": {"type": "string"}}}});
    assert!(matches!(
        is_subschema(&lhs, &rhs),
        Err(SchemaError::UnsupportedNegatedObject(_))
    ));
}

#[test]
fn regex_unsupported_when_the_dfa_state_cap_is_exhausted() {
    let lhs = json!({"type": "string", "pattern": "^a.*b$"});
    let rhs = json!({"type": "string", "pattern": "^c.*d$"});
    let opts = DecisionOptions {
        dfa_state_cap: 0,
        ..Default::default()
    };
    assert!(matches!(
        is_subschema_with_options(&lhs, &rhs, &opts),
        Err(SchemaError::RegexUnsupported(_))
    ));
}

#[test]
fn undecided_once_the_deadline_has_passed() {
    let lhs = json!({"type": "object", "properties": {"a": {"type": "string"}}});
    let rhs = json!({"type": "object", "properties": {"a": {"type": "string"}}});
    let opts = DecisionOptions {
        deadline: Some(Instant::now() - Duration::from_secs(1)),
        ..Default::default()
    };
    assert!(matches!(
        is_subschema_with_options(&lhs, &rhs, &opts),
        Err(SchemaError::Undecided)
    ));
}
