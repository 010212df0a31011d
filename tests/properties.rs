// Algebraic laws from spec §8, checked against a representative sample
// of schemas rather than a property-testing harness -- none of the
// teacher crate or its siblings in the retrieval pack pull in
// proptest/quickcheck, so this follows their own testing idiom of
// hand-picked representative cases instead.

use serde_json::{json, Value};
use subschema::is_subschema;

/// A cross-section of schema shapes: every kind, some enums, some
/// structured types, some already-bottom schemas.
fn samples() -> Vec<Value> {
    vec![
        json!({}),
        json!({"type": "null"}),
        json!({"type": "boolean"}),
        json!({"type": "integer"}),
        json!({"type": "integer", "minimum": 0, "maximum": 100}),
        json!({"type": "number", "minimum": -5.5}),
        json!({"type": "string"}),
        json!({"type": "string", "minLength": 2, "maxLength": 10, "pattern": "^[a-z]+$"}),
        json!({"enum": [1, 2, 3]}),
        json!({"type": "array", "items": {"type": "integer"}}),
        json!({"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}),
        json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}},
            "required": ["id"]
        }),
        json!({"not": {}}),
    ]
}

#[test]
fn reflexivity_holds_for_every_sample() {
    for s in samples() {
        assert!(is_subschema(&s, &s).unwrap(), "{s} is not a subtype of itself");
    }
}

#[test]
fn every_sample_is_a_subtype_of_top() {
    let top = json!({});
    for s in samples() {
        assert!(is_subschema(&s, &top).unwrap(), "{s} is not a subtype of the top schema");
    }
}

#[test]
fn bottom_is_a_subtype_of_every_sample() {
    let bottom = json!({"not": {}});
    for s in samples() {
        assert!(is_subschema(&bottom, &s).unwrap(), "bottom is not a subtype of {s}");
    }
}

#[test]
fn top_is_a_subtype_only_of_schemas_equivalent_to_top() {
    let top = json!({});
    // `{}` is itself equivalent to top.
    assert!(is_subschema(&top, &top).unwrap());
    // A union covering every kind is also equivalent to top.
    let full_union = json!({"anyOf": [
        {"type": "null"}, {"type": "boolean"}, {"type": "number"},
        {"type": "string"}, {"type": "array"}, {"type": "object"}
    ]});
    assert!(is_subschema(&top, &full_union).unwrap());
    // Anything genuinely narrower than top rejects it.
    for s in samples() {
        if s == top {
            continue;
        }
        assert!(!is_subschema(&top, &s).unwrap(), "top wrongly a subtype of narrower schema {s}");
    }
}

#[test]
fn transitivity_holds_on_a_narrowing_chain() {
    let s1 = json!({"type": "integer", "minimum": 5, "maximum": 10});
    let s2 = json!({"type": "integer", "minimum": 0});
    let s3 = json!({"type": "number"});
    assert!(is_subschema(&s1, &s2).unwrap());
    assert!(is_subschema(&s2, &s3).unwrap());
    assert!(is_subschema(&s1, &s3).unwrap());
}

#[test]
fn all_of_is_a_subtype_of_each_conjunct() {
    let s1 = json!({"type": "integer", "minimum": 0});
    let s2 = json!({"type": "integer", "maximum": 100});
    let meet = json!({"allOf": [s1.clone(), s2.clone()]});
    assert!(is_subschema(&meet, &s1).unwrap());
    assert!(is_subschema(&meet, &s2).unwrap());
}

#[test]
fn each_disjunct_is_a_subtype_of_any_of() {
    let s1 = json!({"type": "integer"});
    let s2 = json!({"type": "string"});
    let join = json!({"anyOf": [s1.clone(), s2.clone()]});
    assert!(is_subschema(&s1, &join).unwrap());
    assert!(is_subschema(&s2, &join).unwrap());
}

#[test]
fn integer_is_always_a_subtype_of_number() {
    let rhs_samples = [
        json!({"type": "number"}),
        json!({"type": "number", "minimum": -1000, "maximum": 1000}),
        json!({"type": "number", "multipleOf": 0.5}),
    ];
    for rhs in rhs_samples {
        let lhs = json!({"type": "integer", "minimum": -1000, "maximum": 1000});
        assert!(is_subschema(&lhs, &rhs).unwrap(), "integer not a subtype of {rhs}");
    }
}

#[test]
fn number_is_a_subtype_of_integer_iff_multiple_of_is_a_positive_integer() {
    let forces_integer = json!({"type": "number", "multipleOf": 2});
    assert!(is_subschema(&forces_integer, &json!({"type": "integer"})).unwrap());

    let does_not_force_integer = [
        json!({"type": "number"}),
        json!({"type": "number", "multipleOf": 0.5}),
    ];
    for lhs in does_not_force_integer {
        assert!(!is_subschema(&lhs, &json!({"type": "integer"})).unwrap(), "{lhs} wrongly a subtype of integer");
    }
}
