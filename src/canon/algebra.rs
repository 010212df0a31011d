// Algebraic operations on canonical schemas (spec §4.3): meet
// (intersection, used by `allOf`) and join (union, used by `anyOf`).

use std::collections::BTreeSet;

use serde_json::Value;

use crate::number::{self, NumericConstraints, Rational};

use super::{
    AdditionalItems, AdditionalProperties, ArrayConstraints, ArrayShape, CSchema, Cts, Kind,
    ObjectConstraints, Payload, StringConstraints,
};

/// `s1 ⊓ s2`: distributes over union members, meeting same-kind pairs and
/// absorbing Integer∧Number into Integer, per §4.3/§4.4.
pub fn meet(a: &CSchema, b: &CSchema) -> CSchema {
    let mut results = Vec::new();
    for ca in a.members() {
        for cb in b.members() {
            if ca.kind == cb.kind {
                results.push(meet_cts(ca, cb));
            } else if is_integer_number_pair(ca.kind, cb.kind) {
                results.push(meet_integer_number(ca, cb));
            }
        }
    }
    CSchema::union_from(results)
}

/// `s1 ⊔ s2`: canonical-union concatenation, joining same-kind members.
pub fn join(a: &CSchema, b: &CSchema) -> CSchema {
    let mut members: Vec<Cts> = a.members().into_iter().cloned().collect();
    for cb in b.members() {
        members.push(cb.clone());
    }
    CSchema::union_from(members)
}

fn is_integer_number_pair(a: Kind, b: Kind) -> bool {
    matches!(
        (a, b),
        (Kind::Integer, Kind::Number) | (Kind::Number, Kind::Integer)
    )
}

fn meet_integer_number(a: &Cts, b: &Cts) -> Cts {
    let (int_cts, num_cts) = if a.kind == Kind::Integer {
        (a, b)
    } else {
        (b, a)
    };
    let ni = int_cts.numeric().expect("integer cTS carries numeric payload");
    let nn = num_cts.numeric().expect("number cTS carries numeric payload");
    let merged = meet_numeric(ni, nn);
    let enum_set = meet_enum_sets(int_cts, num_cts, &Payload::Integer(merged.clone()));
    let mut result = Cts {
        kind: Kind::Integer,
        payload: Payload::Integer(merged),
        enum_set,
        reject: false,
    };
    if super::is_degenerate(&result) {
        result.reject = true;
    }
    result
}

/// Meets two cTSs of the *same* kind.
pub fn meet_cts(a: &Cts, b: &Cts) -> Cts {
    if a.reject || b.reject {
        return Cts::bottom(a.kind);
    }
    let payload = match (&a.payload, &b.payload) {
        (Payload::Null, Payload::Null) => Payload::Null,
        (Payload::Boolean, Payload::Boolean) => Payload::Boolean,
        (Payload::String(sa), Payload::String(sb)) => Payload::String(meet_string(sa, sb)),
        (Payload::Number(na), Payload::Number(nb)) => Payload::Number(meet_numeric(na, nb)),
        (Payload::Integer(na), Payload::Integer(nb)) => Payload::Integer(meet_numeric(na, nb)),
        (Payload::Array(aa), Payload::Array(ab)) => Payload::Array(meet_array(aa, ab)),
        (Payload::Object(oa), Payload::Object(ob)) => Payload::Object(meet_object(oa, ob)),
        _ => unreachable!("meet_cts called on mismatched kinds"),
    };
    let enum_set = meet_enum_sets(a, b, &payload);
    let mut result = Cts {
        kind: a.kind,
        payload,
        enum_set,
        reject: false,
    };
    if super::is_degenerate(&result) {
        result.reject = true;
    }
    result
}

/// Joins two cTSs of the *same* kind. Exact where tractable (numbers,
/// strings, arrays); conservative (widen to the less-constrained side) for
/// Object, per §4.3's note that exact join is intractable there.
pub fn join_cts(a: &Cts, b: &Cts) -> Cts {
    if a.reject {
        return b.clone();
    }
    if b.reject {
        return a.clone();
    }
    let payload = match (&a.payload, &b.payload) {
        (Payload::Null, Payload::Null) => Payload::Null,
        (Payload::Boolean, Payload::Boolean) => Payload::Boolean,
        (Payload::String(sa), Payload::String(sb)) => Payload::String(join_string(sa, sb)),
        (Payload::Number(na), Payload::Number(nb)) => Payload::Number(join_numeric(na, nb)),
        (Payload::Integer(na), Payload::Integer(nb)) => Payload::Integer(join_numeric(na, nb)),
        (Payload::Array(aa), Payload::Array(ab)) => Payload::Array(join_array(aa, ab)),
        (Payload::Object(oa), Payload::Object(ob)) => Payload::Object(join_object(oa, ob)),
        _ => unreachable!("join_cts called on mismatched kinds"),
    };
    let enum_set = match (&a.enum_set, &b.enum_set) {
        (Some(ea), Some(eb)) => {
            let mut merged = ea.clone();
            for v in eb {
                if !merged.iter().any(|m| json_numeric_eq(m, v)) {
                    merged.push(v.clone());
                }
            }
            Some(merged)
        }
        // If either side is unconstrained by enum, the join is
        // unconstrained too (enum only narrows).
        _ => None,
    };
    let mut result = Cts {
        kind: a.kind,
        payload,
        enum_set,
        reject: false,
    };
    if super::is_degenerate(&result) {
        result.reject = true;
    }
    result
}

/// `1` and `1.0` compare equal under Number (§4.4 point 4).
fn json_numeric_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => {
            match (Rational::from_json_number(na), Rational::from_json_number(nb)) {
                (Ok(ra), Ok(rb)) => ra == rb,
                _ => a == b,
            }
        }
        _ => a == b,
    }
}

fn meet_enum_sets(a: &Cts, b: &Cts, merged_payload: &Payload) -> Option<Vec<Value>> {
    match (&a.enum_set, &b.enum_set) {
        (Some(ea), Some(eb)) => Some(
            ea.iter()
                .filter(|v| eb.iter().any(|w| json_numeric_eq(v, w)))
                .cloned()
                .collect(),
        ),
        (Some(ea), None) => Some(
            ea.iter()
                .filter(|v| literal_satisfies(merged_payload, v))
                .cloned()
                .collect(),
        ),
        (None, Some(eb)) => Some(
            eb.iter()
                .filter(|v| literal_satisfies(merged_payload, v))
                .cloned()
                .collect(),
        ),
        (None, None) => None,
    }
}

/// Does literal JSON value `v` satisfy the (already-merged) constraint
/// payload? Used only to keep the enum-set invariant ("every enum element
/// individually satisfies the rest of the payload") after a meet -- this
/// is a narrow check over literal values, not general instance validation.
fn literal_satisfies(payload: &Payload, v: &Value) -> bool {
    match payload {
        Payload::Null => v.is_null(),
        Payload::Boolean => v.is_boolean(),
        Payload::String(sc) => {
            if let Value::String(s) = v {
                let len = s.chars().count() as u64;
                if len < sc.min_length {
                    return false;
                }
                if let Some(max) = sc.max_length {
                    if len > max {
                        return false;
                    }
                }
                sc.patterns.iter().all(|p| {
                    crate::regex_adapter::matches(p, s).unwrap_or(false)
                })
            } else {
                false
            }
        }
        Payload::Number(nc) | Payload::Integer(nc) => {
            if let Value::Number(n) = v {
                let Ok(r) = Rational::from_json_number(n) else {
                    return false;
                };
                if matches!(payload, Payload::Integer(_)) && !r.is_integer() {
                    return false;
                }
                if !number::bound_satisfied_lower(&nc.lower, &r) {
                    return false;
                }
                if !number::bound_satisfied_upper(&nc.upper, &r) {
                    return false;
                }
                if let Some(m) = &nc.multiple_of {
                    if !r.divides(m) {
                        return false;
                    }
                }
                true
            } else {
                false
            }
        }
        // Array/Object enum literals are rejected at canonicalization.
        _ => true,
    }
}

fn meet_numeric(a: &NumericConstraints, b: &NumericConstraints) -> NumericConstraints {
    let multiple_of = match (&a.multiple_of, &b.multiple_of) {
        (Some(x), Some(y)) => Some(x.lcm(y)),
        (Some(x), None) => Some(x.clone()),
        (None, Some(y)) => Some(y.clone()),
        (None, None) => None,
    };
    NumericConstraints {
        lower: number::meet_lower(&a.lower, &b.lower),
        upper: number::meet_upper(&a.upper, &b.upper),
        multiple_of,
    }
}

/// Join of two numeric ranges widens to whichever bound is looser; for
/// `multipleOf`, only keep a bound shared by both (gcd), since a value
/// that satisfies either side need not be a multiple of the other's step.
fn join_numeric(a: &NumericConstraints, b: &NumericConstraints) -> NumericConstraints {
    let lower = if number::lower_at_least_as_tight(&a.lower, &b.lower) {
        b.lower.clone()
    } else {
        a.lower.clone()
    };
    let upper = if number::upper_at_least_as_tight(&a.upper, &b.upper) {
        b.upper.clone()
    } else {
        a.upper.clone()
    };
    let multiple_of = match (&a.multiple_of, &b.multiple_of) {
        (Some(x), Some(y)) if x == y => Some(x.clone()),
        _ => None,
    };
    NumericConstraints {
        lower,
        upper,
        multiple_of,
    }
}

fn meet_string(a: &StringConstraints, b: &StringConstraints) -> StringConstraints {
    let max_length = match (a.max_length, b.max_length) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    };
    let mut patterns = a.patterns.clone();
    patterns.extend(b.patterns.iter().cloned());
    StringConstraints {
        min_length: a.min_length.max(b.min_length),
        max_length,
        patterns,
    }
}

fn join_string(a: &StringConstraints, b: &StringConstraints) -> StringConstraints {
    let max_length = match (a.max_length, b.max_length) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => None,
    };
    let patterns = if a.patterns == b.patterns {
        a.patterns.clone()
    } else {
        Vec::new()
    };
    StringConstraints {
        min_length: a.min_length.min(b.min_length),
        max_length,
        patterns,
    }
}

fn meet_array(a: &ArrayConstraints, b: &ArrayConstraints) -> ArrayConstraints {
    let max_items = match (a.max_items, b.max_items) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    };
    let prefix_len = a.prefix_len().max(b.prefix_len());
    let mut prefix = Vec::with_capacity(prefix_len);
    for i in 0..prefix_len {
        prefix.push(meet(&a.effective_at(i), &b.effective_at(i)));
    }
    let additional = match (&a.shape, &b.shape) {
        (ArrayShape::Tuple { additional: AdditionalItems::False, .. }, _)
        | (_, ArrayShape::Tuple { additional: AdditionalItems::False, .. }) => AdditionalItems::False,
        _ => {
            let tail_a = a.effective_at(prefix_len);
            let tail_b = b.effective_at(prefix_len);
            AdditionalItems::Schema(Box::new(meet(&tail_a, &tail_b)))
        }
    };
    ArrayConstraints {
        shape: ArrayShape::Tuple { prefix, additional },
        min_items: a.min_items.max(b.min_items),
        max_items,
        unique_items: a.unique_items || b.unique_items,
    }
}

fn join_array(a: &ArrayConstraints, b: &ArrayConstraints) -> ArrayConstraints {
    // Conservative widening: keep the loosest cardinality, drop
    // uniqueItems unless both require it, and only keep a precise
    // per-index join when both sides share the same shape.
    let max_items = match (a.max_items, b.max_items) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => None,
    };
    let prefix_len = a.prefix_len().min(b.prefix_len());
    let mut prefix = Vec::with_capacity(prefix_len);
    for i in 0..prefix_len {
        prefix.push(join(&a.effective_at(i), &b.effective_at(i)));
    }
    let tail_a = a.effective_at(prefix_len);
    let tail_b = b.effective_at(prefix_len);
    ArrayConstraints {
        shape: ArrayShape::Tuple {
            prefix,
            additional: AdditionalItems::Schema(Box::new(join(&tail_a, &tail_b))),
        },
        min_items: a.min_items.min(b.min_items),
        max_items,
        unique_items: a.unique_items && b.unique_items,
    }
}

fn meet_object(a: &ObjectConstraints, b: &ObjectConstraints) -> ObjectConstraints {
    let mut properties: Vec<(String, CSchema)> = Vec::new();
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for (name, _) in a.properties.iter().chain(b.properties.iter()) {
        names.insert(name.as_str());
    }
    for name in names {
        let sa = a.effective_at(name);
        let sb = b.effective_at(name);
        properties.push((name.to_string(), algebra_meet(&sa, &sb)));
    }

    let mut pattern_properties = a.pattern_properties.clone();
    pattern_properties.extend(b.pattern_properties.iter().cloned());

    let additional_properties = match (&a.additional_properties, &b.additional_properties) {
        (Some(AdditionalProperties::False), _) | (_, Some(AdditionalProperties::False)) => {
            Some(AdditionalProperties::False)
        }
        (Some(AdditionalProperties::Schema(x)), Some(AdditionalProperties::Schema(y))) => {
            Some(AdditionalProperties::Schema(Box::new(algebra_meet(x, y))))
        }
        (Some(x), None) => Some(x.clone()),
        (None, Some(y)) => Some(y.clone()),
        (None, None) => None,
    };

    let required: BTreeSet<String> = a.required.union(&b.required).cloned().collect();
    let max_properties = match (a.max_properties, b.max_properties) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    };

    ObjectConstraints {
        properties,
        pattern_properties,
        additional_properties,
        required,
        min_properties: a.min_properties.max(b.min_properties),
        max_properties,
    }
}

/// Conservative join of two object constraint sets (§4.3: "this may
/// overapproximate but never underapproximate"). Properties required or
/// constrained by only one side are dropped from the result rather than
/// guessed at, since a looser object schema is always a safe
/// overapproximation for a join.
fn join_object(a: &ObjectConstraints, b: &ObjectConstraints) -> ObjectConstraints {
    let mut properties = Vec::new();
    for (name, sa) in &a.properties {
        if let Some(sb) = b.property(name) {
            properties.push((name.clone(), algebra_join(sa, sb)));
        }
    }
    let required: BTreeSet<String> = a.required.intersection(&b.required).cloned().collect();
    let max_properties = match (a.max_properties, b.max_properties) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => None,
    };
    ObjectConstraints {
        properties,
        pattern_properties: Vec::new(),
        additional_properties: Some(AdditionalProperties::Schema(Box::new(CSchema::top()))),
        required,
        min_properties: a.min_properties.min(b.min_properties),
        max_properties,
    }
}

fn algebra_meet(a: &CSchema, b: &CSchema) -> CSchema {
    meet(a, b)
}

fn algebra_join(a: &CSchema, b: &CSchema) -> CSchema {
    join(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize::from_value;
    use serde_json::json;

    #[test]
    fn meet_of_disjoint_kinds_is_bottom() {
        let s = from_value(&json!({"type": "string"})).unwrap();
        let i = from_value(&json!({"type": "integer"})).unwrap();
        assert!(meet(&s, &i).is_bottom());
    }

    #[test]
    fn meet_integer_and_number_stays_integer() {
        let n = from_value(&json!({"type": "number", "minimum": 0})).unwrap();
        let i = from_value(&json!({"type": "integer", "maximum": 10})).unwrap();
        let m = meet(&n, &i);
        let members = m.members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].kind, Kind::Integer);
    }

    #[test]
    fn join_preserves_both_kinds() {
        let s = from_value(&json!({"type": "string"})).unwrap();
        let i = from_value(&json!({"type": "integer"})).unwrap();
        let j = join(&s, &i);
        assert_eq!(j.members().len(), 2);
    }
}
