// Negation (spec §4.8). The canonical-union invariant allows only one
// cTS per kind, so an exact structural complement is only representable
// when it collapses to a single interval/cTS; otherwise the engine
// overapproximates to the kind's unconstrained top, exactly as spec §4.8
// describes for enum-sets ("emits ⊤ for the kind") and as §9 concedes is
// the general limitation for this fragment ("a sound, complete decision
// for negated structured types... is intractable").
//
// Array and Object are the two kinds spec §4.8 explicitly refuses to
// approximate: any non-trivial constraint there is a hard error rather
// than a silent overapproximation, because overapproximating a negated
// object/array is far more likely to silently flip a containment
// decision than overapproximating a numeric range is.

use crate::error::{Result, SchemaError::UnsupportedNegatedArray, SchemaError::UnsupportedNegatedObject};
use crate::number::Bound;

use super::algebra::join_cts;
use super::{ArrayShape, CSchema, Cts, Kind, Payload, ALL_KINDS};

pub fn negate(c: &CSchema) -> Result<CSchema> {
    let mut result = CSchema::top();
    for member in c.members() {
        let term = term_for(member)?;
        result = super::algebra::meet(&result, &term);
    }
    Ok(result)
}

/// `(all kinds except member.kind, fully) ∪ (member.kind, complemented)`.
fn term_for(member: &Cts) -> Result<CSchema> {
    let mut parts = Vec::with_capacity(7);
    for k in ALL_KINDS {
        if k != member.kind {
            parts.push(Cts::top(k));
        }
    }
    let complemented = complement_kind(member)?;
    parts.push(complemented);
    Ok(CSchema::union_from(parts))
}

fn complement_kind(c: &Cts) -> Result<Cts> {
    match &c.payload {
        Payload::Null | Payload::Boolean => Ok(complement_trivial(c)),
        Payload::Number(_) | Payload::Integer(_) => Ok(complement_numeric(c)),
        Payload::String(_) => Ok(complement_string(c)),
        Payload::Array(a) => {
            if is_trivial_array(a) {
                Ok(Cts::bottom(Kind::Array))
            } else {
                Err(UnsupportedNegatedArray(
                    "negating an array schema with items/minItems/maxItems/uniqueItems is not supported".into(),
                ))
            }
        }
        Payload::Object(o) => {
            if is_trivial_object(o) {
                Ok(Cts::bottom(Kind::Object))
            } else {
                Err(UnsupportedNegatedObject(
                    "negating an object schema with properties/patternProperties/additionalProperties/required/minProperties/maxProperties is not supported".into(),
                ))
            }
        }
    }
}

fn complement_trivial(c: &Cts) -> Cts {
    if c.enum_set.is_none() {
        Cts::bottom(c.kind)
    } else {
        // Negated enums cannot be represented in the cTS model (§4.8): emit
        // the unconstrained kind instead of narrowing it.
        Cts::top(c.kind)
    }
}

fn is_trivial_array(a: &super::ArrayConstraints) -> bool {
    a.min_items == 0
        && a.max_items.is_none()
        && !a.unique_items
        && matches!(&a.shape, ArrayShape::List(items) if items.is_top())
}

fn is_trivial_object(o: &super::ObjectConstraints) -> bool {
    o.properties.is_empty()
        && o.pattern_properties.is_empty()
        && o.required.is_empty()
        && o.min_properties == 0
        && o.max_properties.is_none()
        && matches!(
            &o.additional_properties,
            Some(super::AdditionalProperties::Schema(s)) if s.is_top()
        )
}

fn complement_numeric(c: &Cts) -> Cts {
    let nc = c.numeric().expect("numeric cTS");
    let fully_unconstrained = matches!(nc.lower, Bound::Unbounded)
        && matches!(nc.upper, Bound::Unbounded)
        && nc.multiple_of.is_none()
        && c.enum_set.is_none();
    if fully_unconstrained {
        return Cts::bottom(c.kind);
    }

    let mut rays = Vec::new();
    if let Bound::Finite { value, exclusive } = &nc.lower {
        let mut ray = Cts::top(c.kind);
        if let Some(numeric) = ray_numeric_mut(&mut ray) {
            numeric.upper = Bound::finite(value.clone(), !exclusive);
        }
        rays.push(ray);
    }
    if let Bound::Finite { value, exclusive } = &nc.upper {
        let mut ray = Cts::top(c.kind);
        if let Some(numeric) = ray_numeric_mut(&mut ray) {
            numeric.lower = Bound::finite(value.clone(), !exclusive);
        }
        rays.push(ray);
    }

    match rays.len() {
        0 => {
            // Only `multipleOf` and/or `enum` constrained the original;
            // neither is representable as a negation here (spec §4.8).
            Cts::top(c.kind)
        }
        1 => rays.into_iter().next().unwrap(),
        _ => {
            let mut iter = rays.into_iter();
            let first = iter.next().unwrap();
            iter.fold(first, |acc, r| join_cts(&acc, &r))
        }
    }
}

fn ray_numeric_mut(c: &mut Cts) -> Option<&mut crate::number::NumericConstraints> {
    match &mut c.payload {
        Payload::Number(n) | Payload::Integer(n) => Some(n),
        _ => None,
    }
}

fn complement_string(c: &Cts) -> Cts {
    let sc = c.string().expect("string cTS");
    if !sc.patterns.is_empty() || c.enum_set.is_some() {
        // A pattern or enum constraint's complement is a disjunction this
        // model cannot represent as one cTS; overapproximate.
        return Cts::top(Kind::String);
    }
    let fully_unconstrained = sc.min_length == 0 && sc.max_length.is_none();
    if fully_unconstrained {
        return Cts::bottom(Kind::String);
    }

    let mut rays = Vec::new();
    if sc.min_length > 0 {
        let mut ray = Cts::top(Kind::String);
        if let Payload::String(s) = &mut ray.payload {
            s.max_length = Some(sc.min_length - 1);
        }
        rays.push(ray);
    }
    if let Some(max) = sc.max_length {
        let mut ray = Cts::top(Kind::String);
        if let Payload::String(s) = &mut ray.payload {
            s.min_length = max + 1;
        }
        rays.push(ray);
    }
    match rays.len() {
        0 => Cts::top(Kind::String),
        1 => rays.into_iter().next().unwrap(),
        _ => {
            let mut iter = rays.into_iter();
            let first = iter.next().unwrap();
            iter.fold(first, |acc, r| join_cts(&acc, &r))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize::from_value;
    use serde_json::json;

    #[test]
    fn negating_array_with_items_is_unsupported() {
        let v = json!({"type": "array", "items": {"type": "string"}});
        let c = from_value(&v).unwrap();
        assert!(negate(&c).is_err());
    }

    #[test]
    fn negating_bare_array_type_is_supported() {
        let v = json!({"type": "array"});
        let c = from_value(&v).unwrap();
        let negated = negate(&c).unwrap();
        assert!(negated.member_of_kind(Kind::Array).is_none());
        assert!(negated.member_of_kind(Kind::String).is_some());
    }

    #[test]
    fn negating_object_with_properties_is_unsupported() {
        let v = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let c = from_value(&v).unwrap();
        assert!(negate(&c).is_err());
    }

    #[test]
    fn double_negation_of_a_one_sided_range_is_identity() {
        let v = json!({"type": "integer", "minimum": 5});
        let c = from_value(&v).unwrap();
        let once = negate(&c).unwrap();
        let twice = negate(&once).unwrap();
        let twice_int = twice.member_of_kind(Kind::Integer).unwrap();
        let nc = twice_int.numeric().unwrap();
        assert!(matches!(nc.lower, Bound::Finite { .. }));
    }
}
