// Array subtype decider (spec §4.6): cardinality, uniqueItems, and
// per-index containment of the "effective schema at index i" up through
// the longer of the two tuple prefixes, plus one extra check for the
// shared tail (list mode, or the additionalItems schema of a tuple).

use crate::canon::Cts;
use crate::error::Result;
use crate::limits::DecisionOptions;
use crate::reasons;

use super::is_subtype_opts as schema_is_subtype;

pub fn is_subtype(c1: &Cts, c2: &Cts, opts: &DecisionOptions) -> Result<bool> {
    let a1 = c1.array().expect("array cTS");
    let a2 = c2.array().expect("array cTS");

    if a1.min_items < a2.min_items {
        reasons::add_reason("arr__01", "lhs minItems is weaker than rhs minItems");
        return Ok(false);
    }
    if let Some(max2) = a2.max_items {
        if a1.max_items.map_or(true, |max1| max1 > max2) {
            reasons::add_reason("arr__02", "lhs maxItems is weaker than rhs maxItems");
            return Ok(false);
        }
    }
    // uniqueItems is a one-way implication: lhs may only be at least as
    // strict as rhs, never looser.
    if a2.unique_items && !a1.unique_items {
        reasons::add_reason("arr__03", "rhs requires uniqueItems but lhs does not");
        return Ok(false);
    }

    let prefix_len = a1.prefix_len().max(a2.prefix_len());
    // +1 covers the shared tail (list element schema, or additionalItems)
    // once past both prefixes.
    for i in 0..=prefix_len {
        let e1 = a1.effective_at(i);
        let e2 = a2.effective_at(i);
        let ok = reasons::with_path(i.to_string(), || schema_is_subtype(&e1, &e2, opts))?;
        if !ok {
            reasons::add_reason("arr__04", format!("item schema at index {i} is not a subtype"));
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize::from_value;
    use crate::decide;
    use serde_json::json;

    #[test]
    fn list_of_integers_is_subtype_of_list_of_numbers() {
        let lhs = from_value(&json!({"type": "array", "items": {"type": "integer"}})).unwrap();
        let rhs = from_value(&json!({"type": "array", "items": {"type": "number"}})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
        assert!(!decide::is_subtype(&rhs, &lhs).unwrap());
    }

    #[test]
    fn tighter_cardinality_is_subtype_of_looser() {
        let lhs = from_value(&json!({"type": "array", "minItems": 2, "maxItems": 4})).unwrap();
        let rhs = from_value(&json!({"type": "array", "minItems": 1})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn tuple_prefix_must_match_pointwise() {
        let lhs = from_value(&json!({
            "type": "array",
            "items": [{"type": "integer"}, {"type": "string"}]
        }))
        .unwrap();
        let rhs = from_value(&json!({
            "type": "array",
            "items": [{"type": "number"}, {"type": "string"}]
        }))
        .unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }
}
