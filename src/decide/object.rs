// Object subtype decider (spec §4.7): cardinality, required-set
// preservation, explicit-property containment via the shared
// "effective schema at key k" helper, and a containment-based treatment
// of `patternProperties`/`additionalProperties` for keys with no
// explicit property names.
//
// Concrete instance keys aren't known at this point, only the schema
// text, so pattern-to-pattern comparisons go by regex *containment*, not
// intersection: an lhs pattern `p1` only "matches into" an rhs pattern
// `p2` when every key `p1` can match, `p2` can also match
// (`L(p1) ⊆ L(p2)`). A pattern with no such rhs counterpart is checked
// against rhs's residual `additionalProperties` instead. This is
// deliberately asymmetric -- it replicates the original engine's
// documented behavior for a specific pattern versus a wildcard one
// (spec §9), where the wider pattern is not itself contained in the
// narrower one, so it falls back to the narrower side's
// `additionalProperties` baseline and fails there.

use std::collections::BTreeSet;

use crate::canon::Cts;
use crate::error::Result;
use crate::limits::DecisionOptions;
use crate::reasons;
use crate::regex_adapter;

use super::is_subtype_opts as schema_is_subtype;

pub fn is_subtype(c1: &Cts, c2: &Cts, opts: &DecisionOptions) -> Result<bool> {
    let o1 = c1.object().expect("object cTS");
    let o2 = c2.object().expect("object cTS");

    if o1.min_properties < o2.min_properties {
        reasons::add_reason("obj__minProps", "lhs minProperties is weaker than rhs minProperties");
        return Ok(false);
    }
    if let Some(max2) = o2.max_properties {
        if o1.max_properties.map_or(true, |max1| max1 > max2) {
            reasons::add_reason("obj__maxProps", "lhs maxProperties is weaker than rhs maxProperties");
            return Ok(false);
        }
    }
    if !o2.required.is_subset(&o1.required) {
        reasons::add_reason("obj__required", "rhs requires a property lhs does not");
        return Ok(false);
    }

    let mut names: BTreeSet<&str> = BTreeSet::new();
    names.extend(o1.properties.iter().map(|(k, _)| k.as_str()));
    names.extend(o2.properties.iter().map(|(k, _)| k.as_str()));
    for name in names {
        opts.check_deadline()?;
        let e1 = o1.effective_at(name);
        let e2 = o2.effective_at(name);
        let ok = reasons::with_path(name, || schema_is_subtype(&e1, &e2, opts))?;
        if !ok {
            reasons::add_reason("obj__prop", format!("property \"{name}\" is not a subtype"));
            return Ok(false);
        }
    }

    for (p1, s1) in &o1.pattern_properties {
        opts.check_deadline()?;
        let mut matched = false;
        for (p2, s2) in &o2.pattern_properties {
            if regex_adapter::contains_with_cap(p1, p2, opts.dfa_state_cap, opts.deadline)? {
                matched = true;
                let ok = reasons::with_path(p1.as_str(), || schema_is_subtype(s1, s2, opts))?;
                if !ok {
                    reasons::add_reason(
                        "obj__pattern",
                        format!("patternProperties \"{p1}\" is not a subtype of covering rhs pattern \"{p2}\""),
                    );
                    return Ok(false);
                }
            }
        }
        if !matched {
            let residual = o2.additional_schema();
            let ok = reasons::with_path(p1.as_str(), || schema_is_subtype(s1, &residual, opts))?;
            if !ok {
                reasons::add_reason(
                    "obj__pattern",
                    format!("patternProperties \"{p1}\" is not a subtype of rhs's additionalProperties"),
                );
                return Ok(false);
            }
        }
    }

    for (p2, s2) in &o2.pattern_properties {
        opts.check_deadline()?;
        let mut covered = false;
        for (p1, _) in &o1.pattern_properties {
            if regex_adapter::contains_with_cap(p2, p1, opts.dfa_state_cap, opts.deadline)? {
                covered = true;
                break;
            }
        }
        if !covered {
            let baseline = o1.additional_schema();
            let ok = reasons::with_path(p2.as_str(), || schema_is_subtype(&baseline, s2, opts))?;
            if !ok {
                reasons::add_reason(
                    "obj__pattern",
                    format!("lhs's unconstrained keys may not satisfy rhs patternProperties \"{p2}\""),
                );
                return Ok(false);
            }
        }
    }

    let residual1 = o1.additional_schema();
    let residual2 = o2.additional_schema();
    if !schema_is_subtype(&residual1, &residual2, opts)? {
        reasons::add_reason("obj__addl", "lhs's additionalProperties is not a subtype of rhs's");
        return Ok(false);
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
    fn narrower_property_type_is_subtype() {
        let lhs = from_value(&json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}}
        }))
        .unwrap();
        let rhs = from_value(&json!({
            "type": "object",
            "properties": {"a": {"type": "number"}}
        }))
        .unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
        assert!(!decide::is_subtype(&rhs, &lhs).unwrap());
    }

    #[test]
    fn missing_required_property_is_not_subtype() {
        let lhs = from_value(&json!({"type": "object"})).unwrap();
        let rhs = from_value(&json!({"type": "object", "required": ["a"]})).unwrap();
        assert!(!decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn pattern_properties_narrows_bare_object() {
        let lhs = from_value(&json!({
            "type": "object",
            "patternProperties": {"^num": {"type": "number"}}
        }))
        .unwrap();
        let rhs = from_value(&json!({"type": "object"})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
        assert!(!decide::is_subtype(&rhs, &lhs).unwrap());
    }

    #[test]
    fn specific_pattern_is_not_subtype_of_wildcard_pattern() {
        // A narrower key pattern is not a subtype of a wider one here: lhs's
        // unconstrained `additionalProperties` covers every non-digit key,
        // and that residual schema is not itself a subtype of `number`.
        let digits = from_value(&json!({
            "type": "object",
            "patternProperties": {"^[0-9]+$": {"type": "number"}}
        }))
        .unwrap();
        let wildcard = from_value(&json!({
            "type": "object",
            "patternProperties": {"^.+$": {"type": "number"}}
        }))
        .unwrap();
        assert!(!decide::is_subtype(&digits, &wildcard).unwrap());
        assert!(decide::is_subtype(&wildcard, &digits).unwrap());
    }

    #[test]
    fn disjoint_patterns_are_not_subtypes_either_way() {
        let strings = from_value(&json!({
            "type": "object",
            "patternProperties": {"^str": {"type": "string"}}
        }))
        .unwrap();
        let numbers = from_value(&json!({
            "type": "object",
            "patternProperties": {"^num": {"type": "number"}}
        }))
        .unwrap();
        assert!(!decide::is_subtype(&strings, &numbers).unwrap());
        assert!(!decide::is_subtype(&numbers, &strings).unwrap());
    }
}
