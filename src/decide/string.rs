// String subtype decider (spec §4.5): length interval plus pattern
// conjunction containment, delegated to the regex adapter's product
// automaton. Cheap bound checks run first so the expensive regex path is
// only taken when it can actually change the answer.

use crate::canon::Cts;
use crate::error::Result;
use crate::limits::DecisionOptions;
use crate::reasons;
use crate::regex_adapter;

use super::enum_subtype;

pub fn is_subtype(c1: &Cts, c2: &Cts, opts: &DecisionOptions) -> Result<bool> {
    let s1 = c1.string().expect("string cTS");
    let s2 = c2.string().expect("string cTS");

    if s1.min_length < s2.min_length {
        reasons::add_reason("str__01", "lhs minLength is weaker than rhs minLength");
        return Ok(false);
    }
    if let Some(max2) = s2.max_length {
        if s1.max_length.map_or(true, |max1| max1 > max2) {
            reasons::add_reason("str__02", "lhs maxLength is weaker than rhs maxLength");
            return Ok(false);
        }
    }

    if !s2.patterns.is_empty() {
        let contained = regex_adapter::conjunction_contains(
            &s1.patterns,
            s1.min_length,
            s1.max_length,
            &s2.patterns,
            s2.min_length,
            s2.max_length,
            opts.dfa_state_cap,
            opts.deadline,
        )?;
        if !contained {
            reasons::add_reason("str__03", "lhs's pattern language is not contained in rhs's");
            return Ok(false);
        }
    }

    Ok(enum_subtype(c1, c2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize::from_value;
    use crate::decide;
    use serde_json::json;

    #[test]
    fn narrower_length_is_subtype_of_wider() {
        let lhs = from_value(&json!({"type": "string", "minLength": 3, "maxLength": 5})).unwrap();
        let rhs = from_value(&json!({"type": "string", "minLength": 1})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn anchored_prefix_pattern_is_subtype_of_substring_pattern() {
        let lhs = from_value(&json!({"type": "string", "pattern": "^num.*$"})).unwrap();
        let rhs = from_value(&json!({"type": "string", "pattern": "n"})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn unrelated_patterns_are_not_subtypes() {
        let lhs = from_value(&json!({"type": "string", "pattern": "^a$"})).unwrap();
        let rhs = from_value(&json!({"type": "string", "pattern": "^b$"})).unwrap();
        assert!(!decide::is_subtype(&lhs, &rhs).unwrap());
    }
}
