// Numeric subtype decider (spec §4.4): interval containment, `multipleOf`
// divisibility, and enum subset, with Integer/Number kind absorption
// handled one level up by `find_counterpart` in `decide::mod`.

use crate::canon::Cts;
use crate::number::{lower_at_least_as_tight, upper_at_least_as_tight};
use crate::reasons;

use super::enum_subtype;

pub fn is_subtype(c1: &Cts, c2: &Cts) -> bool {
    let n1 = c1.numeric().expect("numeric cTS");
    let n2 = c2.numeric().expect("numeric cTS");

    if !lower_at_least_as_tight(&n1.lower, &n2.lower) {
        reasons::add_reason("num__01", "lhs lower bound is weaker than rhs lower bound");
        return false;
    }
    if !upper_at_least_as_tight(&n1.upper, &n2.upper) {
        reasons::add_reason("num__02", "lhs upper bound is weaker than rhs upper bound");
        return false;
    }

    if let Some(m2) = &n2.multiple_of {
        match &n1.multiple_of {
            Some(m1) if m1.divides(m2) => {}
            _ => {
                reasons::add_reason(
                    "num__03",
                    "lhs multipleOf is not a multiple of rhs multipleOf",
                );
                return false;
            }
        }
    }

    // Number <: Integer only when lhs's own multipleOf already forces
    // every admitted value to be an integer (spec §4.4 point 1).
    if c1.kind == crate::canon::Kind::Number && c2.kind == crate::canon::Kind::Integer {
        let forces_integer = matches!(&n1.multiple_of, Some(m) if m.is_positive_integer());
        if !forces_integer {
            reasons::add_reason(
                "num__04",
                "lhs is a number without an integer-forcing multipleOf, rhs is integer-only",
            );
            return false;
        }
    }

    enum_subtype(c1, c2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize::from_value;
    use crate::decide;
    use serde_json::json;

    #[test]
    fn tighter_interval_is_subtype_of_looser() {
        let lhs = from_value(&json!({"type": "integer", "minimum": 5, "maximum": 10})).unwrap();
        let rhs = from_value(&json!({"type": "integer", "minimum": 0})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn looser_interval_is_not_subtype_of_tighter() {
        let lhs = from_value(&json!({"type": "integer", "minimum": 0})).unwrap();
        let rhs = from_value(&json!({"type": "integer", "minimum": 5})).unwrap();
        assert!(!decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn multiple_of_four_is_subtype_of_multiple_of_two() {
        let lhs = from_value(&json!({"type": "integer", "multipleOf": 4})).unwrap();
        let rhs = from_value(&json!({"type": "integer", "multipleOf": 2})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
        assert!(!decide::is_subtype(&rhs, &lhs).unwrap());
    }

    #[test]
    fn number_with_integer_forcing_multiple_of_is_subtype_of_integer() {
        let lhs = from_value(&json!({"type": "number", "multipleOf": 1})).unwrap();
        let rhs = from_value(&json!({"type": "integer"})).unwrap();
        assert!(decide::is_subtype(&lhs, &rhs).unwrap());
    }

    #[test]
    fn bare_number_is_not_subtype_of_integer() {
        let lhs = from_value(&json!({"type": "number"})).unwrap();
        let rhs = from_value(&json!({"type": "integer"})).unwrap();
        assert!(!decide::is_subtype(&lhs, &rhs).unwrap());
    }
}
