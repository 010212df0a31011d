// Subtype decider (spec §4.3/§4.4-§4.7/§9): a pure function over canonical
// schemas. Dispatches by the outermost shape (union/single), then by
// kind, to the per-kind deciders in this module's submodules.
//
// Fallible end to end: a pattern that overflows the configured DFA state
// cap (`SchemaError::RegexUnsupported`, spec §7) is a genuine error, not
// a silent `false`, so it has to propagate out of the string and object
// deciders rather than be swallowed where it's raised. `DecisionOptions`
// (the state cap and optional deadline) is threaded through every
// recursive call rather than read from a global, so concurrent decisions
// on different threads can use different limits.

pub mod array;
pub mod number;
pub mod object;
pub mod string;

use crate::canon::{CSchema, Cts, Kind};
use crate::error::Result;
use crate::limits::DecisionOptions;
use crate::reasons;

/// `isSubschema(lhs, rhs)` with default options.
pub fn is_subtype(lhs: &CSchema, rhs: &CSchema) -> Result<bool> {
    is_subtype_opts(lhs, rhs, &DecisionOptions::default())
}

/// `isSubschema(lhs, rhs)`: every kind lhs admits must have a counterpart
/// kind on rhs, and be a subtype of it. A union is a subtype of `rhs` iff
/// every one of its members is individually (§9, "union-of-kinds via
/// type:[...]").
pub fn is_subtype_opts(lhs: &CSchema, rhs: &CSchema, opts: &DecisionOptions) -> Result<bool> {
    opts.check_deadline()?;
    for c1 in lhs.members() {
        match find_counterpart(c1, rhs) {
            Some(c2) => {
                if !kind_subtype(c1, c2, opts)? {
                    return Ok(false);
                }
            }
            None => {
                reasons::add_reason(
                    "kind__absent",
                    format!("rhs admits no values of kind {}", c1.kind),
                );
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Finds the rhs cTS that structurally corresponds to `c1`'s kind,
/// honoring Integer ⊂ Number (spec §4.4 point 1) when no exact-kind
/// counterpart exists.
fn find_counterpart<'a>(c1: &Cts, rhs: &'a CSchema) -> Option<&'a Cts> {
    if let Some(exact) = rhs.member_of_kind(c1.kind) {
        return Some(exact);
    }
    match c1.kind {
        Kind::Integer => rhs.member_of_kind(Kind::Number),
        Kind::Number => rhs.member_of_kind(Kind::Integer),
        _ => None,
    }
}

fn kind_subtype(c1: &Cts, c2: &Cts, opts: &DecisionOptions) -> Result<bool> {
    if c1.is_bottom() {
        return Ok(true);
    }
    if c2.is_bottom() {
        return Ok(false);
    }
    match c1.kind {
        Kind::Null | Kind::Boolean => Ok(enum_subtype(c1, c2)),
        Kind::Number | Kind::Integer => Ok(number::is_subtype(c1, c2)),
        Kind::String => string::is_subtype(c1, c2, opts),
        Kind::Array => array::is_subtype(c1, c2, opts),
        Kind::Object => object::is_subtype(c1, c2, opts),
    }
}

/// Enum-only containment, shared by the kinds with no other constraint
/// payload (Null, Boolean): `c1.enum ⊆ c2.enum` when `c2` restricts, else
/// unconditionally true.
pub(crate) fn enum_subtype(c1: &Cts, c2: &Cts) -> bool {
    match (&c1.enum_set, &c2.enum_set) {
        (_, None) => true,
        (None, Some(_)) => {
            reasons::add_reason("enum__05", "rhs restricts to an enum but lhs does not");
            false
        }
        (Some(e1), Some(e2)) => {
            let ok = e1.iter().all(|v| e2.iter().any(|w| numeric_aware_eq(v, w)));
            if !ok {
                reasons::add_reason("enum__05", "lhs enum is not a subset of rhs enum");
            }
            ok
        }
    }
}

pub(crate) fn numeric_aware_eq(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use crate::number::Rational;
    match (a, b) {
        (serde_json::Value::Number(na), serde_json::Value::Number(nb)) => {
            match (Rational::from_json_number(na), Rational::from_json_number(nb)) {
                (Ok(ra), Ok(rb)) => ra == rb,
                _ => a == b,
            }
        }
        _ => a == b,
    }
}
