//! Decides, for two JSON Schema (Draft-4 subset) documents, whether every
//! instance of the left is also an instance of the right -- a static
//! subtype check for schema compatibility (API evolution, config
//! migration, refinement proofs).
//!
//! The pipeline: [`loader`] resolves `$ref`s, [`meta`] rejects malformed
//! input, [`canon`] rewrites both sides into canonical form, and
//! [`decide`] runs the per-kind containment algorithms. [`reasons`]
//! collects human-readable diagnostics alongside the boolean answer.

pub mod canon;
pub mod decide;
pub mod error;
pub mod limits;
pub mod loader;
pub mod meta;
pub mod number;
pub mod reasons;
pub mod regex_adapter;

pub use error::SchemaError;
pub use limits::DecisionOptions;

use serde_json::Value;

use error::{Result, Side};

/// `isSubschema(lhs, rhs) -> bool` (spec §6). Returns `true` iff every
/// instance of `lhs` is an instance of `rhs`.
pub fn is_subschema(lhs: &Value, rhs: &Value) -> Result<bool> {
    is_subschema_with_options(lhs, rhs, &DecisionOptions::default())
}

/// Outcome of [`is_subschema_with_reason`]: the boolean answer plus the
/// diagnostic trail the reason collector recorded. `reasons` is empty on
/// `true` and non-empty on `false`; it is informational only (spec §7:
/// "must be ignorable without changing boolean outcomes").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionResult {
    pub is_subtype: bool,
    pub reasons: Vec<String>,
}

/// `is_subschema_with_reason(lhs, rhs)` (spec §6).
pub fn is_subschema_with_reason(lhs: &Value, rhs: &Value) -> Result<DecisionResult> {
    is_subschema_with_reason_and_options(lhs, rhs, &DecisionOptions::default())
}

/// [`is_subschema`] with an explicit [`DecisionOptions`] (DFA state cap,
/// optional deadline).
pub fn is_subschema_with_options(lhs: &Value, rhs: &Value, opts: &DecisionOptions) -> Result<bool> {
    let (result, _reasons) = reasons::scoped(|| decide_inner(lhs, rhs, opts));
    result
}

/// [`is_subschema_with_reason`] with an explicit [`DecisionOptions`].
pub fn is_subschema_with_reason_and_options(
    lhs: &Value,
    rhs: &Value,
    opts: &DecisionOptions,
) -> Result<DecisionResult> {
    let (result, collected) = reasons::scoped(|| decide_inner(lhs, rhs, opts));
    let is_subtype = result?;
    Ok(DecisionResult {
        is_subtype,
        reasons: collected,
    })
}

fn decide_inner(lhs: &Value, rhs: &Value, opts: &DecisionOptions) -> Result<bool> {
    let span = tracing::debug_span!("is_subschema");
    let _enter = span.enter();

    meta::validate(lhs)?;
    meta::validate(rhs)?;

    let resolved_lhs = loader::resolve(lhs, Side::Lhs)?;
    let resolved_rhs = loader::resolve(rhs, Side::Rhs)?;
    tracing::trace!("resolved both schemas' $ref nodes");

    let c1 = canon::canonicalize::from_value(&resolved_lhs)?;
    let c2 = canon::canonicalize::from_value(&resolved_rhs)?;
    tracing::trace!("canonicalized both schemas");

    decide::is_subtype_opts(&c1, &c2, opts)
}
