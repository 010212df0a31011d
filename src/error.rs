// Error taxonomy for the subtype decision engine.
//
// Every variant here is fatal to the current decision; none are retried.
// The reason collector (`crate::reasons`) is a separate, purely
// informational channel and does not interact with this type.

use thiserror::Error;

/// Which side of a comparison a recursive `$ref` or similar defect was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lhs,
    Rhs,
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Side::Lhs => "LHS",
            Side::Rhs => "RHS",
        })
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("input does not parse as JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("schema fails meta-validation: {0}")]
    MalformedSchema(String),

    #[error("$ref target could not be resolved: {0}")]
    UnresolvedRef(String),

    #[error("recursive $ref detected on the {which_side} schema: {pointer}")]
    UnsupportedRecursiveRef { which_side: Side, pointer: String },

    #[error("enum canonicalization is not supported for Array/Object literals: {0}")]
    UnsupportedEnumCanonicalization(String),

    #[error("negation of a constrained array schema is not supported: {0}")]
    UnsupportedNegatedArray(String),

    #[error("negation of a constrained object schema is not supported: {0}")]
    UnsupportedNegatedObject(String),

    #[error("regex feature unsupported by the adapter: {0}")]
    RegexUnsupported(String),

    /// Not part of spec.md's original taxonomy; added to carry out the
    /// optional decision deadline described in the concurrency model.
    #[error("decision did not complete before the configured deadline")]
    Undecided,
}

pub type Result<T> = core::result::Result<T, SchemaError>;
