// Meta-validation: confirms an input document is well-formed per the
// Draft-4 meta-schema before the engine will reason about it (spec §1's
// "the engine refuses malformed inputs"). Grounded directly on the
// teacher crate's own meta-schema loader (`src/schema/meta.rs`): a
// `lazy_static` `jsonschema::Validator` built from an `include_str!`-ed
// JSON document, the same `jsonschema` crate the teacher already depends
// on for Azure Policy schema validation.

use lazy_static::lazy_static;
use serde_json::Value;

use crate::error::{Result, SchemaError};

const META_SCHEMA: &str = include_str!("meta.schema.json");

lazy_static! {
    /// The Draft-4 JSON Schema meta-schema, used to reject malformed
    /// input documents before canonicalization ever sees them.
    static ref META_SCHEMA_VALIDATOR: jsonschema::Validator = {
        let meta_schema_json: Value =
            serde_json::from_str(META_SCHEMA).expect("META_SCHEMA should be valid JSON");
        jsonschema::validator_for(&meta_schema_json)
            .expect("META_SCHEMA should be a valid JSON Schema")
    };
}

pub fn get_meta_schema() -> &'static str {
    META_SCHEMA
}

/// Validates `schema` against the Draft-4 meta-schema, producing
/// `SchemaError::MalformedSchema` with the collected error messages on
/// failure.
pub fn validate(schema: &Value) -> Result<()> {
    if let jsonschema::BasicOutput::Invalid(errors) = META_SCHEMA_VALIDATOR.apply(schema).basic() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| format!("{}: {}", e.instance_location(), e.error_description()))
            .collect();
        return Err(SchemaError::MalformedSchema(messages.join("; ")));
    }
    Ok(())
}
