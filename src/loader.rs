// Loader & Reference Resolver (spec §4.1). Parsing itself is a named
// collaborator (`serde_json`, out of scope per spec §1); this module picks
// up from an already-parsed tree and resolves `$ref` against the document's
// own `definitions`, producing a `$ref`-free tree or failing fast on
// anything it can't resolve locally.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::{Result, SchemaError, Side};

/// Resolves every `$ref` in `schema` against `schema` itself (local,
/// JSON-Pointer-only resolution -- spec §4.1 assumes local resolution is
/// sufficient and treats a remote ref with no loader as `UnresolvedRef`).
/// `side` identifies which half of the containment check this document is,
/// purely to label `UnsupportedRecursiveRef` correctly.
pub fn resolve(schema: &Value, side: Side) -> Result<Value> {
    let mut resolving: BTreeSet<String> = BTreeSet::new();
    resolve_node(schema, schema, side, &mut resolving)
}

fn resolve_node(root: &Value, node: &Value, side: Side, resolving: &mut BTreeSet<String>) -> Result<Value> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                return resolve_ref(root, pointer, side, resolving);
            }
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), resolve_node(root, v, side, resolving)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_node(root, item, side, resolving)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn resolve_ref(root: &Value, pointer: &str, side: Side, resolving: &mut BTreeSet<String>) -> Result<Value> {
    if !pointer.starts_with('#') {
        return Err(SchemaError::UnresolvedRef(format!(
            "only local (#/...) references are supported without a loader: {pointer}"
        )));
    }
    if !resolving.insert(pointer.to_string()) {
        return Err(SchemaError::UnsupportedRecursiveRef {
            which_side: side,
            pointer: pointer.to_string(),
        });
    }

    let target = json_pointer_lookup(root, pointer)
        .ok_or_else(|| SchemaError::UnresolvedRef(pointer.to_string()))?;
    let resolved = resolve_node(root, target, side, resolving);
    resolving.remove(pointer);
    resolved
}

/// Resolves a JSON Pointer (`#/a/b/0`) against `root`. Segments are
/// unescaped per RFC 6901 (`~1` → `/`, `~0` → `~`).
fn json_pointer_lookup<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix('#')?;
    if path.is_empty() {
        return Some(root);
    }
    let path = path.strip_prefix('/')?;
    let mut current = root;
    for raw_segment in path.split('/') {
        let segment = raw_segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_local_ref_against_definitions() {
        let schema = json!({
            "definitions": {"name": {"type": "string"}},
            "properties": {"who": {"$ref": "#/definitions/name"}}
        });
        let resolved = resolve(&schema, Side::Lhs).unwrap();
        assert_eq!(resolved["properties"]["who"], json!({"type": "string"}));
    }

    #[test]
    fn unresolvable_pointer_is_an_error() {
        let schema = json!({"$ref": "#/definitions/missing"});
        assert!(matches!(
            resolve(&schema, Side::Lhs),
            Err(SchemaError::UnresolvedRef(_))
        ));
    }

    #[test]
    fn remote_ref_without_loader_is_unresolved() {
        let schema = json!({"$ref": "https://example.com/schema.json"});
        assert!(matches!(
            resolve(&schema, Side::Rhs),
            Err(SchemaError::UnresolvedRef(_))
        ));
    }

    #[test]
    fn recursive_ref_is_rejected() {
        let schema = json!({
            "definitions": {
                "person": {
                    "type": "object",
                    "properties": {"friend": {"$ref": "#/definitions/person"}}
                }
            },
            "$ref": "#/definitions/person"
        });
        let err = resolve(&schema, Side::Rhs).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedRecursiveRef { which_side: Side::Rhs, .. }
        ));
    }
}
