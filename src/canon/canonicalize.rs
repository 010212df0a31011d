// Canonicalizer (spec §4.2): rewrites a resolved (ref-free) schema node
// into canonical form. Boolean connectives are pushed outward here;
// everything downstream (the decider) only ever sees `Cts`/`CSchema`.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError::MalformedSchema, SchemaError::UnsupportedEnumCanonicalization};
use crate::number::{Bound, NumericConstraints, Rational};
use crate::regex_adapter;

use super::{
    AdditionalItems, AdditionalProperties, ArrayConstraints, ArrayShape, CSchema, Cts, Kind,
    ObjectConstraints, Payload, StringConstraints, ALL_KINDS,
};
use super::algebra;
use super::negate;

pub fn from_value(v: &Value) -> Result<CSchema> {
    match v {
        Value::Bool(true) => Ok(CSchema::top()),
        Value::Bool(false) => Ok(CSchema::bottom()),
        Value::Object(map) => from_object(map),
        other => Err(MalformedSchema(format!(
            "schema node must be a boolean or an object, got {other}"
        ))),
    }
}

fn from_object(map: &Map<String, Value>) -> Result<CSchema> {
    if let Some(not_val) = map.get("not") {
        let inner = from_value(not_val)?;
        return negate::negate(&inner);
    }

    if let Some(one_of) = map.get("oneOf") {
        return from_one_of(one_of, map);
    }

    if let Some(all_of) = map.get("allOf") {
        return from_all_of(all_of, map);
    }

    if let Some(any_of) = map.get("anyOf") {
        return from_any_of(any_of, map);
    }

    base_case(map)
}

fn array_of(v: &Value, keyword: &str) -> Result<&Vec<Value>> {
    v.as_array()
        .ok_or_else(|| MalformedSchema(format!("{keyword} must be an array of schemas")))
}

fn from_all_of(all_of: &Value, map: &Map<String, Value>) -> Result<CSchema> {
    let members = array_of(all_of, "allOf")?;
    let mut result = CSchema::top();
    for member in members {
        let c = from_value(member)?;
        result = algebra::meet(&result, &c);
    }
    let siblings = base_case(&without(map, &["allOf"]))?;
    Ok(algebra::meet(&result, &siblings))
}

fn from_any_of(any_of: &Value, map: &Map<String, Value>) -> Result<CSchema> {
    let members = array_of(any_of, "anyOf")?;
    let mut result = CSchema::bottom();
    for member in members {
        let c = from_value(member)?;
        result = algebra::join(&result, &c);
    }
    let siblings = base_case(&without(map, &["anyOf"]))?;
    Ok(algebra::meet(&result, &siblings))
}

fn from_one_of(one_of: &Value, map: &Map<String, Value>) -> Result<CSchema> {
    let members_raw = array_of(one_of, "oneOf")?;
    let mut members = Vec::with_capacity(members_raw.len());
    for m in members_raw {
        members.push(from_value(m)?);
    }

    // exists-unique i == OR over i of (s_i AND AND_{j != i} NOT s_j)
    let mut result = CSchema::bottom();
    for i in 0..members.len() {
        let mut disjunct = members[i].clone();
        for (j, other) in members.iter().enumerate() {
            if i == j {
                continue;
            }
            let negated = negate::negate(other)?;
            disjunct = algebra::meet(&disjunct, &negated);
        }
        result = algebra::join(&result, &disjunct);
    }
    let siblings = base_case(&without(map, &["oneOf"]))?;
    Ok(algebra::meet(&result, &siblings))
}

fn without(map: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn base_case(map: &Map<String, Value>) -> Result<CSchema> {
    let enum_schema = if let Some(const_val) = map.get("const") {
        Some(enum_schema_from_values(std::slice::from_ref(const_val))?)
    } else if let Some(enum_val) = map.get("enum") {
        Some(enum_schema_from_values(array_of(enum_val, "enum")?)?)
    } else {
        None
    };

    let type_schema = type_schema_from_object(map)?;

    Ok(match enum_schema {
        Some(e) => algebra::meet(&e, &type_schema),
        None => type_schema,
    })
}

fn enum_schema_from_values(values: &[Value]) -> Result<CSchema> {
    if values.is_empty() {
        return Ok(CSchema::bottom());
    }
    let mut by_kind: Vec<(Kind, Vec<Value>)> = Vec::new();
    for v in values {
        let k = Kind::of_value(v);
        if k == Kind::Array || k == Kind::Object {
            return Err(UnsupportedEnumCanonicalization(v.to_string()));
        }
        match by_kind.iter_mut().find(|(kind, _)| *kind == k) {
            Some((_, vals)) => vals.push(v.clone()),
            None => by_kind.push((k, vec![v.clone()])),
        }
    }
    let ctss = by_kind
        .into_iter()
        .map(|(k, vals)| {
            let mut c = Cts::top(k);
            c.enum_set = Some(vals);
            c
        })
        .collect();
    Ok(CSchema::union_from(ctss))
}

fn type_schema_from_object(map: &Map<String, Value>) -> Result<CSchema> {
    match map.get("type") {
        None => {
            let mut ctss = Vec::with_capacity(7);
            for k in ALL_KINDS {
                ctss.push(build_cts_for_kind(k, map)?);
            }
            Ok(CSchema::union_from(ctss))
        }
        Some(Value::String(s)) => {
            let k = kind_from_keyword(s)?;
            Ok(CSchema::from_cts(build_cts_for_kind(k, map)?))
        }
        Some(Value::Array(arr)) => {
            let mut ctss = Vec::with_capacity(arr.len());
            for item in arr {
                let s = item
                    .as_str()
                    .ok_or_else(|| MalformedSchema("type array elements must be strings".into()))?;
                ctss.push(build_cts_for_kind(kind_from_keyword(s)?, map)?);
            }
            Ok(CSchema::union_from(ctss))
        }
        Some(other) => Err(MalformedSchema(format!(
            "type must be a string or an array of strings, got {other}"
        ))),
    }
}

fn kind_from_keyword(s: &str) -> Result<Kind> {
    Kind::from_keyword(s).ok_or_else(|| MalformedSchema(format!("unknown type keyword: {s}")))
}

fn build_cts_for_kind(kind: Kind, map: &Map<String, Value>) -> Result<Cts> {
    let payload = match kind {
        Kind::Null => Payload::Null,
        Kind::Boolean => Payload::Boolean,
        Kind::String => Payload::String(parse_string_constraints(map)?),
        Kind::Number => Payload::Number(parse_numeric_constraints(map)?),
        Kind::Integer => Payload::Integer(parse_numeric_constraints(map)?),
        Kind::Array => Payload::Array(parse_array_constraints(map)?),
        Kind::Object => Payload::Object(parse_object_constraints(map)?),
    };
    let mut c = Cts {
        kind,
        payload,
        enum_set: None,
        reject: false,
    };
    if super::is_degenerate(&c) {
        c.reject = true;
    }
    Ok(c)
}

fn get_bool(map: &Map<String, Value>, key: &str) -> Result<bool> {
    match map.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(MalformedSchema(format!("{key} must be a boolean, got {other}"))),
    }
}

fn get_u64(map: &Map<String, Value>, key: &str, default: u64) -> Result<u64> {
    match map.get(key) {
        None => Ok(default),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| MalformedSchema(format!("{key} must be a non-negative integer"))),
        Some(other) => Err(MalformedSchema(format!("{key} must be a non-negative integer, got {other}"))),
    }
}

fn parse_numeric_constraints(map: &Map<String, Value>) -> Result<NumericConstraints> {
    let excl_min = get_bool(map, "exclusiveMinimum")?;
    let excl_max = get_bool(map, "exclusiveMaximum")?;

    let lower = match map.get("minimum") {
        None => Bound::Unbounded,
        Some(Value::Number(n)) => Bound::finite(Rational::from_json_number(n)?, excl_min),
        Some(other) => return Err(MalformedSchema(format!("minimum must be a number, got {other}"))),
    };
    let upper = match map.get("maximum") {
        None => Bound::Unbounded,
        Some(Value::Number(n)) => Bound::finite(Rational::from_json_number(n)?, excl_max),
        Some(other) => return Err(MalformedSchema(format!("maximum must be a number, got {other}"))),
    };
    let multiple_of = match map.get("multipleOf") {
        None => None,
        Some(Value::Number(n)) => Some(Rational::multiple_of_from_json(n)?),
        Some(other) => return Err(MalformedSchema(format!("multipleOf must be a number, got {other}"))),
    };

    Ok(NumericConstraints {
        lower,
        upper,
        multiple_of,
    })
}

fn parse_string_constraints(map: &Map<String, Value>) -> Result<StringConstraints> {
    let min_length = get_u64(map, "minLength", 0)?;
    let max_length = match map.get("maxLength") {
        None => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .ok_or_else(|| MalformedSchema("maxLength must be a non-negative integer".into()))?,
        ),
        Some(other) => return Err(MalformedSchema(format!("maxLength must be an integer, got {other}"))),
    };
    let patterns = match map.get("pattern") {
        None => Vec::new(),
        Some(Value::String(p)) => vec![regex_adapter::unanchor(p)],
        Some(other) => return Err(MalformedSchema(format!("pattern must be a string, got {other}"))),
    };
    Ok(StringConstraints {
        min_length,
        max_length,
        patterns,
    })
}

fn parse_array_constraints(map: &Map<String, Value>) -> Result<ArrayConstraints> {
    let min_items = get_u64(map, "minItems", 0)?;
    let max_items = match map.get("maxItems") {
        None => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .ok_or_else(|| MalformedSchema("maxItems must be a non-negative integer".into()))?,
        ),
        Some(other) => return Err(MalformedSchema(format!("maxItems must be an integer, got {other}"))),
    };
    let unique_items = get_bool(map, "uniqueItems")?;

    let shape = match map.get("items") {
        None => ArrayShape::List(Box::new(CSchema::top())),
        Some(Value::Array(tuple_items)) => {
            let mut prefix = Vec::with_capacity(tuple_items.len());
            for item in tuple_items {
                prefix.push(from_value(item)?);
            }
            let additional = match map.get("additionalItems") {
                None => AdditionalItems::Schema(Box::new(CSchema::top())),
                Some(Value::Bool(false)) => AdditionalItems::False,
                Some(Value::Bool(true)) => AdditionalItems::Schema(Box::new(CSchema::top())),
                Some(schema) => AdditionalItems::Schema(Box::new(from_value(schema)?)),
            };
            ArrayShape::Tuple { prefix, additional }
        }
        Some(single) => ArrayShape::List(Box::new(from_value(single)?)),
    };

    Ok(ArrayConstraints {
        shape,
        min_items,
        max_items,
        unique_items,
    })
}

fn parse_object_constraints(map: &Map<String, Value>) -> Result<ObjectConstraints> {
    let min_properties = get_u64(map, "minProperties", 0)?;
    let max_properties = match map.get("maxProperties") {
        None => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .ok_or_else(|| MalformedSchema("maxProperties must be a non-negative integer".into()))?,
        ),
        Some(other) => {
            return Err(MalformedSchema(format!(
                "maxProperties must be an integer, got {other}"
            )))
        }
    };

    let mut required = BTreeSet::new();
    if let Some(req) = map.get("required") {
        for item in array_of(req, "required")? {
            let name = item
                .as_str()
                .ok_or_else(|| MalformedSchema("required entries must be strings".into()))?;
            required.insert(name.to_string());
        }
    }

    let mut properties = Vec::new();
    if let Some(Value::Object(props)) = map.get("properties") {
        for (name, schema) in props {
            properties.push((name.clone(), from_value(schema)?));
        }
    }

    let mut pattern_properties = Vec::new();
    if let Some(Value::Object(pats)) = map.get("patternProperties") {
        for (pattern, schema) in pats {
            pattern_properties.push((regex_adapter::unanchor(pattern), from_value(schema)?));
        }
    }

    let additional_properties = match map.get("additionalProperties") {
        None => AdditionalProperties::Schema(Box::new(CSchema::top())),
        Some(Value::Bool(false)) => AdditionalProperties::False,
        Some(Value::Bool(true)) => AdditionalProperties::Schema(Box::new(CSchema::top())),
        Some(schema) => AdditionalProperties::Schema(Box::new(from_value(schema)?)),
    };

    Ok(ObjectConstraints {
        properties,
        pattern_properties,
        additional_properties: Some(additional_properties),
        required,
        min_properties,
        max_properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_type_produces_single_cts() {
        let v = json!({"type": "integer"});
        let c = from_value(&v).unwrap();
        assert_eq!(c.members().len(), 1);
        assert_eq!(c.members()[0].kind, Kind::Integer);
    }

    #[test]
    fn type_array_produces_union() {
        let v = json!({"type": ["integer", "string"]});
        let c = from_value(&v).unwrap();
        let kinds: Vec<_> = c.members().iter().map(|m| m.kind).collect();
        assert!(kinds.contains(&Kind::Integer));
        assert!(kinds.contains(&Kind::String));
    }

    #[test]
    fn empty_enum_is_bottom() {
        let v = json!({"enum": []});
        let c = from_value(&v).unwrap();
        assert!(c.is_bottom());
    }

    #[test]
    fn enum_rejects_array_literal() {
        let v = json!({"enum": [[1, 2]]});
        assert!(from_value(&v).is_err());
    }

    #[test]
    fn all_of_string_and_integer_is_bottom() {
        let v = json!({"allOf": [{"type": "string"}, {"type": "integer"}]});
        let c = from_value(&v).unwrap();
        assert!(c.is_bottom());
    }

    #[test]
    fn degenerate_interval_collapses_to_bottom() {
        let v = json!({"type": "number", "minimum": 10, "maximum": 5});
        let c = from_value(&v).unwrap();
        assert!(c.is_bottom());
    }
}
