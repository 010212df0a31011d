// Canonical intermediate form: a tagged union over the seven JSON kinds,
// the target of the canonicalizer and the input to the subtype decider.
//
// The shape mirrors the teacher crate's `schema::Type` tagged union
// (`src/schema.rs`), adapted from a validation type system to a
// containment-algebra type system: every variant here still carries one
// kind's constraint payload, but the payload describes a *set* of
// admissible values rather than a predicate to run against one instance.

pub mod algebra;
pub mod canonicalize;
pub mod negate;

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::number::{Bound, Rational};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    Boolean,
    String,
    Number,
    Integer,
    Array,
    Object,
}

pub const ALL_KINDS: [Kind; 7] = [
    Kind::Null,
    Kind::Boolean,
    Kind::String,
    Kind::Number,
    Kind::Integer,
    Kind::Array,
    Kind::Object,
];

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        f.write_str(s)
    }
}

impl Kind {
    pub fn from_keyword(s: &str) -> Option<Kind> {
        Some(match s {
            "null" => Kind::Null,
            "boolean" => Kind::Boolean,
            "string" => Kind::String,
            "number" => Kind::Number,
            "integer" => Kind::Integer,
            "array" => Kind::Array,
            "object" => Kind::Object,
            _ => return None,
        })
    }

    /// The kind of a literal JSON value, as used when grouping `enum`
    /// members by kind (§4.2).
    pub fn of_value(v: &Value) -> Kind {
        match v {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::String(_) => Kind::String,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Kind::Integer
                } else if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 {
                        Kind::Integer
                    } else {
                        Kind::Number
                    }
                } else {
                    Kind::Number
                }
            }
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumericConstraints {
    pub lower: Bound,
    pub upper: Bound,
    pub multiple_of: Option<Rational>,
}

#[derive(Debug, Clone)]
pub struct StringConstraints {
    pub min_length: u64,
    pub max_length: Option<u64>,
    /// Unanchored regex sources (`.*p.*` normal form) that must *all*
    /// match (AND). Empty means unconstrained. A bare `pattern` keyword
    /// produces a single entry; `allOf`-driven meets can accumulate more.
    pub patterns: Vec<String>,
}

impl Default for StringConstraints {
    fn default() -> Self {
        StringConstraints {
            min_length: 0,
            max_length: None,
            patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AdditionalItems {
    Schema(Box<CSchema>),
    False,
}

#[derive(Debug, Clone)]
pub enum ArrayShape {
    List(Box<CSchema>),
    Tuple {
        prefix: Vec<CSchema>,
        additional: AdditionalItems,
    },
}

impl Default for ArrayShape {
    fn default() -> Self {
        ArrayShape::List(Box::new(CSchema::top()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrayConstraints {
    pub shape: ArrayShape,
    pub min_items: u64,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

impl ArrayConstraints {
    /// The schema applied at tuple index `i` (§4.6: "effective schema").
    pub fn effective_at(&self, i: usize) -> CSchema {
        match &self.shape {
            ArrayShape::List(items) => (**items).clone(),
            ArrayShape::Tuple { prefix, additional } => {
                if i < prefix.len() {
                    prefix[i].clone()
                } else {
                    match additional {
                        AdditionalItems::Schema(s) => (**s).clone(),
                        AdditionalItems::False => CSchema::bottom(),
                    }
                }
            }
        }
    }

    pub fn prefix_len(&self) -> usize {
        match &self.shape {
            ArrayShape::List(_) => 0,
            ArrayShape::Tuple { prefix, .. } => prefix.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Schema(Box<CSchema>),
    False,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectConstraints {
    pub properties: Vec<(String, CSchema)>,
    /// Regex source (unanchored normal form) paired with its value schema.
    pub pattern_properties: Vec<(String, CSchema)>,
    pub additional_properties: Option<AdditionalProperties>,
    pub required: BTreeSet<String>,
    pub min_properties: u64,
    pub max_properties: Option<u64>,
}

impl ObjectConstraints {
    pub fn property(&self, name: &str) -> Option<&CSchema> {
        self.properties.iter().find(|(k, _)| k == name).map(|(_, s)| s)
    }

    pub fn additional_schema(&self) -> CSchema {
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(s)) => (**s).clone(),
            Some(AdditionalProperties::False) => CSchema::bottom(),
            None => CSchema::top(),
        }
    }

    /// The "effective schema at key k" (glossary): the meet of the
    /// explicit property schema (if any) and every `patternProperties`
    /// entry whose pattern matches `k`, falling back to
    /// `additionalProperties` when nothing explicit applies.
    pub fn effective_at(&self, name: &str) -> CSchema {
        let mut effective = self.property(name).cloned();
        let mut matched_pattern = false;
        for (pattern, schema) in &self.pattern_properties {
            if crate::regex_adapter::matches(pattern, name).unwrap_or(false) {
                matched_pattern = true;
                effective = Some(match effective {
                    Some(existing) => algebra::meet(&existing, schema),
                    None => schema.clone(),
                });
            }
        }
        if effective.is_none() && !matched_pattern {
            return self.additional_schema();
        }
        effective.unwrap_or_else(CSchema::top)
    }
}

impl Default for AdditionalProperties {
    fn default() -> Self {
        AdditionalProperties::Schema(Box::new(CSchema::top()))
    }
}

#[derive(Debug, Clone)]
pub enum Payload {
    Null,
    Boolean,
    String(StringConstraints),
    Number(NumericConstraints),
    Integer(NumericConstraints),
    Array(ArrayConstraints),
    Object(ObjectConstraints),
}

/// A single-kind canonical type schema (cTS).
#[derive(Debug, Clone)]
pub struct Cts {
    pub kind: Kind,
    pub payload: Payload,
    pub enum_set: Option<Vec<Value>>,
    pub reject: bool,
}

impl Cts {
    pub fn top(kind: Kind) -> Cts {
        let payload = match kind {
            Kind::Null => Payload::Null,
            Kind::Boolean => Payload::Boolean,
            Kind::String => Payload::String(StringConstraints::default()),
            Kind::Number => Payload::Number(NumericConstraints::default()),
            Kind::Integer => Payload::Integer(NumericConstraints::default()),
            Kind::Array => Payload::Array(ArrayConstraints::default()),
            Kind::Object => Payload::Object(ObjectConstraints::default()),
        };
        Cts {
            kind,
            payload,
            enum_set: None,
            reject: false,
        }
    }

    pub fn bottom(kind: Kind) -> Cts {
        let mut c = Cts::top(kind);
        c.reject = true;
        c
    }

    pub fn is_bottom(&self) -> bool {
        self.reject || matches!(&self.enum_set, Some(v) if v.is_empty())
    }

    pub fn numeric(&self) -> Option<&NumericConstraints> {
        match &self.payload {
            Payload::Number(n) | Payload::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&StringConstraints> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&ArrayConstraints> {
        match &self.payload {
            Payload::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn object(&self) -> Option<&ObjectConstraints> {
        match &self.payload {
            Payload::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// A canonical schema: either a single cTS, or a union of cTSs with
/// distinct kinds (spec §3's canonical union). Bottom is the empty
/// union; top is the union of all seven kinds' default cTSs.
#[derive(Debug, Clone)]
pub enum CSchema {
    Single(Box<Cts>),
    Union(Vec<Cts>),
}

impl CSchema {
    pub fn top() -> CSchema {
        CSchema::Union(ALL_KINDS.iter().map(|k| Cts::top(*k)).collect())
    }

    pub fn bottom() -> CSchema {
        CSchema::Union(Vec::new())
    }

    pub fn from_cts(c: Cts) -> CSchema {
        if c.is_bottom() {
            CSchema::bottom()
        } else {
            CSchema::Single(Box::new(c))
        }
    }

    /// Non-rejecting members, by kind. A `Single` that is itself bottom
    /// yields no members.
    pub fn members(&self) -> Vec<&Cts> {
        match self {
            CSchema::Single(c) => {
                if c.is_bottom() {
                    Vec::new()
                } else {
                    vec![c.as_ref()]
                }
            }
            CSchema::Union(members) => members.iter().filter(|c| !c.is_bottom()).collect(),
        }
    }

    pub fn is_bottom(&self) -> bool {
        self.members().is_empty()
    }

    pub fn is_top(&self) -> bool {
        ALL_KINDS.iter().all(|k| {
            self.members()
                .iter()
                .any(|c| c.kind == *k && c.enum_set.is_none() && is_unconstrained(c))
        })
    }

    pub fn member_of_kind(&self, kind: Kind) -> Option<&Cts> {
        self.members().into_iter().find(|c| c.kind == kind)
    }

    /// Builds a canonical union from a list of cTSs, merging members that
    /// share a kind (by join) and absorbing Integer into Number per §4.4
    /// when both are present in a way that makes Number the wider kind.
    pub fn union_from(cts: Vec<Cts>) -> CSchema {
        let mut by_kind: Vec<Cts> = Vec::new();
        for c in cts {
            if c.is_bottom() {
                continue;
            }
            if let Some(pos) = by_kind.iter().position(|existing| existing.kind == c.kind) {
                let existing = by_kind.remove(pos);
                by_kind.push(algebra::join_cts(&existing, &c));
            } else {
                by_kind.push(c);
            }
        }
        by_kind.retain(|c| !c.is_bottom());
        CSchema::Union(by_kind)
    }
}

fn is_unconstrained(c: &Cts) -> bool {
    match &c.payload {
        Payload::Null | Payload::Boolean => true,
        Payload::String(s) => s.min_length == 0 && s.max_length.is_none() && s.patterns.is_empty(),
        Payload::Number(n) | Payload::Integer(n) => {
            matches!(n.lower, Bound::Unbounded)
                && matches!(n.upper, Bound::Unbounded)
                && n.multiple_of.is_none()
        }
        _ => false,
    }
}

/// Is a degenerate (necessarily-empty) constraint combination? Checked
/// after canonicalization and after every algebraic rewrite, per spec's
/// "boundary behaviors": empty intervals/lengths/cardinalities collapse
/// to the all-reject form.
pub(crate) fn is_degenerate(c: &Cts) -> bool {
    match &c.payload {
        Payload::Number(n) | Payload::Integer(n) => {
            crate::number::interval_is_empty(&n.lower, &n.upper)
        }
        Payload::String(s) => matches!(s.max_length, Some(max) if s.min_length > max),
        Payload::Array(a) => matches!(a.max_items, Some(max) if a.min_items > max),
        Payload::Object(o) => matches!(o.max_properties, Some(max) if o.min_properties > max),
        _ => false,
    }
}
