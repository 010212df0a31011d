// Exact rational arithmetic backing the numeric decider.
//
// `multipleOf` divisibility cannot be decided with `f64` equality --
// `0.2 / 0.1` does not round to an exact integer in binary floating point.
// Everything here is built on `num_rational::BigRational`, so comparisons
// and divisibility checks are exact regardless of how many decimal digits
// the input schema wrote.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde_json::Number as JsonNumber;
use std::cmp::Ordering;
use std::fmt;

use crate::error::SchemaError::MalformedSchema;

/// An exact rational number, stored numerator/denominator in lowest terms
/// by virtue of `BigRational`'s own invariant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rational(BigRational);

impl Rational {
    pub fn zero() -> Self {
        Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Rational(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// True if this value is a positive integer (every `multipleOf`
    /// candidate that makes Number <: Integer hold).
    pub fn is_positive_integer(&self) -> bool {
        self.is_positive() && self.is_integer()
    }

    /// `self / other`, exact.
    pub fn checked_div(&self, other: &Rational) -> Option<Rational> {
        if other.is_zero() {
            None
        } else {
            Some(Rational(&self.0 / &other.0))
        }
    }

    /// Whether `other` divides `self` evenly, i.e. `self / other` is a
    /// positive integer -- the divisibility relation used by `multipleOf`
    /// containment (spec: "c2.multipleOf divides c1.multipleOf").
    pub fn divides(&self, other: &Rational) -> bool {
        match self.checked_div(other) {
            Some(ratio) => ratio.is_positive_integer(),
            None => false,
        }
    }

    /// Least value `m` that both `self` and `other` divide (used when
    /// meeting two `multipleOf` constraints). For rationals a/b and c/d in
    /// lowest terms, lcm(a/b, c/d) = lcm(a,c) / gcd(b,d).
    pub fn lcm(&self, other: &Rational) -> Rational {
        let (n1, d1) = (self.0.numer(), self.0.denom());
        let (n2, d2) = (other.0.numer(), other.0.denom());
        let numer = lcm_bigint(n1, n2);
        let denom = gcd_bigint(d1, d2);
        Rational(BigRational::new(numer, denom))
    }

    pub fn from_f64(value: f64) -> Option<Rational> {
        BigRational::from_float(value).map(Rational)
    }

    pub fn from_json_number(n: &JsonNumber) -> crate::error::Result<Rational> {
        if let Some(i) = n.as_i64() {
            return Ok(Rational(BigRational::from_integer(BigInt::from(i))));
        }
        if let Some(u) = n.as_u64() {
            return Ok(Rational(BigRational::from_integer(BigInt::from(u))));
        }
        let f = n
            .as_f64()
            .ok_or_else(|| MalformedSchema(format!("numeric literal out of range: {n}")))?;
        Rational::from_f64(f)
            .ok_or_else(|| MalformedSchema(format!("numeric literal is not finite: {n}")))
    }

    /// Parses a `multipleOf` value, rejecting the non-positive values
    /// Draft-4 meta-validation forbids.
    pub fn multiple_of_from_json(n: &JsonNumber) -> crate::error::Result<Rational> {
        let r = Rational::from_json_number(n)?;
        if !r.is_positive() {
            return Err(MalformedSchema(format!(
                "multipleOf must be strictly positive, got {n}"
            )));
        }
        Ok(r)
    }

    pub fn to_f64(&self) -> f64 {
        numer_denom_to_f64(self.0.numer(), self.0.denom())
    }
}

impl From<i64> for Rational {
    fn from(v: i64) -> Self {
        Rational(BigRational::from_integer(BigInt::from(v)))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

fn gcd_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn lcm_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    let g = gcd_bigint(a, b);
    (a / &g) * b
}

fn numer_denom_to_f64(numer: &BigInt, denom: &BigInt) -> f64 {
    // Adequate for presentation; exactness is only required for
    // divisibility decisions, which never go through this path.
    let n: f64 = numer.to_string().parse().unwrap_or(f64::NAN);
    let d: f64 = denom.to_string().parse().unwrap_or(f64::NAN);
    n / d
}

/// A bound on a numeric interval: unbounded, or a finite rational edge
/// with an exclusivity flag (Draft-4 boolean `exclusiveMinimum`/`Maximum`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Unbounded,
    Finite { value: Rational, exclusive: bool },
}

impl Bound {
    pub fn finite(value: Rational, exclusive: bool) -> Self {
        Bound::Finite { value, exclusive }
    }
}

/// Is lower bound `a` at least as tight as lower bound `b` (a >= b,
/// exclusivity considered)? Used for "c1.min >= c2.min".
pub fn lower_at_least_as_tight(a: &Bound, b: &Bound) -> bool {
    match (a, b) {
        (_, Bound::Unbounded) => true,
        (Bound::Unbounded, Bound::Finite { .. }) => false,
        (
            Bound::Finite {
                value: av,
                exclusive: ae,
            },
            Bound::Finite {
                value: bv,
                exclusive: be,
            },
        ) => match av.0.cmp(&bv.0) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => *ae || !*be,
        },
    }
}

/// Same as [`lower_at_least_as_tight`] but for upper bounds (a <= b).
pub fn upper_at_least_as_tight(a: &Bound, b: &Bound) -> bool {
    match (a, b) {
        (_, Bound::Unbounded) => true,
        (Bound::Unbounded, Bound::Finite { .. }) => false,
        (
            Bound::Finite {
                value: av,
                exclusive: ae,
            },
            Bound::Finite {
                value: bv,
                exclusive: be,
            },
        ) => match av.0.cmp(&bv.0) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => *ae || !*be,
        },
    }
}

/// Intersect two lower bounds: the tighter (larger) one wins; exclusivity
/// ORs when the values are equal.
pub fn meet_lower(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other.clone(),
        (
            Bound::Finite {
                value: av,
                exclusive: ae,
            },
            Bound::Finite {
                value: bv,
                exclusive: be,
            },
        ) => match av.0.cmp(&bv.0) {
            Ordering::Greater => a.clone(),
            Ordering::Less => b.clone(),
            Ordering::Equal => Bound::finite(av.clone(), *ae || *be),
        },
    }
}

pub fn meet_upper(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other.clone(),
        (
            Bound::Finite {
                value: av,
                exclusive: ae,
            },
            Bound::Finite {
                value: bv,
                exclusive: be,
            },
        ) => match av.0.cmp(&bv.0) {
            Ordering::Less => a.clone(),
            Ordering::Greater => b.clone(),
            Ordering::Equal => Bound::finite(av.clone(), *ae || *be),
        },
    }
}

/// Is the interval `[lower, upper]` empty?
pub fn interval_is_empty(lower: &Bound, upper: &Bound) -> bool {
    match (lower, upper) {
        (
            Bound::Finite {
                value: lv,
                exclusive: le,
            },
            Bound::Finite {
                value: uv,
                exclusive: ue,
            },
        ) => match lv.0.cmp(&uv.0) {
            Ordering::Greater => true,
            Ordering::Equal => *le || *ue,
            Ordering::Less => false,
        },
        _ => false,
    }
}

/// Does `v` satisfy lower bound `b` (v >= b, or v > b when exclusive)?
pub fn bound_satisfied_lower(b: &Bound, v: &Rational) -> bool {
    match b {
        Bound::Unbounded => true,
        Bound::Finite { value, exclusive } => match v.0.cmp(&value.0) {
            Ordering::Greater => true,
            Ordering::Equal => !*exclusive,
            Ordering::Less => false,
        },
    }
}

/// Does `v` satisfy upper bound `b` (v <= b, or v < b when exclusive)?
pub fn bound_satisfied_upper(b: &Bound, v: &Rational) -> bool {
    match b {
        Bound::Unbounded => true,
        Bound::Finite { value, exclusive } => match v.0.cmp(&value.0) {
            Ordering::Less => true,
            Ordering::Equal => !*exclusive,
            Ordering::Greater => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn divisibility_is_exact_for_decimals() {
        // 0.2 / 0.1 must be exactly 2, not 1.9999999999999998.
        let a = r(2, 10);
        let b = r(1, 10);
        assert!(a.divides(&b));
    }

    #[test]
    fn non_divisible_decimals() {
        let a = r(45, 10); // 4.5
        let b = r(2, 1); // 2.0
        assert!(!a.divides(&b));
    }

    #[test]
    fn positive_integer_multiple_of_makes_number_subtype_of_integer() {
        let one = r(1, 1);
        assert!(one.is_positive_integer());
        let one_point_zero = Rational::from_f64(1.0).unwrap();
        assert!(one_point_zero.is_positive_integer());
    }

    #[test]
    fn multiple_of_rejects_non_positive() {
        let zero = serde_json::Number::from_f64(0.0).unwrap();
        assert!(Rational::multiple_of_from_json(&zero).is_err());
    }

    #[test]
    fn lcm_of_rationals() {
        let a = r(1, 2);
        let b = r(1, 3);
        let l = a.lcm(&b);
        // lcm(1/2, 1/3) = lcm(1,1)/gcd(2,3) = 1/1 = 1
        assert_eq!(l, r(1, 1));
    }
}
