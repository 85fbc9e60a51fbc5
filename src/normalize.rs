//! Component A — coerces values into the canonical [`Value`] tree.
//!
//! `normalize` is idempotent: `normalize(normalize(v)) == normalize(v)` for
//! any `v`. The serde [`crate::ser`] path calls [`normalize_f64`] directly
//! while building numbers so it never has to round-trip a denormalized
//! `Value` through this module; `normalize` itself exists for callers who
//! build a `Value` tree by hand (the [`crate::value!`] macro, direct
//! `Value::Obj` construction) and want the same guarantees applied after
//! the fact.

use crate::{ToonMap, Value};

/// Normalizes a tree that may not already satisfy the invariants: `-0.0`
/// folds to `Int(0)`, non-finite floats fold to `Null`, integer-valued
/// floats fold to `Int`, and every nested value is normalized recursively.
#[must_use]
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(b),
        Value::Int(i) => Value::Int(i),
        Value::Float(f) => normalize_f64(f),
        Value::Str(s) => Value::Str(s),
        Value::List(items) => Value::List(items.into_iter().map(normalize).collect()),
        Value::Obj(map) => {
            let mut out = ToonMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, normalize(v));
            }
            Value::Obj(out)
        }
    }
}

/// Implements the floating-point normalization rule of §4.A:
/// - negative zero (tested via sign bit, not just `== 0.0`) becomes `Int(0)`;
/// - non-finite values (`NaN`, `+inf`, `-inf`) become `Null`;
/// - finite values with no fractional part that fit in `i64` become `Int`;
/// - everything else stays `Float`.
#[must_use]
pub fn normalize_f64(v: f64) -> Value {
    if v == 0.0 && v.is_sign_negative() {
        return Value::Int(0);
    }
    if !v.is_finite() {
        return Value::Null;
    }
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        return Value::Int(v as i64);
    }
    Value::Float(v)
}

/// Interface for user-defined type normalization, named in §4.A as an
/// external collaborator: when registered for a type, the adapter's output
/// replaces the value before normalization runs again on the result (so an
/// adapter may itself return a `Str`, a nested `Obj`, anything). No
/// registry or dispatch mechanism is implemented here — this crate's
/// adapter path is the ordinary `serde::Serialize` impl a type author
/// writes, which the [`crate::ser`] serializer already honors.
pub trait NormalizeAdapter {
    fn adapt(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_normalizes_to_int_zero() {
        assert_eq!(normalize_f64(-0.0), Value::Int(0));
    }

    #[test]
    fn positive_zero_is_int_zero_too() {
        assert_eq!(normalize_f64(0.0), Value::Int(0));
    }

    #[test]
    fn nan_and_infinities_normalize_to_null() {
        assert_eq!(normalize_f64(f64::NAN), Value::Null);
        assert_eq!(normalize_f64(f64::INFINITY), Value::Null);
        assert_eq!(normalize_f64(f64::NEG_INFINITY), Value::Null);
    }

    #[test]
    fn integer_valued_float_becomes_int() {
        assert_eq!(normalize_f64(3.0), Value::Int(3));
        assert_eq!(normalize_f64(-7.0), Value::Int(-7));
    }

    #[test]
    fn fractional_float_stays_float() {
        assert_eq!(normalize_f64(3.5), Value::Float(3.5));
    }

    #[test]
    fn normalize_is_idempotent_on_nested_tree() {
        let mut obj = ToonMap::new();
        obj.insert("a".into(), Value::Float(-0.0));
        obj.insert(
            "b".into(),
            Value::List(vec![Value::Float(f64::NAN), Value::Int(2)]),
        );
        let v = Value::Obj(obj);
        let once = normalize(v.clone());
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }
}
