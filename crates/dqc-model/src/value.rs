use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar (or multi-valued) metadata field value.
///
/// Mirrors what JSON field extraction produces: numbers, strings,
/// booleans, nulls, and flat lists (multi-valued DICOM elements such as
/// `ImageType`). Integers and floats that denote the same number compare
/// equal via [`value_eq`] and share a grouping key via [`Value::key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Canonical grouping key for this value.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int(i) => ValueKey::Int(*i),
            Value::Float(f) => float_key(*f),
            Value::Str(s) => ValueKey::Str(s.clone()),
            Value::List(items) => ValueKey::List(items.iter().map(Value::key).collect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "N/A"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Compare two values for equality with numeric cross-type semantics.
///
/// `Int(8)` equals `Float(8.0)`; lists compare element-wise with the
/// same rule. Everything else falls back to structural equality.
pub fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| value_eq(l, r))
        }
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

/// Canonical, hashable, totally ordered form of a [`Value`].
///
/// Structurally equal values map to equal keys regardless of
/// representation: integral floats collapse to `Int`, `-0.0` collapses
/// to `0.0`, and lists canonicalize element-wise. `Null` is a valid key,
/// so missing values form their own group instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of a canonicalized, non-integral f64.
    Float(u64),
    Str(String),
    List(Vec<ValueKey>),
}

fn float_key(f: f64) -> ValueKey {
    if f == 0.0 {
        return ValueKey::Int(0);
    }
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        return ValueKey::Int(f as i64);
    }
    if f.is_nan() {
        return ValueKey::Float(f64::NAN.to_bits());
    }
    ValueKey::Float(f.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_equality_crosses_int_and_float() {
        assert!(value_eq(&Value::Int(8), &Value::Float(8.0)));
        assert!(!value_eq(&Value::Float(7.999_999), &Value::Int(8)));
        assert!(value_eq(
            &Value::List(vec![Value::Int(1), Value::Float(2.0)]),
            &Value::List(vec![Value::Float(1.0), Value::Int(2)]),
        ));
    }

    #[test]
    fn keys_canonicalize_numeric_representations() {
        assert_eq!(Value::Int(8).key(), Value::Float(8.0).key());
        assert_eq!(Value::Float(0.0).key(), Value::Float(-0.0).key());
        assert_ne!(Value::Float(3.1).key(), Value::Int(3).key());
        assert_eq!(
            Value::List(vec![Value::Int(1)]).key(),
            Value::List(vec![Value::Float(1.0)]).key(),
        );
    }

    #[test]
    fn null_is_a_key() {
        assert_eq!(Value::Null.key(), ValueKey::Null);
        assert_ne!(Value::Null.key(), Value::Str(String::new()).key());
    }

    #[test]
    fn round_trips_through_json() {
        let value: Value = serde_json::from_str("[1, 2.5, \"ORIGINAL\", null]").expect("parse");
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Str("ORIGINAL".to_string()),
                Value::Null,
            ])
        );
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, "[1,2.5,\"ORIGINAL\",null]");
    }
}
