//! Loosely-typed source values
//!
//! The input side of coercion: whatever shape the caller hands us before
//! any type checking has happened. A [`Value`] is read-only input; the
//! engine never mutates one.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wrapped::WrappedResult;

/// An untyped caller-supplied value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean primitive
    Bool(bool),
    /// Machine-integer primitive
    Int(i64),
    /// Floating-point primitive
    Float(f64),
    /// Text
    String(String),
    /// Byte-array-like object
    Bytes(Vec<u8>),
    /// Arbitrary-precision integer
    BigInt(BigInt),
    /// Arbitrary-precision decimal
    BigDecimal(BigDecimal),
    /// Ordered sequence
    Sequence(Vec<Value>),
    /// Key-ordered record
    Record(Vec<(String, Value)>),
    /// Explicit disambiguation pair: `{type: "<name>", value: <inner>}`
    TypeValue {
        type_name: String,
        value: Box<Value>,
    },
    /// A previously-produced typed result, accepted for re-wrapping
    Wrapped(Box<WrappedResult>),
}

impl Value {
    /// Build a record value from key/value pairs
    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Build an explicit type/value pair
    pub fn type_value(type_name: impl Into<String>, value: Value) -> Self {
        Value::TypeValue {
            type_name: type_name.into(),
            value: Box::new(value),
        }
    }

    /// Short noun phrase describing the value's shape, for diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "a boolean",
            Value::Int(_) => "a number",
            Value::Float(_) => "a number",
            Value::String(_) => "a string",
            Value::Bytes(_) => "a byte array",
            Value::BigInt(_) => "a big integer",
            Value::BigDecimal(_) => "a big decimal",
            Value::Sequence(_) => "a sequence",
            Value::Record(_) => "a record",
            Value::TypeValue { .. } => "a type/value pair",
            Value::Wrapped(_) => "a wrapped result",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::BigInt(b) => write!(f, "{}", b),
            Value::BigDecimal(d) => write!(f, "{}", d),
            Value::Sequence(items) => write!(f, "a sequence of {} elements", items.len()),
            Value::Record(entries) => write!(f, "a record with {} entries", entries.len()),
            Value::TypeValue { type_name, .. } => {
                write!(f, "a type/value pair for type {}", type_name)
            }
            Value::Wrapped(_) => write!(f, "a wrapped result"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(b: BigInt) -> Self {
        Value::BigInt(b)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::BigDecimal(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}
