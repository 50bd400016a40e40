//! Wrapped (strictly-typed) results
//!
//! The output side of coercion: a value paired with the descriptor it was
//! coerced to. A wrapped *error* result is a previously failed decode; the
//! engine accepts a small set of those back as inputs (for example an
//! out-of-range boolean byte pattern, which re-wraps as `true`).

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::tx_options::TxOptions;

/// Outcome of a previous decode or coercion: a typed value or a typed error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WrappedResult {
    Value(WrappedValue),
    Error(WrappedError),
}

/// A successfully coerced value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedValue {
    /// The descriptor this value conforms to
    pub ty: DataType,
    /// Type-specific payload
    pub value: ValuePayload,
}

impl WrappedValue {
    pub fn new(ty: DataType, value: ValuePayload) -> Self {
        Self { ty, value }
    }
}

/// Type-specific payload of a wrapped value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValuePayload {
    Bool(bool),
    /// Raw bytes, already padded to the static length where applicable
    Bytes(Vec<u8>),
    /// Integer payload for uint/int types
    Int(BigInt),
    /// Decimal payload for fixed/ufixed types
    Decimal(BigDecimal),
    /// Enum payload: numeric value plus the resolved option name
    Enum { numeric: BigInt, option: String },
    /// Canonical checksummed `0x…` address
    Address(String),
    /// Contract reference, canonical checksummed address
    Contract { address: String },
    String(StringPayload),
    /// External function reference
    Function {
        address: String,
        selector: [u8; 4],
    },
    /// Tuple or struct members in declaration order
    Tuple(Vec<WrappedMember>),
    /// Array elements in order
    Array(Vec<WrappedValue>),
    Options(TxOptions),
}

/// One member of a wrapped tuple or struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedMember {
    pub name: Option<String>,
    pub value: WrappedValue,
}

/// String payload with partial-decode reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringPayload {
    /// Well-formed UTF-8 text
    Valid(String),
    /// Bytes that did not decode as UTF-8, kept raw
    Malformed(Vec<u8>),
}

/// A previously failed decode, re-presented as input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedError {
    /// The descriptor the failed decode was against
    pub ty: DataType,
    /// What went wrong
    pub kind: DecodeErrorKind,
}

/// The decode-error variants the coercion engine knows how to interpret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodeErrorKind {
    /// A boolean word held something other than 0 or 1
    BoolOutOfRange { raw: BigInt },
    /// A boolean word was padded incorrectly
    BoolMisPadded { raw: Vec<u8> },
    /// An enum word held a value outside the option list
    EnumOutOfRange { numeric: BigInt },
    /// Anything else; opaque to this engine
    Other(String),
}
