//! Canonical ABI Data Model
//!
//! Foundational types for the value-coercion engine: data-type descriptors,
//! the user-defined type table, loosely-typed source values, wrapped
//! (strictly-typed) results, method signatures, and transaction options.
//!
//! These types are designed to be:
//! - Closed-variant (every consumer can match exhaustively)
//! - Deterministically serializable
//! - Immutable once constructed

pub mod data_type;
pub mod signature;
pub mod tx_options;
pub mod user_types;
pub mod value;
pub mod wrapped;

pub use data_type::{
    DataType, FunctionKind, Member, Mutability, TypeId, ADDRESS_SIZE, SELECTOR_SIZE,
};
pub use signature::MethodSignature;
pub use tx_options::TxOptions;
pub use user_types::{UserDefinedType, UserDefinedTypes};
pub use value::Value;
pub use wrapped::{
    DecodeErrorKind, StringPayload, ValuePayload, WrappedError, WrappedMember, WrappedResult,
    WrappedValue,
};
