//! Data-type descriptors
//!
//! Immutable descriptions of the target types a value can be coerced to.
//! Descriptors are supplied by the caller; the engine only constructs the
//! synthetic wrappers it needs internally (a one-off tuple for batching
//! several top-level values, and the address / 4-byte selector pair used
//! when decomposing an external function reference).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a user-defined type (enum, struct, or value type),
/// resolved through [`crate::UserDefinedTypes`].
pub type TypeId = String;

/// Address width in bytes
pub const ADDRESS_SIZE: usize = 20;

/// External function selector width in bytes
pub const SELECTOR_SIZE: usize = 4;

/// A target data type for coercion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataType {
    /// Boolean
    Bool,

    /// Byte string; `length` of `Some(n)` is static `bytesN`, `None` is dynamic
    Bytes { length: Option<usize> },

    /// Unsigned integer of the given bit width (8..=256, multiple of 8)
    Uint { bits: u16 },

    /// Signed integer of the given bit width
    Int { bits: u16 },

    /// Signed fixed-point decimal: `bits` total, `places` decimal places
    Fixed { bits: u16, places: u32 },

    /// Unsigned fixed-point decimal
    Ufixed { bits: u16, places: u32 },

    /// Enumeration; option list lives in the user-type table
    Enum { id: TypeId },

    /// Account address
    Address { payable: bool },

    /// Reference to a deployed contract; substitutable with `Address`
    Contract { id: TypeId },

    /// UTF-8 string
    String,

    /// External function reference (address + selector)
    FunctionExternal { function: FunctionKind },

    /// Anonymous tuple with inline member list
    Tuple { members: Vec<Member> },

    /// Named struct; member list lives in the user-type table
    Struct { id: TypeId },

    /// User-defined value type; resolved to its underlying built-in type
    /// before coercion or comparison
    UserDefinedValueType { id: TypeId },

    /// Statically or dynamically sized array
    Array {
        element: Box<DataType>,
        length: Option<u64>,
    },

    /// Transaction-options record
    Options,
}

/// Shape of an external function type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    /// "Some external function"; no signature information
    General,
    /// Fully specified signature
    Specific {
        mutability: Mutability,
        inputs: Vec<DataType>,
        outputs: Vec<DataType>,
    },
}

/// State mutability of a function type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

/// A named or positional component of a tuple, struct, or signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Component name, if any
    pub name: Option<String>,
    /// Component type
    pub ty: DataType,
}

impl Member {
    /// Create an unnamed member
    pub fn unnamed(ty: DataType) -> Self {
        Self { name: None, ty }
    }

    /// Create a named member
    pub fn named(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }
}

impl DataType {
    /// `uint<bits>`
    pub const fn uint(bits: u16) -> Self {
        DataType::Uint { bits }
    }

    /// `int<bits>`
    pub const fn int(bits: u16) -> Self {
        DataType::Int { bits }
    }

    /// Dynamic `bytes`
    pub const fn bytes_dynamic() -> Self {
        DataType::Bytes { length: None }
    }

    /// Static `bytes<n>`
    pub const fn bytes_static(length: usize) -> Self {
        DataType::Bytes {
            length: Some(length),
        }
    }

    /// Default fixed-point type: `fixed128x18`
    pub const fn fixed_default() -> Self {
        DataType::Fixed {
            bits: 128,
            places: 18,
        }
    }

    /// Default unsigned fixed-point type: `ufixed128x18`
    pub const fn ufixed_default() -> Self {
        DataType::Ufixed {
            bits: 128,
            places: 18,
        }
    }

    /// The Vyper `decimal` alias: `fixed168x10`
    pub const fn decimal() -> Self {
        DataType::Fixed {
            bits: 168,
            places: 10,
        }
    }

    /// Non-payable address
    pub const fn address() -> Self {
        DataType::Address { payable: false }
    }

    /// Whether this type is an integer or enum (the shared coercion family)
    pub fn is_integer_family(&self) -> bool {
        matches!(
            self,
            DataType::Uint { .. } | DataType::Int { .. } | DataType::Enum { .. }
        )
    }

    /// Whether this type is a fixed-point decimal
    pub fn is_decimal(&self) -> bool {
        matches!(self, DataType::Fixed { .. } | DataType::Ufixed { .. })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Bytes { length: None } => write!(f, "bytes"),
            DataType::Bytes { length: Some(n) } => write!(f, "bytes{}", n),
            DataType::Uint { bits } => write!(f, "uint{}", bits),
            DataType::Int { bits } => write!(f, "int{}", bits),
            DataType::Fixed { bits, places } => write!(f, "fixed{}x{}", bits, places),
            DataType::Ufixed { bits, places } => write!(f, "ufixed{}x{}", bits, places),
            DataType::Enum { id } => write!(f, "{}", id),
            DataType::Address { payable: false } => write!(f, "address"),
            DataType::Address { payable: true } => write!(f, "address payable"),
            DataType::Contract { id } => write!(f, "{}", id),
            DataType::String => write!(f, "string"),
            DataType::FunctionExternal { .. } => write!(f, "function"),
            DataType::Tuple { members } => {
                write!(f, "(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", member.ty)?;
                }
                write!(f, ")")
            }
            DataType::Struct { id } => write!(f, "{}", id),
            DataType::UserDefinedValueType { id } => write!(f, "{}", id),
            DataType::Array {
                element,
                length: None,
            } => write!(f, "{}[]", element),
            DataType::Array {
                element,
                length: Some(n),
            } => write!(f, "{}[{}]", element, n),
            DataType::Options => write!(f, "options"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(DataType::uint(256).to_string(), "uint256");
        assert_eq!(DataType::bytes_static(32).to_string(), "bytes32");
        assert_eq!(DataType::bytes_dynamic().to_string(), "bytes");
        assert_eq!(DataType::fixed_default().to_string(), "fixed128x18");
        assert_eq!(DataType::decimal().to_string(), "fixed168x10");
        assert_eq!(
            DataType::Address { payable: true }.to_string(),
            "address payable"
        );
        let tuple = DataType::Tuple {
            members: vec![
                Member::unnamed(DataType::uint(8)),
                Member::unnamed(DataType::Bool),
            ],
        };
        assert_eq!(tuple.to_string(), "(uint8,bool)");
    }

    #[test]
    fn test_array_display() {
        let arr = DataType::Array {
            element: Box::new(DataType::uint(256)),
            length: Some(3),
        };
        assert_eq!(arr.to_string(), "uint256[3]");
        let dynamic = DataType::Array {
            element: Box::new(DataType::String),
            length: None,
        };
        assert_eq!(dynamic.to_string(), "string[]");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let ty = DataType::Fixed {
            bits: 128,
            places: 18,
        };
        let json = serde_json::to_string(&ty).expect("Should serialize");
        let restored: DataType = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(ty, restored);
    }
}
