//! Per-type coercion case libraries
//!
//! One ordered case list per data-type class. Order encodes priority
//! among ambiguous input shapes and is part of the external contract:
//! the first case that accepts a value decides its interpretation.

pub mod address;
pub mod boolean;
pub mod bytes;
pub mod container;
pub mod decimal;
pub mod function;
pub mod integer;
pub mod string;
pub mod tx_options;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use lib_abi_types::{DataType, Member, Value, ValuePayload, WrappedValue};

use crate::dispatch::{dispatch_cases, WrapCase};
use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::Resolver;

/// Coerce `value` to `ty`.
///
/// The top-level entry point. User-defined value types are resolved to
/// their underlying built-in type first; everything else dispatches to
/// the case list for its type class.
pub fn wrap(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let ty = opts.user_types.resolve_value_type(ty).map_err(|id| {
        WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::PERMANENT,
            format!("type references unknown user-defined type {}", id),
        )
    })?;

    let cases: &[WrapCase] = match &ty {
        DataType::Bool => boolean::CASES,
        DataType::Bytes { .. } => bytes::CASES,
        DataType::Uint { .. } | DataType::Int { .. } | DataType::Enum { .. } => integer::CASES,
        DataType::Fixed { .. } | DataType::Ufixed { .. } => decimal::CASES,
        DataType::Address { .. } | DataType::Contract { .. } => address::CASES,
        DataType::String => string::CASES,
        DataType::FunctionExternal { .. } => function::CASES,
        DataType::Array { .. } => container::ARRAY_CASES,
        DataType::Tuple { .. } | DataType::Struct { .. } => container::TUPLE_CASES,
        DataType::Options => tx_options::CASES,
        DataType::UserDefinedValueType { id } => {
            return Err(WrapError::mismatch(
                &ty,
                value,
                &opts.name,
                specificity::PERMANENT,
                format!("user-defined type {} did not resolve to a built-in type", id),
            ))
        }
    };
    dispatch_cases(&ty, value, opts, resolver, cases)
}

/// Coerce several top-level values at once through a synthetic tuple.
pub fn wrap_multiple(
    types: &[DataType],
    values: &[Value],
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<Vec<WrappedValue>> {
    let tuple = DataType::Tuple {
        members: types.iter().cloned().map(Member::unnamed).collect(),
    };
    let sequence = Value::Sequence(values.to_vec());
    let wrapped = wrap(&tuple, &sequence, opts, resolver)?;
    match wrapped.value {
        ValuePayload::Tuple(members) => Ok(members.into_iter().map(|m| m.value).collect()),
        _ => Err(WrapError::mismatch(
            &tuple,
            &sequence,
            &opts.name,
            specificity::PERMANENT,
            "batch coercion did not produce a tuple payload",
        )),
    }
}

// =============================================================================
// Shared case helpers
// =============================================================================

/// Shape-level rejection: the case did not recognize this input at all
pub(crate) fn shape_mismatch(ty: &DataType, value: &Value, opts: &WrapOptions<'_>) -> WrapError {
    WrapError::mismatch(
        ty,
        value,
        &opts.name,
        specificity::UNRECOGNIZED,
        format!("{} was not recognized here", value.shape_name()),
    )
}

/// Content-level rejection: the shape matched but validation failed
pub(crate) fn validation_failure(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    reason: impl Into<String>,
) -> WrapError {
    WrapError::mismatch(ty, value, &opts.name, specificity::VALIDATION, reason)
}

/// Interpret `value` as a byte array, if it is shaped like one.
///
/// `None` means the shape does not apply at all; `Some(Err(reason))` means
/// the shape matched but an element failed validation.
pub(crate) fn as_byte_array_like(value: &Value) -> Option<Result<Vec<u8>, String>> {
    match value {
        Value::Bytes(bytes) => Some(Ok(bytes.clone())),
        Value::Sequence(elements) => {
            let mut out = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                let byte = match element {
                    Value::Int(i) => {
                        if (0..=255).contains(i) {
                            Ok(*i as u8)
                        } else {
                            Err(format!("element {} ({}) is not in the byte range", index, i))
                        }
                    }
                    Value::Float(x) => {
                        if x.fract() == 0.0 && (0.0..=255.0).contains(x) {
                            Ok(*x as u8)
                        } else {
                            Err(format!("element {} ({}) is not a byte", index, x))
                        }
                    }
                    Value::BigInt(b) => match b.to_u8() {
                        Some(byte) => Ok(byte),
                        None => {
                            Err(format!("element {} ({}) is not in the byte range", index, b))
                        }
                    },
                    _ => return None,
                };
                match byte {
                    Ok(b) => out.push(b),
                    Err(reason) => return Some(Err(reason)),
                }
            }
            Some(Ok(out))
        }
        _ => None,
    }
}

/// Convert an integral decimal to a big integer
pub(crate) fn decimal_to_bigint(decimal: &BigDecimal) -> Option<BigInt> {
    use num_bigint::ToBigInt;
    if !decimal.is_integer() {
        return None;
    }
    decimal.to_bigint()
}

/// Big-endian magnitude bytes of a non-negative integer, with zero
/// rendered as a single `0x00` byte (the numeric-origin zero rule)
pub(crate) fn magnitude_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        vec![0u8]
    } else {
        value.magnitude().to_bytes_be()
    }
}
