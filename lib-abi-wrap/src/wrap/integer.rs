//! Integer and enum coercion cases
//!
//! Unsigned integers, signed integers, and enums share one case family:
//! any input acceptable for an integer is also acceptable, numerically,
//! for an enum. Validation happens once at the end of each case, against
//! the bit width (or option count) of the concrete target.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed};
use std::str::FromStr;

use lib_abi_types::{
    DataType, DecodeErrorKind, Value, ValuePayload, WrappedResult, WrappedValue,
};

use crate::dispatch::WrapCase;
use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::{consult_integer, Resolver};
use crate::units;

use super::{as_byte_array_like, decimal_to_bigint, shape_mismatch, validation_failure};

/// Largest integer exactly representable in an `f64`
pub(crate) const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_991.0;

/// Case order for `uint` / `int` / enum targets
pub const CASES: &[WrapCase] = &[
    integer_from_string,
    integer_from_string_with_units,
    integer_from_negated_string,
    integer_from_enum_name,
    integer_from_number,
    integer_from_bignum,
    integer_from_byte_array_like,
    integer_from_wrapped,
    integer_from_type_value,
    integer_from_other,
];

/// Exact integer parse: decimal with optional sign, or unsigned
/// `0x` / `0o` / `0b` radix forms.
pub(crate) fn parse_big_int_exact(text: &str) -> Option<BigInt> {
    // Radix-prefixed forms take no sign; negation is a separate case
    let radix_digits = |digits: &str| digits.bytes().all(|b| b.is_ascii_alphanumeric());
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() || !radix_digits(hex) {
            return None;
        }
        return BigInt::parse_bytes(hex.as_bytes(), 16);
    }
    if let Some(octal) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        if octal.is_empty() || !radix_digits(octal) {
            return None;
        }
        return BigInt::parse_bytes(octal.as_bytes(), 8);
    }
    if let Some(binary) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        if binary.is_empty() || !radix_digits(binary) {
            return None;
        }
        return BigInt::parse_bytes(binary.as_bytes(), 2);
    }
    BigInt::from_str(text).ok()
}

/// Validate a candidate against the concrete target and build the payload
fn validate(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    candidate: BigInt,
) -> WrapResult<WrappedValue> {
    match ty {
        DataType::Uint { bits } => {
            if candidate.sign() == Sign::Minus || candidate.bits() > u64::from(*bits) {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    format!("{} is out of range for {}", candidate, ty),
                ));
            }
            Ok(WrappedValue::new(ty.clone(), ValuePayload::Int(candidate)))
        }
        DataType::Int { bits } => {
            let fits = if candidate.sign() == Sign::Minus {
                let magnitude = candidate.abs();
                // -2^(bits-1) is representable although its magnitude is not
                magnitude.bits() < u64::from(*bits)
                    || magnitude == BigInt::one() << u32::from(*bits - 1)
            } else {
                candidate.bits() < u64::from(*bits)
            };
            if !fits {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    format!("{} is out of range for {}", candidate, ty),
                ));
            }
            Ok(WrappedValue::new(ty.clone(), ValuePayload::Int(candidate)))
        }
        DataType::Enum { id } => {
            let Some(options) = opts.user_types.enum_options(id) else {
                return Err(WrapError::mismatch(
                    ty,
                    value,
                    &opts.name,
                    specificity::PERMANENT,
                    format!("enum type {} is not defined in the type table", id),
                ));
            };
            let count = BigInt::from(options.len());
            if candidate.sign() == Sign::Minus || candidate >= count {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    format!(
                        "{} is out of range for enum {} with {} options",
                        candidate,
                        id,
                        options.len()
                    ),
                ));
            }
            let index = usize::try_from(&candidate).unwrap_or(usize::MAX);
            Ok(WrappedValue::new(
                ty.clone(),
                ValuePayload::Enum {
                    numeric: candidate,
                    option: options[index].clone(),
                },
            ))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

fn integer_from_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(candidate) = parse_big_int_exact(text.trim()) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    validate(ty, value, opts, candidate)
}

/// Scientific notation and ether-unit suffixes
fn integer_from_string_with_units(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(scaled) = units::parse_with_unit(text) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(candidate) = decimal_to_bigint(&scaled) else {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "value is not a whole number after unit scaling",
        ));
    };
    validate(ty, value, opts, candidate)
}

/// Manual sign handling for shapes the exact parser rejects with a
/// leading minus (radix-prefixed forms, unit suffixes).
fn integer_from_negated_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(rest) = text.trim().strip_prefix('-') else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let rest = rest.trim_start();
    let candidate = if let Some(parsed) = parse_big_int_exact(rest) {
        -parsed
    } else if let Some(scaled) = units::parse_with_unit(rest) {
        let Some(parsed) = decimal_to_bigint(&scaled) else {
            return Err(validation_failure(
                ty,
                value,
                opts,
                "value is not a whole number after unit scaling",
            ));
        };
        -parsed
    } else {
        return Err(shape_mismatch(ty, value, opts));
    };
    validate(ty, value, opts, candidate)
}

/// Enum option lookup by bare or qualified name
fn integer_from_enum_name(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let DataType::Enum { id } = ty else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some((enum_name, defining_contract)) = opts.user_types.enum_names(id) else {
        return Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::PERMANENT,
            format!("enum type {} is not defined in the type table", id),
        ));
    };
    let option_name = match text.rsplit_once('.') {
        None => text.as_str(),
        Some((qualifier, option_name)) => {
            let qualified = qualifier == enum_name;
            let contract_qualified = defining_contract
                .map(|contract| qualifier == format!("{}.{}", contract, enum_name))
                .unwrap_or(false);
            if !(qualified || contract_qualified) {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    format!("{} does not name enum type {}", text, enum_name),
                ));
            }
            option_name
        }
    };
    let options = opts.user_types.enum_options(id).unwrap_or(&[]);
    match options.iter().position(|option| option == option_name) {
        Some(index) => validate(ty, value, opts, BigInt::from(index)),
        None => Err(validation_failure(
            ty,
            value,
            opts,
            format!("{} is not an option of enum {}", option_name, enum_name),
        )),
    }
}

fn integer_from_number(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match value {
        Value::Int(i) => validate(ty, value, opts, BigInt::from(*i)),
        Value::Float(x) => {
            if !x.is_finite() || x.fract() != 0.0 {
                return Err(validation_failure(ty, value, opts, "value is not an integer"));
            }
            if x.abs() > MAX_SAFE_FLOAT {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    "number is outside the safely representable range",
                ));
            }
            validate(ty, value, opts, BigInt::from(*x as i64))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

fn integer_from_bignum(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match value {
        Value::BigInt(b) => validate(ty, value, opts, b.clone()),
        Value::BigDecimal(d) => match decimal_to_bigint(d) {
            Some(candidate) => validate(ty, value, opts, candidate),
            None => Err(validation_failure(
                ty,
                value,
                opts,
                "decimal value has a fractional part",
            )),
        },
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// Big-endian unsigned interpretation of a byte array
fn integer_from_byte_array_like(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match as_byte_array_like(value) {
        Some(Ok(data)) => validate(ty, value, opts, BigInt::from_bytes_be(Sign::Plus, &data)),
        Some(Err(reason)) => Err(validation_failure(ty, value, opts, reason)),
        None => Err(shape_mismatch(ty, value, opts)),
    }
}

/// Previously wrapped numeric values; decimals cross over only in loose
/// mode. Enum out-of-range errors re-validate their numeric value.
fn integer_from_wrapped(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match result.as_ref() {
        WrappedResult::Value(wrapped) => match (&wrapped.ty, &wrapped.value) {
            (
                DataType::Uint { .. } | DataType::Int { .. },
                ValuePayload::Int(numeric),
            ) => validate(ty, value, opts, numeric.clone()),
            (DataType::Enum { .. }, ValuePayload::Enum { numeric, .. }) => {
                validate(ty, value, opts, numeric.clone())
            }
            (
                DataType::Fixed { .. } | DataType::Ufixed { .. },
                ValuePayload::Decimal(decimal),
            ) => {
                if !opts.loose {
                    return Err(shape_mismatch(ty, value, opts));
                }
                match decimal_to_bigint(decimal) {
                    Some(candidate) => validate(ty, value, opts, candidate),
                    None => Err(validation_failure(
                        ty,
                        value,
                        opts,
                        "decimal value has a fractional part",
                    )),
                }
            }
            _ => Err(shape_mismatch(ty, value, opts)),
        },
        WrappedResult::Error(error) => match &error.kind {
            DecodeErrorKind::EnumOutOfRange { numeric } => {
                validate(ty, value, opts, numeric.clone())
            }
            _ => Err(shape_mismatch(ty, value, opts)),
        },
    }
}

/// Spelled-out type/value pairs for both integer and enum spellings
fn integer_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let matches = match ty {
        DataType::Uint { bits } => {
            *type_name == format!("uint{}", bits) || (type_name == "uint" && *bits == 256)
        }
        DataType::Int { bits } => {
            *type_name == format!("int{}", bits) || (type_name == "int" && *bits == 256)
        }
        DataType::Enum { id } => {
            type_name == "enum"
                || type_name == id
                || opts
                    .user_types
                    .enum_names(id)
                    .map(|(name, contract)| {
                        type_name == name
                            || contract
                                .map(|c| *type_name == format!("{}.{}", c, name))
                                .unwrap_or(false)
                    })
                    .unwrap_or(false)
        }
        _ => false,
    };
    if !matches {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Resolver fallback
fn integer_from_other(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match value {
        Value::String(_) | Value::Wrapped(_) | Value::TypeValue { .. } => {
            return Err(shape_mismatch(ty, value, opts))
        }
        _ => {}
    }
    let candidate = consult_integer(resolver, ty, value, opts)?;
    validate(ty, value, opts, candidate)
}
