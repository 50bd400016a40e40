//! Fixed-point decimal coercion cases
//!
//! Excess decimal places are rounded half-to-even only when the input is
//! binary-origin (a float, whose decimal expansion is an artifact) or
//! loose mode is on; otherwise they are rejected. The final value must
//! lie within the range determined by bit width, signedness, and places.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::One;
use std::str::FromStr;

use lib_abi_types::{
    DataType, DecodeErrorKind, Value, ValuePayload, WrappedResult, WrappedValue,
};

use crate::dispatch::WrapCase;
use crate::error::WrapResult;
use crate::options::WrapOptions;
use crate::resolver::{consult_decimal, Resolver};

use super::integer::MAX_SAFE_FLOAT;
use super::{shape_mismatch, validation_failure};

/// Case order for `fixed` / `ufixed` targets
pub const CASES: &[WrapCase] = &[
    decimal_from_number,
    decimal_from_string,
    decimal_from_bignum,
    decimal_from_wrapped,
    decimal_from_type_value,
    decimal_from_other,
];

fn parameters(ty: &DataType) -> Option<(u16, u32, bool)> {
    match ty {
        DataType::Fixed { bits, places } => Some((*bits, *places, true)),
        DataType::Ufixed { bits, places } => Some((*bits, *places, false)),
        _ => None,
    }
}

/// Validate a candidate decimal and build the payload
fn validate(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    candidate: BigDecimal,
    binary_origin: bool,
) -> WrapResult<WrappedValue> {
    let Some((bits, places, signed)) = parameters(ty) else {
        return Err(shape_mismatch(ty, value, opts));
    };

    let mut decimal = candidate.normalized();
    if decimal.fractional_digit_count() > i64::from(places) {
        if opts.loose || binary_origin {
            decimal = decimal.with_scale_round(i64::from(places), RoundingMode::HalfEven);
        } else {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("value has more than {} decimal places", places),
            ));
        }
    }

    // Range check on the scaled integer
    let scaled = decimal.with_scale(i64::from(places)).as_bigint_and_exponent().0;
    let fits = if signed {
        if scaled.sign() == Sign::Minus {
            let magnitude = -scaled.clone();
            magnitude.bits() < u64::from(bits)
                || magnitude == BigInt::one() << u32::from(bits - 1)
        } else {
            scaled.bits() < u64::from(bits)
        }
    } else {
        scaled.sign() != Sign::Minus && scaled.bits() <= u64::from(bits)
    };
    if !fits {
        return Err(validation_failure(
            ty,
            value,
            opts,
            format!("{} is out of range for {}", decimal, ty),
        ));
    }
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Decimal(decimal)))
}

fn decimal_from_number(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match value {
        Value::Int(i) => validate(ty, value, opts, BigDecimal::from(*i), false),
        Value::Float(x) => {
            if !x.is_finite() {
                return Err(validation_failure(ty, value, opts, "value is not finite"));
            }
            if x.abs() > MAX_SAFE_FLOAT {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    "number is outside the safely representable range",
                ));
            }
            let Ok(decimal) = BigDecimal::try_from(*x) else {
                return Err(validation_failure(ty, value, opts, "value is not finite"));
            };
            validate(ty, value, opts, decimal, true)
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// Direct decimal parse; no unit handling for fixed-point targets
fn decimal_from_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match BigDecimal::from_str(text.trim()) {
        Ok(decimal) => validate(ty, value, opts, decimal, false),
        Err(_) => Err(validation_failure(
            ty,
            value,
            opts,
            "string could not be parsed as a decimal",
        )),
    }
}

fn decimal_from_bignum(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match value {
        Value::BigInt(b) => validate(ty, value, opts, BigDecimal::from(b.clone()), false),
        Value::BigDecimal(d) => validate(ty, value, opts, d.clone(), false),
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// Previously wrapped values; integer and enum sources cross over only
/// in loose mode, as do enum out-of-range errors.
fn decimal_from_wrapped(
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
                DataType::Fixed { .. } | DataType::Ufixed { .. },
                ValuePayload::Decimal(decimal),
            ) => validate(ty, value, opts, decimal.clone(), false),
            (
                DataType::Uint { .. } | DataType::Int { .. },
                ValuePayload::Int(numeric),
            ) => {
                if !opts.loose {
                    return Err(shape_mismatch(ty, value, opts));
                }
                validate(ty, value, opts, BigDecimal::from(numeric.clone()), false)
            }
            (DataType::Enum { .. }, ValuePayload::Enum { numeric, .. }) => {
                if !opts.loose {
                    return Err(shape_mismatch(ty, value, opts));
                }
                validate(ty, value, opts, BigDecimal::from(numeric.clone()), false)
            }
            _ => Err(shape_mismatch(ty, value, opts)),
        },
        WrappedResult::Error(error) => match &error.kind {
            DecodeErrorKind::EnumOutOfRange { numeric } if opts.loose => {
                validate(ty, value, opts, BigDecimal::from(numeric.clone()), false)
            }
            _ => Err(shape_mismatch(ty, value, opts)),
        },
    }
}

fn decimal_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let matches = match ty {
        DataType::Fixed { bits, places } => {
            *type_name == format!("fixed{}x{}", bits, places)
                || (type_name == "fixed" && *bits == 128 && *places == 18)
                || (type_name == "decimal" && *bits == 168 && *places == 10)
        }
        DataType::Ufixed { bits, places } => {
            *type_name == format!("ufixed{}x{}", bits, places)
                || (type_name == "ufixed" && *bits == 128 && *places == 18)
        }
        _ => false,
    };
    if !matches {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Resolver fallback
fn decimal_from_other(
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
    let candidate = consult_decimal(resolver, ty, value, opts)?;
    validate(ty, value, opts, candidate, false)
}
