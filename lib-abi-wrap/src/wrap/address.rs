//! Address and contract coercion cases
//!
//! Address and contract types are mutually substitutable even outside
//! loose mode; the payload class follows the target. The canonical output
//! is always the checksummed form. Mixed-case input must match its own
//! checksum (at a specificity that outranks ordinary validation);
//! uniform-case input bypasses the check.

use lib_abi_types::{DataType, Value, ValuePayload, WrappedResult, WrappedValue};

use crate::checksum::{is_uniform_case, passes_checksum, to_checksum, ADDRESS_DIGITS};
use crate::dispatch::WrapCase;
use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::{consult_address, Resolver};

use super::shape_mismatch;

/// Case order for `address` / contract targets
pub const CASES: &[WrapCase] = &[
    address_from_hex_string,
    address_from_unprefixed_hex,
    address_from_string_name,
    address_from_contract_like,
    address_from_wrapped_value,
    address_from_wrapped_value_type,
    address_from_type_value,
    address_failure,
];

/// Build the payload matching the target class
fn finish(ty: &DataType, canonical: String) -> WrappedValue {
    let payload = match ty {
        DataType::Contract { .. } => ValuePayload::Contract { address: canonical },
        _ => ValuePayload::Address(canonical),
    };
    WrappedValue::new(ty.clone(), payload)
}

/// Validate bare hex digits as an address and return the canonical form
fn validate_digits(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    digits: &str,
) -> WrapResult<String> {
    if digits.len() != ADDRESS_DIGITS {
        return Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::VALIDATION,
            format!(
                "address must be {} hex digits, got {}",
                ADDRESS_DIGITS,
                digits.len()
            ),
        ));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::VALIDATION,
            "address contains non-hexadecimal digits",
        ));
    }
    if !is_uniform_case(digits) && !passes_checksum(digits) {
        return Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::CHECKSUM,
            "address has mixed case but does not match its checksum",
        ));
    }
    Ok(to_checksum(digits))
}

fn address_from_hex_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let canonical = validate_digits(ty, value, opts, digits)?;
    Ok(finish(ty, canonical))
}

/// Unprefixed hex digits, zero-padded on the left to address width
fn address_from_unprefixed_hex(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if text.is_empty()
        || text.len() > ADDRESS_DIGITS
        || !text.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(shape_mismatch(ty, value, opts));
    }
    let padded = format!("{:0>width$}", text, width = ADDRESS_DIGITS);
    let canonical = validate_digits(ty, value, opts, &padded)?;
    Ok(finish(ty, canonical))
}

/// Any other string is handed to the resolver as an address name
fn address_from_string_name(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let resolved = consult_address(resolver, ty, value, text, opts)?;
    let digits = resolved
        .strip_prefix("0x")
        .or_else(|| resolved.strip_prefix("0X"))
        .unwrap_or(&resolved);
    let canonical = validate_digits(ty, value, opts, digits)?;
    Ok(finish(ty, canonical))
}

/// A contract-like record: has an `address` field and no `selector`
fn address_from_contract_like(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Record(entries) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if entries.iter().any(|(key, _)| key == "selector") {
        return Err(shape_mismatch(ty, value, opts));
    }
    let Some((_, address_value)) = entries.iter().find(|(key, _)| key == "address") else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Value::String(text) = address_value else {
        return Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::VALIDATION,
            "the address field of a contract-like value must be a string",
        ));
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let canonical = validate_digits(ty, value, opts, digits)?;
    Ok(finish(ty, canonical))
}

fn address_from_wrapped_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let WrappedResult::Value(wrapped) = result.as_ref() else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match &wrapped.value {
        ValuePayload::Address(address) | ValuePayload::Contract { address }
            if matches!(
                wrapped.ty,
                DataType::Address { .. } | DataType::Contract { .. }
            ) =>
        {
            Ok(finish(ty, address.clone()))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// A wrapped user-defined value type whose underlying type is an address
fn address_from_wrapped_value_type(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let WrappedResult::Value(wrapped) = result.as_ref() else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let DataType::UserDefinedValueType { .. } = &wrapped.ty else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match &wrapped.value {
        ValuePayload::Address(address) | ValuePayload::Contract { address } => {
            Ok(finish(ty, address.clone()))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

fn address_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if type_name != "address" && type_name != "contract" {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Terminal case: a clear message for shapes no case can ever accept
fn address_failure(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    Err(WrapError::mismatch(
        ty,
        value,
        &opts.name,
        specificity::PERMANENT,
        format!(
            "{} cannot be interpreted as an address; expected a hex string, a name, a contract-like record, or a wrapped address",
            value.shape_name()
        ),
    ))
}
