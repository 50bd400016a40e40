//! String coercion cases
//!
//! Only genuinely textual inputs are accepted; numbers and wrapped
//! results of other types are rejected. Byte arrays decode as UTF-8,
//! with undecodable content reported as a malformed payload rather than
//! silently replaced.

use lib_abi_types::{DataType, StringPayload, Value, ValuePayload, WrappedResult, WrappedValue};

use crate::dispatch::WrapCase;
use crate::error::WrapResult;
use crate::options::WrapOptions;
use crate::resolver::Resolver;

use super::{as_byte_array_like, shape_mismatch, validation_failure};

/// Case order for `string` targets
pub const CASES: &[WrapCase] = &[
    string_from_string,
    string_from_wrapped_value,
    string_from_byte_array_like,
    string_from_type_value,
];

fn string_from_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    Ok(WrappedValue::new(
        ty.clone(),
        ValuePayload::String(StringPayload::Valid(text.clone())),
    ))
}

fn string_from_wrapped_value(
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
    match (&wrapped.ty, &wrapped.value) {
        (DataType::String, ValuePayload::String(payload)) => Ok(WrappedValue::new(
            ty.clone(),
            ValuePayload::String(payload.clone()),
        )),
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// UTF-8 decode with partial-decode reporting
fn string_from_byte_array_like(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match as_byte_array_like(value) {
        Some(Ok(data)) => {
            let payload = match String::from_utf8(data) {
                Ok(text) => StringPayload::Valid(text),
                Err(error) => StringPayload::Malformed(error.into_bytes()),
            };
            Ok(WrappedValue::new(ty.clone(), ValuePayload::String(payload)))
        }
        Some(Err(reason)) => Err(validation_failure(ty, value, opts, reason)),
        None => Err(shape_mismatch(ty, value, opts)),
    }
}

fn string_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if type_name != "string" {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}
