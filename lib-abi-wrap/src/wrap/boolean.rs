//! Boolean coercion cases

use lib_abi_types::{
    DataType, DecodeErrorKind, Value, ValuePayload, WrappedResult, WrappedValue,
};
use num_traits::Zero;

use crate::dispatch::WrapCase;
use crate::error::WrapResult;
use crate::options::WrapOptions;
use crate::resolver::Resolver;

use super::{shape_mismatch, validation_failure};

/// Case order for `bool` targets
pub const CASES: &[WrapCase] = &[
    bool_from_string,
    bool_from_wrapped_value,
    bool_from_wrapped_error,
    bool_from_type_value,
    bool_from_other,
];

/// The literal `"false"` (any case) and the empty string are false;
/// every other string is true.
fn bool_from_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let flag = !(text.is_empty() || text.eq_ignore_ascii_case("false"));
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Bool(flag)))
}

fn bool_from_wrapped_value(
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
        (DataType::Bool, ValuePayload::Bool(flag)) => {
            Ok(WrappedValue::new(ty.clone(), ValuePayload::Bool(*flag)))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// A previously failed boolean decode still carries a usable truth value:
/// out-of-range and mis-padded words both re-wrap as `true`.
fn bool_from_wrapped_error(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let WrappedResult::Error(error) = result.as_ref() else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match &error.kind {
        DecodeErrorKind::BoolOutOfRange { .. } | DecodeErrorKind::BoolMisPadded { .. } => {
            Ok(WrappedValue::new(ty.clone(), ValuePayload::Bool(true)))
        }
        _ => Err(validation_failure(
            ty,
            value,
            opts,
            "a previously failed decode of this kind cannot be converted to a boolean",
        )),
    }
}

fn bool_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if type_name != "bool" && type_name != "boolean" {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Last resort: raw truthiness. Wrapped results and type/value pairs are
/// explicitly refused here even though truthiness would accept anything.
fn bool_from_other(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let flag = match value {
        Value::Wrapped(_) => {
            return Err(validation_failure(
                ty,
                value,
                opts,
                "a wrapped result of a different type cannot be converted to a boolean",
            ))
        }
        Value::TypeValue { type_name, .. } => {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("a type/value pair for type {} is not a boolean", type_name),
            ))
        }
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(x) => !(*x == 0.0 || x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::BigInt(b) => !b.is_zero(),
        // Objects are truthy regardless of content
        Value::BigDecimal(_) | Value::Bytes(_) | Value::Sequence(_) | Value::Record(_) => true,
    };
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Bool(flag)))
}
