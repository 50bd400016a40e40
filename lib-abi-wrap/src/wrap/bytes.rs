//! Byte-string coercion cases
//!
//! Static targets are zero-padded on the right up to the declared length
//! and reject longer content. The numeric-origin cases render the value
//! zero as a single `0x00` byte; plain hex-string input is exempt from
//! that rewrite (the empty hex string stays empty).

use num_bigint::{BigInt, Sign};

use lib_abi_types::{DataType, Value, ValuePayload, WrappedResult, WrappedValue};

use crate::dispatch::WrapCase;
use crate::error::WrapResult;
use crate::options::WrapOptions;
use crate::resolver::{consult_integer, Resolver};

use super::{
    as_byte_array_like, decimal_to_bigint, magnitude_bytes, shape_mismatch, validation_failure,
};

/// Case order for `bytes` / `bytesN` targets
pub const CASES: &[WrapCase] = &[
    bytes_from_hex_string,
    bytes_from_numeric_string,
    bytes_from_byte_array_like,
    bytes_from_encoding_pair,
    bytes_from_wrapped_value,
    bytes_from_numeric,
    bytes_from_type_value,
    bytes_from_other,
];

fn declared_length(ty: &DataType) -> Option<Option<usize>> {
    match ty {
        DataType::Bytes { length } => Some(*length),
        _ => None,
    }
}

/// Pad or reject against the declared static length
fn finish(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    mut data: Vec<u8>,
) -> WrapResult<WrappedValue> {
    if let Some(Some(length)) = declared_length(ty) {
        if data.len() > length {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!(
                    "content is {} bytes but the type holds only {}",
                    data.len(),
                    length
                ),
            ));
        }
        data.resize(length, 0);
    }
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Bytes(data)))
}

fn is_dynamic(ty: &DataType) -> bool {
    matches!(ty, DataType::Bytes { length: None })
}

/// `0x`-prefixed hex, case-insensitive, with underscores permitted
/// between byte pairs only.
fn bytes_from_hex_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "byte strings must be given in hex form, starting with 0x",
        ));
    };
    let mut stripped = String::with_capacity(digits.len());
    for segment in digits.split('_') {
        if digits.contains('_') && (segment.is_empty() || segment.len() % 2 != 0) {
            return Err(validation_failure(
                ty,
                value,
                opts,
                "underscores in a hex string may only separate whole byte pairs",
            ));
        }
        stripped.push_str(segment);
    }
    if stripped.len() % 2 != 0 {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "hex strings must contain an even number of digits",
        ));
    }
    let data = hex::decode(&stripped).map_err(|_| {
        validation_failure(ty, value, opts, "string contains non-hexadecimal digits")
    })?;
    finish(ty, value, opts, data)
}

/// Loose + dynamic only: an unprefixed numeric string is taken as an
/// integer magnitude.
fn bytes_from_numeric_string(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    if !(opts.loose && is_dynamic(ty)) {
        return Err(shape_mismatch(ty, value, opts));
    }
    let Value::String(text) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let trimmed = text.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        return Err(shape_mismatch(ty, value, opts));
    }
    let Some(number) = super::integer::parse_big_int_exact(trimmed) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if number.sign() == Sign::Minus {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "a negative number cannot be used as a byte string",
        ));
    }
    finish(ty, value, opts, magnitude_bytes(&number))
}

fn bytes_from_byte_array_like(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    match as_byte_array_like(value) {
        Some(Ok(data)) => finish(ty, value, opts, data),
        Some(Err(reason)) => Err(validation_failure(ty, value, opts, reason)),
        None => Err(shape_mismatch(ty, value, opts)),
    }
}

/// `{encoding: "utf8", text: …}` record
fn bytes_from_encoding_pair(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Record(entries) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if entries.len() != 2 {
        return Err(shape_mismatch(ty, value, opts));
    }
    let mut encoding = None;
    let mut text = None;
    for (key, entry) in entries {
        match key.as_str() {
            "encoding" => encoding = Some(entry),
            "text" => text = Some(entry),
            _ => return Err(shape_mismatch(ty, value, opts)),
        }
    }
    let (Some(encoding), Some(text)) = (encoding, text) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    match encoding {
        Value::String(name) if name == "utf8" => {}
        Value::String(name) => {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("unknown encoding {}", name),
            ))
        }
        _ => return Err(validation_failure(ty, value, opts, "encoding must be a string")),
    }
    let Value::String(text) = text else {
        return Err(validation_failure(ty, value, opts, "text must be a string"));
    };
    finish(ty, value, opts, text.as_bytes().to_vec())
}

/// A previously wrapped byte string; length and kind must match unless
/// loose mode is on.
fn bytes_from_wrapped_value(
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
    let (DataType::Bytes { length: source_length }, ValuePayload::Bytes(data)) =
        (&wrapped.ty, &wrapped.value)
    else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if !opts.loose {
        let Some(target_length) = declared_length(ty) else {
            return Err(shape_mismatch(ty, value, opts));
        };
        if *source_length != target_length {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!(
                    "a wrapped {} value cannot be used as {} without loose mode",
                    wrapped.ty, ty
                ),
            ));
        }
    }
    finish(ty, value, opts, data.clone())
}

/// Loose + dynamic only: numeric primitives and bignum objects become
/// their magnitude bytes.
fn bytes_from_numeric(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    _resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    if !(opts.loose && is_dynamic(ty)) {
        return Err(shape_mismatch(ty, value, opts));
    }
    let number: BigInt = match value {
        Value::Int(i) => BigInt::from(*i),
        Value::Float(x) => {
            if !x.is_finite() || x.fract() != 0.0 {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    "only whole numbers can be used as byte strings",
                ));
            }
            if x.abs() > super::integer::MAX_SAFE_FLOAT {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    "number is outside the safely representable range",
                ));
            }
            BigInt::from(*x as i64)
        }
        Value::BigInt(b) => b.clone(),
        Value::BigDecimal(d) => decimal_to_bigint(d).ok_or_else(|| {
            validation_failure(
                ty,
                value,
                opts,
                "only whole numbers can be used as byte strings",
            )
        })?,
        _ => return Err(shape_mismatch(ty, value, opts)),
    };
    if number.sign() == Sign::Minus {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "a negative number cannot be used as a byte string",
        ));
    }
    finish(ty, value, opts, magnitude_bytes(&number))
}

fn bytes_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if *type_name != ty.to_string() && type_name != "bytes" {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Resolver fallback, numeric interpretation; loose + dynamic only.
fn bytes_from_other(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    if !(opts.loose && is_dynamic(ty)) {
        return Err(shape_mismatch(ty, value, opts));
    }
    match value {
        Value::String(_) | Value::Wrapped(_) | Value::TypeValue { .. } => {
            return Err(shape_mismatch(ty, value, opts))
        }
        _ => {}
    }
    let number = consult_integer(resolver, ty, value, opts)?;
    if number.sign() == Sign::Minus {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "a negative number cannot be used as a byte string",
        ));
    }
    finish(ty, value, opts, magnitude_bytes(&number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::specificity;
    use crate::resolver::NullResolver;
    use lib_abi_types::UserDefinedTypes;

    fn run(ty: DataType, value: Value, loose: bool) -> WrapResult<WrappedValue> {
        let types = UserDefinedTypes::new();
        let opts = if loose {
            WrapOptions::new(&types).loose()
        } else {
            WrapOptions::new(&types)
        };
        super::super::wrap(&ty, &value, &opts, &mut NullResolver)
    }

    fn data(result: WrapResult<WrappedValue>) -> Vec<u8> {
        match result.expect("should wrap").value {
            ValuePayload::Bytes(data) => data,
            other => panic!("expected bytes payload, got {:?}", other),
        }
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(
            data(run(DataType::bytes_dynamic(), Value::from("0xDeadBeef"), false)),
            vec![0xde, 0xad, 0xbe, 0xef]
        );
        assert_eq!(
            data(run(DataType::bytes_dynamic(), Value::from("0xde_ad"), false)),
            vec![0xde, 0xad]
        );
    }

    #[test]
    fn test_hex_string_underscore_must_split_pairs() {
        let err = run(DataType::bytes_dynamic(), Value::from("0xd_e"), false)
            .expect_err("mid-byte underscore");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    }

    #[test]
    fn test_odd_length_hex_rejected() {
        assert!(run(DataType::bytes_dynamic(), Value::from("0xabc"), false).is_err());
    }

    #[test]
    fn test_empty_hex_is_not_rewritten() {
        // Direct hex input keeps its length; no zero-as-0x00 rule here
        assert_eq!(data(run(DataType::bytes_dynamic(), Value::from("0x"), true)), vec![]);
    }

    #[test]
    fn test_numeric_string_zero_becomes_one_zero_byte() {
        assert_eq!(
            data(run(DataType::bytes_dynamic(), Value::from("0"), true)),
            vec![0u8]
        );
        assert_eq!(
            data(run(DataType::bytes_dynamic(), Value::from("256"), true)),
            vec![1, 0]
        );
    }

    #[test]
    fn test_numeric_string_requires_loose_and_dynamic() {
        assert!(run(DataType::bytes_dynamic(), Value::from("256"), false).is_err());
        assert!(run(DataType::bytes_static(2), Value::from("256"), true).is_err());
    }

    #[test]
    fn test_static_padding_and_overflow() {
        assert_eq!(
            data(run(DataType::bytes_static(4), Value::from("0xff"), false)),
            vec![0xff, 0, 0, 0]
        );
        let err = run(DataType::bytes_static(1), Value::from("0xffff"), false)
            .expect_err("too long for bytes1");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    }

    #[test]
    fn test_byte_array_like() {
        assert_eq!(
            data(run(
                DataType::bytes_dynamic(),
                Value::Bytes(vec![1, 2, 3]),
                false
            )),
            vec![1, 2, 3]
        );
        assert_eq!(
            data(run(
                DataType::bytes_dynamic(),
                Value::Sequence(vec![Value::from(1), Value::from(255)]),
                false
            )),
            vec![1, 255]
        );
        let err = run(
            DataType::bytes_dynamic(),
            Value::Sequence(vec![Value::from(256)]),
            false,
        )
        .expect_err("element out of range");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    }

    #[test]
    fn test_encoding_pair() {
        let pair = Value::record([
            ("encoding", Value::from("utf8")),
            ("text", Value::from("hi")),
        ]);
        assert_eq!(data(run(DataType::bytes_dynamic(), pair, false)), b"hi".to_vec());

        let bad = Value::record([
            ("encoding", Value::from("utf16")),
            ("text", Value::from("hi")),
        ]);
        let err = run(DataType::bytes_dynamic(), bad, false).expect_err("unknown encoding");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    }

    #[test]
    fn test_wrapped_value_requires_matching_type_unless_loose() {
        let wrapped = Value::Wrapped(Box::new(WrappedResult::Value(WrappedValue::new(
            DataType::bytes_static(2),
            ValuePayload::Bytes(vec![0xab, 0xcd]),
        ))));
        assert!(run(DataType::bytes_dynamic(), wrapped.clone(), false).is_err());
        assert_eq!(
            data(run(DataType::bytes_dynamic(), wrapped.clone(), true)),
            vec![0xab, 0xcd]
        );
        assert_eq!(
            data(run(DataType::bytes_static(2), wrapped, false)),
            vec![0xab, 0xcd]
        );
    }

    #[test]
    fn test_numeric_input_loose_dynamic() {
        assert_eq!(data(run(DataType::bytes_dynamic(), Value::from(0), true)), vec![0]);
        assert_eq!(
            data(run(DataType::bytes_dynamic(), Value::from(0x1234), true)),
            vec![0x12, 0x34]
        );
        assert!(run(DataType::bytes_dynamic(), Value::from(5), false).is_err());
        assert!(run(DataType::bytes_dynamic(), Value::from(-5), true).is_err());
    }
}
