//! Transaction-options coercion
//!
//! Recognized keys partition into big-integer-valued, address-valued,
//! byte-valued, boolean-valued, and the structurally special
//! `privateFor`. Unknown keys are rejected unless the legacy junk flag
//! is set, which still requires at least one recognized key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use lib_abi_types::{DataType, TxOptions, Value, ValuePayload, WrappedValue};

use crate::dispatch::WrapCase;
use crate::error::WrapResult;
use crate::options::WrapOptions;
use crate::resolver::Resolver;

use super::{shape_mismatch, validation_failure};

/// Case order for the options target (a single structural case)
pub const CASES: &[WrapCase] = &[options_from_record];

/// Keys this record type recognizes
pub(crate) const RECOGNIZED_KEYS: &[&str] = &[
    "gas",
    "gasPrice",
    "value",
    "nonce",
    "from",
    "to",
    "data",
    "overwrite",
    "privateFor",
];

/// Whether `value` is shaped like a transaction-options record, for
/// trailing-argument detection during overload resolution.
pub(crate) fn is_options_shaped(value: &Value, allow_junk: bool) -> bool {
    let Value::Record(entries) = value else {
        return false;
    };
    let recognized = entries
        .iter()
        .filter(|(key, _)| RECOGNIZED_KEYS.contains(&key.as_str()))
        .count();
    recognized > 0 && (allow_junk || recognized == entries.len())
}

fn options_from_record(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Record(entries) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };

    let mut seen: Vec<&str> = Vec::new();
    let mut out = TxOptions::default();
    let mut recognized = 0usize;

    for (key, entry) in entries {
        if RECOGNIZED_KEYS.contains(&key.as_str()) {
            if seen.contains(&key.as_str()) {
                return Err(validation_failure(
                    ty,
                    value,
                    opts,
                    format!("option {} given more than once", key),
                ));
            }
            seen.push(key.as_str());
            recognized += 1;
        }
        let child_opts = opts.named_child(key);
        match key.as_str() {
            "gas" => out.gas = Some(wrap_integer_option(entry, &child_opts, resolver)?),
            "gasPrice" => out.gas_price = Some(wrap_integer_option(entry, &child_opts, resolver)?),
            "value" => out.value = Some(wrap_integer_option(entry, &child_opts, resolver)?),
            "nonce" => out.nonce = Some(wrap_integer_option(entry, &child_opts, resolver)?),
            "from" => out.from = Some(wrap_address_option(entry, &child_opts, resolver)?),
            "to" => out.to = Some(wrap_address_option(entry, &child_opts, resolver)?),
            "data" => out.data = Some(wrap_data_option(entry, &child_opts, resolver)?),
            "overwrite" => out.overwrite = Some(wrap_bool_option(entry, &child_opts, resolver)?),
            "privateFor" => {
                out.private_for = Some(wrap_private_for(ty, value, entry, &child_opts)?)
            }
            unknown => {
                if !opts.allow_options_junk {
                    return Err(validation_failure(
                        ty,
                        value,
                        opts,
                        format!("transaction options contain unknown key {}", unknown),
                    ));
                }
            }
        }
    }

    if opts.allow_options_junk && recognized == 0 {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "transaction options contain no recognized keys",
        ));
    }

    Ok(WrappedValue::new(ty.clone(), ValuePayload::Options(out)))
}

fn wrap_integer_option(
    entry: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<num_bigint::BigInt> {
    let wrapped = super::wrap(&DataType::uint(256), entry, opts, resolver)?;
    match wrapped.value {
        ValuePayload::Int(n) => Ok(n),
        _ => Err(shape_mismatch(&DataType::uint(256), entry, opts)),
    }
}

fn wrap_address_option(
    entry: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<String> {
    let wrapped = super::wrap(&DataType::address(), entry, opts, resolver)?;
    match wrapped.value {
        ValuePayload::Address(a) => Ok(a),
        _ => Err(shape_mismatch(&DataType::address(), entry, opts)),
    }
}

fn wrap_data_option(
    entry: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<Vec<u8>> {
    let wrapped = super::wrap(&DataType::bytes_dynamic(), entry, opts, resolver)?;
    match wrapped.value {
        ValuePayload::Bytes(data) => Ok(data),
        _ => Err(shape_mismatch(&DataType::bytes_dynamic(), entry, opts)),
    }
}

fn wrap_bool_option(
    entry: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<bool> {
    let wrapped = super::wrap(&DataType::Bool, entry, opts, resolver)?;
    match wrapped.value {
        ValuePayload::Bool(b) => Ok(b),
        _ => Err(shape_mismatch(&DataType::Bool, entry, opts)),
    }
}

/// `privateFor`: an array of base64-encoded 32-byte public keys, each
/// independently alphabet- and length-validated
fn wrap_private_for(
    ty: &DataType,
    value: &Value,
    entry: &Value,
    opts: &WrapOptions<'_>,
) -> WrapResult<Vec<[u8; 32]>> {
    let Value::Sequence(items) = entry else {
        return Err(validation_failure(
            ty,
            value,
            opts,
            "privateFor must be an array of base64-encoded public keys",
        ));
    };
    let mut keys = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::String(text) = item else {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("privateFor key {} is not a string", index),
            ));
        };
        let decoded = STANDARD.decode(text).map_err(|_| {
            validation_failure(
                ty,
                value,
                opts,
                format!("privateFor key {} is not valid base64", index),
            )
        })?;
        if decoded.len() != 32 {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!(
                    "privateFor key {} decodes to {} bytes, expected 32",
                    index,
                    decoded.len()
                ),
            ));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        keys.push(key);
    }
    Ok(keys)
}
