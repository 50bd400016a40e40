//! External function reference coercion cases
//!
//! An external function is an address plus a 4-byte selector. The record
//! form runs each sub-field back through the address and bytes4 case
//! libraries with an elevated specificity floor, so a malformed sub-field
//! surfaces its own precise error. The single-hex-string form normalizes
//! the address portion without checksum validation.

use lib_abi_types::{
    DataType, Value, ValuePayload, WrappedResult, WrappedValue, ADDRESS_SIZE, SELECTOR_SIZE,
};

use crate::checksum::to_checksum;
use crate::dispatch::WrapCase;
use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::Resolver;

use super::{shape_mismatch, validation_failure};

/// Case order for external function targets
pub const CASES: &[WrapCase] = &[
    function_from_record,
    function_from_hex_string,
    function_from_wrapped_value,
    function_from_type_value,
    function_failure,
];

/// `{address, selector}`-shaped record
fn function_from_record(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Record(entries) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let address_value = entries.iter().find(|(key, _)| key == "address");
    let selector_value = entries.iter().find(|(key, _)| key == "selector");
    let (Some((_, address_value)), Some((_, selector_value))) = (address_value, selector_value)
    else {
        return Err(shape_mismatch(ty, value, opts));
    };

    // Sub-fields go back through their own case libraries; the raised
    // floor makes their failures outrank sibling cases here.
    let address_opts = opts.named_child("address").with_floor(specificity::VALIDATION);
    let wrapped_address = super::wrap(
        &DataType::address(),
        address_value,
        &address_opts,
        resolver,
    )?;
    let selector_opts = opts.named_child("selector").with_floor(specificity::VALIDATION);
    let wrapped_selector = super::wrap(
        &DataType::bytes_static(SELECTOR_SIZE),
        selector_value,
        &selector_opts,
        resolver,
    )?;

    let address = match wrapped_address.value {
        ValuePayload::Address(a) => a,
        _ => return Err(shape_mismatch(ty, value, opts)),
    };
    let selector = match wrapped_selector.value {
        ValuePayload::Bytes(data) if data.len() == SELECTOR_SIZE => {
            let mut selector = [0u8; SELECTOR_SIZE];
            selector.copy_from_slice(&data);
            selector
        }
        _ => return Err(shape_mismatch(ty, value, opts)),
    };
    Ok(WrappedValue::new(
        ty.clone(),
        ValuePayload::Function { address, selector },
    ))
}

/// A single hex string holding address then selector. The address portion
/// is normalized to checksum form but not validated against it.
fn function_from_hex_string(
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
            "an external function must be given as a hex string, starting with 0x",
        ));
    };
    let data = hex::decode(digits).map_err(|_| {
        validation_failure(ty, value, opts, "string contains non-hexadecimal digits")
    })?;
    if data.len() != ADDRESS_SIZE + SELECTOR_SIZE {
        return Err(validation_failure(
            ty,
            value,
            opts,
            format!(
                "an external function reference is {} bytes, got {}",
                ADDRESS_SIZE + SELECTOR_SIZE,
                data.len()
            ),
        ));
    }
    let address = to_checksum(&hex::encode(&data[..ADDRESS_SIZE]));
    let mut selector = [0u8; SELECTOR_SIZE];
    selector.copy_from_slice(&data[ADDRESS_SIZE..]);
    Ok(WrappedValue::new(
        ty.clone(),
        ValuePayload::Function { address, selector },
    ))
}

fn function_from_wrapped_value(
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
        (DataType::FunctionExternal { .. }, ValuePayload::Function { address, selector }) => {
            Ok(WrappedValue::new(
                ty.clone(),
                ValuePayload::Function {
                    address: address.clone(),
                    selector: *selector,
                },
            ))
        }
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

fn function_from_type_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::TypeValue { type_name, value: inner } = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if type_name != "function" {
        return Err(shape_mismatch(ty, value, opts));
    }
    super::wrap(ty, inner, opts, resolver)
}

/// Terminal case with a clear message
fn function_failure(
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
            "{} cannot be interpreted as an external function; expected an address/selector record or a {}-byte hex string",
            value.shape_name(),
            ADDRESS_SIZE + SELECTOR_SIZE
        ),
    ))
}
