//! Array, tuple, and struct coercion
//!
//! Structural recursion into the scalar case libraries. Children are
//! coerced strictly in declaration order, and member/element names extend
//! the diagnostic name so nested errors point at the exact field.

use lib_abi_types::{
    DataType, Member, Value, ValuePayload, WrappedMember, WrappedResult, WrappedValue,
};

use crate::dispatch::WrapCase;
use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::Resolver;

use super::{shape_mismatch, validation_failure};

/// Case order for array targets
pub const ARRAY_CASES: &[WrapCase] = &[array_from_sequence, array_from_wrapped_value];

/// Case order for tuple and struct targets
pub const TUPLE_CASES: &[WrapCase] = &[
    tuple_from_sequence,
    tuple_from_record,
    tuple_from_wrapped_value,
];

/// Member list of a tuple or struct target
fn members_of(ty: &DataType, value: &Value, opts: &WrapOptions<'_>) -> WrapResult<Vec<Member>> {
    match ty {
        DataType::Tuple { members } => Ok(members.clone()),
        DataType::Struct { id } => match opts.user_types.struct_members(id) {
            Some(members) => Ok(members.to_vec()),
            None => Err(WrapError::mismatch(
                ty,
                value,
                &opts.name,
                specificity::PERMANENT,
                format!("struct type {} is not defined in the type table", id),
            )),
        },
        _ => Err(shape_mismatch(ty, value, opts)),
    }
}

/// Turn a wrapped container payload back into a sequence of inputs
fn unwrap_members(wrapped: &WrappedValue) -> Option<Vec<Value>> {
    match &wrapped.value {
        ValuePayload::Array(elements) => Some(
            elements
                .iter()
                .map(|element| Value::Wrapped(Box::new(WrappedResult::Value(element.clone()))))
                .collect(),
        ),
        ValuePayload::Tuple(members) => Some(
            members
                .iter()
                .map(|member| Value::Wrapped(Box::new(WrappedResult::Value(member.value.clone()))))
                .collect(),
        ),
        _ => None,
    }
}

fn array_from_sequence(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let DataType::Array { element, length } = ty else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Value::Sequence(items) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    if let Some(length) = length {
        if items.len() as u64 != *length {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("expected {} elements, got {}", length, items.len()),
            ));
        }
    }
    let mut wrapped = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let child_opts = opts.indexed_child(index);
        wrapped.push(super::wrap(element, item, &child_opts, resolver)?);
    }
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Array(wrapped)))
}

/// A wrapped array or tuple unwraps its members and retries positionally
fn array_from_wrapped_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let WrappedResult::Value(inner) = result.as_ref() else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(items) = unwrap_members(inner) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    super::wrap(ty, &Value::Sequence(items), opts, resolver)
}

fn tuple_from_sequence(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Sequence(items) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let members = members_of(ty, value, opts)?;
    if items.len() != members.len() {
        return Err(validation_failure(
            ty,
            value,
            opts,
            format!("expected {} members, got {}", members.len(), items.len()),
        ));
    }
    let mut wrapped = Vec::with_capacity(members.len());
    for (index, (member, item)) in members.iter().zip(items).enumerate() {
        let child_opts = match &member.name {
            Some(name) => opts.named_child(name),
            None => opts.indexed_child(index),
        };
        wrapped.push(WrappedMember {
            name: member.name.clone(),
            value: super::wrap(&member.ty, item, &child_opts, resolver)?,
        });
    }
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Tuple(wrapped)))
}

/// Named coercion from a record; available only when every member has a
/// name. Unknown and missing keys are both rejected.
fn tuple_from_record(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Record(entries) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let members = members_of(ty, value, opts)?;
    if !members.iter().all(|member| member.name.is_some()) {
        return Err(shape_mismatch(ty, value, opts));
    }

    for (key, _) in entries {
        if !members
            .iter()
            .any(|member| member.name.as_deref() == Some(key.as_str()))
        {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("unknown member {}", key),
            ));
        }
    }

    let mut wrapped = Vec::with_capacity(members.len());
    for member in &members {
        let name = member.name.as_deref().unwrap_or_default();
        let mut matches = entries.iter().filter(|(key, _)| key == name);
        let Some((_, item)) = matches.next() else {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("missing member {}", name),
            ));
        };
        if matches.next().is_some() {
            return Err(validation_failure(
                ty,
                value,
                opts,
                format!("member {} given more than once", name),
            ));
        }
        let child_opts = opts.named_child(name);
        wrapped.push(WrappedMember {
            name: member.name.clone(),
            value: super::wrap(&member.ty, item, &child_opts, resolver)?,
        });
    }
    Ok(WrappedValue::new(ty.clone(), ValuePayload::Tuple(wrapped)))
}

fn tuple_from_wrapped_value(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
) -> WrapResult<WrappedValue> {
    let Value::Wrapped(result) = value else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let WrappedResult::Value(inner) = result.as_ref() else {
        return Err(shape_mismatch(ty, value, opts));
    };
    let Some(items) = unwrap_members(inner) else {
        return Err(shape_mismatch(ty, value, opts));
    };
    super::wrap(ty, &Value::Sequence(items), opts, resolver)
}
