//! The specificity partial order
//!
//! Non-strict: every type is at least as specific as itself. Types are
//! first classified into priority bands, most specific first; a strictly
//! lower band always wins, and equal bands defer to a type-specific
//! tiebreaker. User-defined value types resolve to their underlying
//! built-in type before any comparison.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::One;

use lib_abi_types::{DataType, FunctionKind, Member, Mutability, UserDefinedTypes};

/// Priority band of a type; lower is more specific
fn band(ty: &DataType) -> u8 {
    match ty {
        DataType::Options => 0,
        DataType::Array { .. } => 1,
        DataType::Tuple { .. } | DataType::Struct { .. } => 2,
        DataType::FunctionExternal { .. } => 3,
        DataType::Address { .. } | DataType::Contract { .. } => 4,
        DataType::Bytes { .. } => 5,
        DataType::Uint { .. }
        | DataType::Int { .. }
        | DataType::Fixed { .. }
        | DataType::Ufixed { .. } => 6,
        DataType::Enum { .. } => 7,
        DataType::String => 8,
        DataType::Bool => 9,
        // Resolved before banding; treated as its own band if unresolvable
        DataType::UserDefinedValueType { .. } => u8::MAX,
    }
}

/// Whether `a` is at least as specific as `b`
pub fn is_at_least_as_specific(a: &DataType, b: &DataType, types: &UserDefinedTypes) -> bool {
    let a = types.resolve_value_type(a).unwrap_or_else(|_| a.clone());
    let b = types.resolve_value_type(b).unwrap_or_else(|_| b.clone());
    if a == b {
        return true;
    }
    let (band_a, band_b) = (band(&a), band(&b));
    if band_a != band_b {
        return band_a < band_b;
    }
    match (&a, &b) {
        (DataType::Options, DataType::Options) => true,

        (
            DataType::Array {
                element: element_a,
                length: length_a,
            },
            DataType::Array {
                element: element_b,
                length: length_b,
            },
        ) => {
            let lengths_compatible = match (length_a, length_b) {
                (Some(la), Some(lb)) => la == lb,
                (Some(_), None) => true,
                (None, None) => true,
                (None, Some(_)) => false,
            };
            lengths_compatible && is_at_least_as_specific(element_a, element_b, types)
        }

        (
            DataType::Tuple { .. } | DataType::Struct { .. },
            DataType::Tuple { .. } | DataType::Struct { .. },
        ) => tuple_at_least_as_specific(&a, &b, types),

        (
            DataType::FunctionExternal { function: kind_a },
            DataType::FunctionExternal { function: kind_b },
        ) => function_at_least_as_specific(kind_a, kind_b, types),

        (DataType::Contract { id: id_a }, DataType::Contract { id: id_b }) => id_a == id_b,
        // A contract type is at least as specific as a compatible address
        (DataType::Contract { .. }, DataType::Address { .. }) => true,
        (DataType::Address { .. }, DataType::Contract { .. }) => false,
        (
            DataType::Address { payable: payable_a },
            DataType::Address { payable: payable_b },
        ) => payable_a == payable_b || (*payable_a && !*payable_b),

        (
            DataType::Bytes { length: length_a },
            DataType::Bytes { length: length_b },
        ) => match (length_a, length_b) {
            (Some(la), Some(lb)) => la <= lb,
            (Some(_), None) => true,
            (None, None) => true,
            (None, Some(_)) => false,
        },

        (numeric_a, numeric_b) if band_a == 6 => {
            numeric_at_least_as_specific(numeric_a, numeric_b)
        }

        (DataType::Enum { id: id_a }, DataType::Enum { id: id_b }) => id_a == id_b,

        (DataType::String, DataType::String) => true,
        (DataType::Bool, DataType::Bool) => true,

        _ => false,
    }
}

/// Lift the single-type order to whole argument lists via synthetic
/// tuples, ignoring top-level component names.
pub fn arguments_at_least_as_specific(
    a: &[DataType],
    b: &[DataType],
    types: &UserDefinedTypes,
) -> bool {
    let tuple_a = DataType::Tuple {
        members: a.iter().cloned().map(Member::unnamed).collect(),
    };
    let tuple_b = DataType::Tuple {
        members: b.iter().cloned().map(Member::unnamed).collect(),
    };
    is_at_least_as_specific(&tuple_a, &tuple_b, types)
}

fn members_of(ty: &DataType, types: &UserDefinedTypes) -> Option<Vec<Member>> {
    match ty {
        DataType::Tuple { members } => Some(members.clone()),
        DataType::Struct { id } => types.struct_members(id).map(<[Member]>::to_vec),
        _ => None,
    }
}

/// Same arity, pairwise comparable by position; when every member is
/// named on both sides the comparison is repeated by matching names, and
/// both checks must pass.
fn tuple_at_least_as_specific(a: &DataType, b: &DataType, types: &UserDefinedTypes) -> bool {
    let (Some(members_a), Some(members_b)) = (members_of(a, types), members_of(b, types)) else {
        return false;
    };
    if members_a.len() != members_b.len() {
        return false;
    }
    let positional = members_a
        .iter()
        .zip(&members_b)
        .all(|(ma, mb)| is_at_least_as_specific(&ma.ty, &mb.ty, types));
    if !positional {
        return false;
    }
    let fully_named = members_a.iter().all(|m| m.name.is_some())
        && members_b.iter().all(|m| m.name.is_some());
    if !fully_named {
        return true;
    }
    members_a.iter().all(|ma| {
        members_b
            .iter()
            .find(|mb| mb.name == ma.name)
            .map(|mb| is_at_least_as_specific(&ma.ty, &mb.ty, types))
            .unwrap_or(false)
    })
}

/// `pure ⊆ view ⊆ nonpayable`, `payable ⊆ nonpayable`: the more
/// restrictive mutability is the more specific one.
fn mutability_at_least_as_specific(a: Mutability, b: Mutability) -> bool {
    a == b
        || matches!(
            (a, b),
            (Mutability::Pure, Mutability::View)
                | (Mutability::Pure, Mutability::Nonpayable)
                | (Mutability::View, Mutability::Nonpayable)
                | (Mutability::Payable, Mutability::Nonpayable)
        )
}

/// The general function type is the least specific function type.
/// Specific signatures compare mutability and recurse on parameter types
/// with input parameters contravariant and return types covariant.
fn function_at_least_as_specific(
    a: &FunctionKind,
    b: &FunctionKind,
    types: &UserDefinedTypes,
) -> bool {
    match (a, b) {
        (_, FunctionKind::General) => true,
        (FunctionKind::General, FunctionKind::Specific { .. }) => false,
        (
            FunctionKind::Specific {
                mutability: mutability_a,
                inputs: inputs_a,
                outputs: outputs_a,
            },
            FunctionKind::Specific {
                mutability: mutability_b,
                inputs: inputs_b,
                outputs: outputs_b,
            },
        ) => {
            mutability_at_least_as_specific(*mutability_a, *mutability_b)
                && inputs_a.len() == inputs_b.len()
                && outputs_a.len() == outputs_b.len()
                // Contravariant: the less specific signature's inputs must
                // be at least as specific, operands swapped
                && inputs_a
                    .iter()
                    .zip(inputs_b)
                    .all(|(ia, ib)| is_at_least_as_specific(ib, ia, types))
                && outputs_a
                    .iter()
                    .zip(outputs_b)
                    .all(|(oa, ob)| is_at_least_as_specific(oa, ob, types))
        }
    }
}

/// Numeric value range as scaled-integer bounds plus decimal places
fn numeric_bounds(ty: &DataType) -> Option<(BigDecimal, BigDecimal, u32, bool)> {
    match ty {
        DataType::Uint { bits } => Some((
            BigDecimal::from(0),
            BigDecimal::from((BigInt::one() << u32::from(*bits)) - 1),
            0,
            false,
        )),
        DataType::Int { bits } => Some((
            BigDecimal::from(-(BigInt::one() << u32::from(*bits - 1))),
            BigDecimal::from((BigInt::one() << u32::from(*bits - 1)) - 1),
            0,
            false,
        )),
        DataType::Fixed { bits, places } => Some((
            BigDecimal::new(-(BigInt::one() << u32::from(*bits - 1)), i64::from(*places)),
            BigDecimal::new(
                (BigInt::one() << u32::from(*bits - 1)) - 1,
                i64::from(*places),
            ),
            *places,
            true,
        )),
        DataType::Ufixed { bits, places } => Some((
            BigDecimal::from(0),
            BigDecimal::new((BigInt::one() << u32::from(*bits)) - 1, i64::from(*places)),
            *places,
            true,
        )),
        _ => None,
    }
}

/// Narrower value range and fewer decimal places win; a fixed-point type
/// is never counted more specific than an integer type.
fn numeric_at_least_as_specific(a: &DataType, b: &DataType) -> bool {
    let (Some((min_a, max_a, places_a, fixed_a)), Some((min_b, max_b, places_b, fixed_b))) =
        (numeric_bounds(a), numeric_bounds(b))
    else {
        return false;
    };
    if fixed_a && !fixed_b {
        return false;
    }
    min_a >= min_b && max_a <= max_b && places_a <= places_b
}
