//! Ordered-case dispatcher
//!
//! Runs the cases for one target type in order. The first success wins.
//! Type mismatches are collected and the most specific one is re-raised
//! when every case fails; any other error aborts the dispatch at once.

use lib_abi_types::{DataType, Value, WrappedValue};

use crate::error::{specificity, WrapError, WrapResult};
use crate::options::WrapOptions;
use crate::resolver::Resolver;

/// One coercion case: a narrow recognizer for a single input shape
pub type WrapCase =
    fn(&DataType, &Value, &WrapOptions<'_>, &mut dyn Resolver) -> WrapResult<WrappedValue>;

/// Try `cases` in order against `value`.
///
/// Each case runs with the specificity floor cleared; the caller's floor
/// applies only to the error this dispatch itself raises. A retained
/// failure is replaced only by a *strictly* more specific one, so ties
/// favor the earliest case.
pub fn dispatch_cases(
    ty: &DataType,
    value: &Value,
    opts: &WrapOptions<'_>,
    resolver: &mut dyn Resolver,
    cases: &[WrapCase],
) -> WrapResult<WrappedValue> {
    let case_opts = opts.cleared();
    let mut best: Option<WrapError> = None;
    let mut best_rank = specificity::NONE;

    for (index, case) in cases.iter().enumerate() {
        match case(ty, value, &case_opts, resolver) {
            Ok(wrapped) => {
                tracing::trace!(
                    "wrap {}: case {}/{} accepted {} as {}",
                    opts.name,
                    index + 1,
                    cases.len(),
                    value.shape_name(),
                    ty
                );
                return Ok(wrapped);
            }
            Err(err @ WrapError::TypeMismatch { .. }) => {
                let rank = err.specificity().unwrap_or(specificity::NONE);
                if best.is_none() || rank > best_rank {
                    best_rank = rank;
                    best = Some(err);
                }
            }
            Err(fatal) => return Err(fatal),
        }
    }

    let floor = opts.specificity_floor.unwrap_or(specificity::NONE);
    tracing::debug!(
        "wrap {}: all {} cases rejected {} for {}",
        opts.name,
        cases.len(),
        value.shape_name(),
        ty
    );
    match best {
        Some(WrapError::TypeMismatch {
            ty,
            input,
            name,
            specificity: rank,
            reason,
        }) => Err(WrapError::TypeMismatch {
            ty,
            input,
            name,
            specificity: rank.max(floor),
            reason,
        }),
        _ => Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            floor,
            format!("{} cannot be interpreted as type {}", value.shape_name(), ty),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::specificity;
    use crate::resolver::NullResolver;
    use lib_abi_types::{UserDefinedTypes, ValuePayload};

    fn reject_low(
        ty: &DataType,
        value: &Value,
        opts: &WrapOptions<'_>,
        _resolver: &mut dyn Resolver,
    ) -> WrapResult<WrappedValue> {
        Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::UNRECOGNIZED,
            "first case did not recognize this",
        ))
    }

    fn reject_high(
        ty: &DataType,
        value: &Value,
        opts: &WrapOptions<'_>,
        _resolver: &mut dyn Resolver,
    ) -> WrapResult<WrappedValue> {
        Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::VALIDATION,
            "second case rejected the content",
        ))
    }

    fn reject_high_again(
        ty: &DataType,
        value: &Value,
        opts: &WrapOptions<'_>,
        _resolver: &mut dyn Resolver,
    ) -> WrapResult<WrappedValue> {
        Err(WrapError::mismatch(
            ty,
            value,
            &opts.name,
            specificity::VALIDATION,
            "third case also rejected the content",
        ))
    }

    fn accept(
        ty: &DataType,
        _value: &Value,
        _opts: &WrapOptions<'_>,
        _resolver: &mut dyn Resolver,
    ) -> WrapResult<WrappedValue> {
        Ok(WrappedValue::new(ty.clone(), ValuePayload::Bool(true)))
    }

    fn fatal(
        _ty: &DataType,
        _value: &Value,
        _opts: &WrapOptions<'_>,
        _resolver: &mut dyn Resolver,
    ) -> WrapResult<WrappedValue> {
        Err(WrapError::BadResponseKind {
            expected: crate::error::RequestKind::Integer,
            got: crate::error::RequestKind::Address,
        })
    }

    #[test]
    fn test_first_success_wins() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let result = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[reject_low, accept, fatal],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_highest_specificity_error_is_retained() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let err = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[reject_low, reject_high],
        )
        .expect_err("all cases fail");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
        assert!(err.to_string().contains("second case"));
    }

    #[test]
    fn test_specificity_ties_favor_earliest_case() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let err = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[reject_high, reject_high_again],
        )
        .expect_err("all cases fail");
        assert!(err.to_string().contains("second case"));
    }

    #[test]
    fn test_floor_raises_retained_error() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types).with_floor(specificity::VALIDATION);
        let err = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[reject_low],
        )
        .expect_err("case fails");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
        assert!(err.to_string().contains("first case"));
    }

    #[test]
    fn test_empty_case_list_raises_generic_error_at_floor() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types).with_floor(specificity::PERMANENT);
        let err = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[],
        )
        .expect_err("no cases");
        assert_eq!(err.specificity(), Some(specificity::PERMANENT));
        assert!(err.to_string().contains("cannot be interpreted"));
    }

    #[test]
    fn test_fatal_error_aborts_immediately() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let err = dispatch_cases(
            &DataType::Bool,
            &Value::from(true),
            &opts,
            &mut NullResolver,
            &[fatal, accept],
        )
        .expect_err("fatal error propagates");
        assert!(matches!(err, WrapError::BadResponseKind { .. }));
    }
}
