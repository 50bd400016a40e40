//! Overload resolution end-to-end tests

use num_bigint::BigInt;

use lib_abi_types::{DataType, MethodSignature, UserDefinedTypes, Value};
use lib_abi_wrap::{resolve_overloads, NullResolver, OverloadError, OverloadResult, Resolution};

fn resolve(candidates: &[MethodSignature], args: &[Value]) -> OverloadResult<Resolution> {
    let types = UserDefinedTypes::new();
    resolve_overloads(candidates, args, &types, &mut NullResolver, false)
}

#[test]
fn test_uint_int_pair_is_ambiguous() {
    let candidates = vec![
        MethodSignature::new("f").with_input(DataType::uint(256)),
        MethodSignature::new("f").with_input(DataType::int(256)),
    ];
    let err = resolve(&candidates, &[Value::from(5)]).expect_err("neither dominates");
    match err {
        OverloadError::NoUniqueBestCandidate { name, matching } => {
            assert_eq!(name, "f");
            assert_eq!(matching.len(), 2);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }
}

#[test]
fn test_strictly_more_specific_candidate_resolves_ambiguity() {
    let candidates = vec![
        MethodSignature::new("f").with_input(DataType::uint(256)),
        MethodSignature::new("f").with_input(DataType::int(256)),
        MethodSignature::new("f").with_input(DataType::uint(8)),
    ];
    let resolution = resolve(&candidates, &[Value::from(5)]).expect("uint8 wins");
    assert_eq!(resolution.signature.to_string(), "f(uint8)");
}

#[test]
fn test_negative_argument_disambiguates_by_coercion() {
    let candidates = vec![
        MethodSignature::new("f").with_input(DataType::uint(256)),
        MethodSignature::new("f").with_input(DataType::int(256)),
    ];
    let resolution = resolve(&candidates, &[Value::from(-5)]).expect("only int accepts");
    assert_eq!(resolution.signature.to_string(), "f(int256)");
}

#[test]
fn test_string_vs_bytes_prefers_bytes() {
    // bytes is a strictly lower band than string
    let candidates = vec![
        MethodSignature::new("g").with_input(DataType::String),
        MethodSignature::new("g").with_input(DataType::bytes_dynamic()),
    ];
    let resolution = resolve(&candidates, &[Value::from("0xdeadbeef")]).expect("bytes wins");
    assert_eq!(resolution.signature.to_string(), "g(bytes)");
}

#[test]
fn test_options_argument_with_both_arities() {
    let candidates = vec![
        MethodSignature::new("f").with_input(DataType::uint(256)),
        MethodSignature::new("f")
            .with_input(DataType::uint(256))
            .with_input(DataType::uint(256)),
    ];
    // Trailing record is options-shaped, so only the one-parameter
    // candidate matches at arity args.len() - 1; the two-parameter
    // candidate fails coercion because a record is not a uint
    let args = vec![Value::from(1), Value::record([("gas", Value::from(50000))])];
    let resolution = resolve(&candidates, &args).expect("options peel off");
    assert_eq!(resolution.signature.to_string(), "f(uint256)");
    assert_eq!(resolution.arguments.len(), 1);
    assert_eq!(resolution.options.gas, Some(BigInt::from(50000)));
}

#[test]
fn test_no_candidate_collects_failures() {
    use lib_abi_types::{StringPayload, ValuePayload, WrappedResult, WrappedValue};

    let candidates = vec![
        MethodSignature::new("f").with_input(DataType::uint(8)),
        MethodSignature::new("f").with_input(DataType::Bool),
    ];
    // Arity matches both, but a wrapped string re-wraps as neither a
    // uint nor a bool (the truthiness fallback refuses wrapped results)
    let wrapped_string = Value::Wrapped(Box::new(WrappedResult::Value(WrappedValue::new(
        DataType::String,
        ValuePayload::String(StringPayload::Valid("x".to_string())),
    ))));
    let err = resolve(&candidates, &[wrapped_string]).expect_err("nothing matches");
    match err {
        OverloadError::NoMatchingCandidate { failures, .. } => {
            assert_eq!(failures.len(), 2);
        }
        other => panic!("expected no-match, got {:?}", other),
    }
}

#[test]
fn test_resolution_is_non_loose() {
    // A wrapped decimal coerces to uint only in loose mode, and overload
    // resolution always coerces non-loose
    use bigdecimal::BigDecimal;
    use lib_abi_types::{ValuePayload, WrappedResult, WrappedValue};

    let wrapped_decimal = Value::Wrapped(Box::new(WrappedResult::Value(WrappedValue::new(
        DataType::fixed_default(),
        ValuePayload::Decimal(BigDecimal::from(3)),
    ))));
    let candidates = vec![MethodSignature::new("f").with_input(DataType::uint(256))];
    assert!(resolve(&candidates, &[wrapped_decimal]).is_err());
}

#[test]
fn test_address_beats_string_band() {
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    let candidates = vec![
        MethodSignature::new("h").with_input(DataType::String),
        MethodSignature::new("h").with_input(DataType::address()),
    ];
    let resolution = resolve(&candidates, &[Value::from(CHECKSUMMED)]).expect("address wins");
    assert_eq!(resolution.signature.to_string(), "h(address)");
}
