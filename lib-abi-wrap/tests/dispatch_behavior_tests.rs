//! Dispatcher and resolver behavior across whole coercions
//!
//! Exercises case-order significance, best-error retention, and the
//! resolver protocol through the public `wrap` entry point.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use lib_abi_types::{DataType, UserDefinedTypes, Value, ValuePayload};
use lib_abi_wrap::{
    specificity, wrap, NullResolver, RequestKind, ResolveRequest, ResolveResponse, Resolver,
    WrapError, WrapOptions,
};

/// Resolver that recognizes every integer request as a fixed value
struct FortyTwo;

impl Resolver for FortyTwo {
    fn resolve(&mut self, request: ResolveRequest<'_>) -> ResolveResponse {
        match request {
            ResolveRequest::Integer { .. } => ResolveResponse::Integer {
                value: Some(BigInt::from(42)),
                reason: None,
                partially_recognized: false,
            },
            other => ResolveResponse::unrecognized(other.kind()),
        }
    }
}

/// Resolver that violates the protocol by answering with the wrong kind
struct WrongKind;

impl Resolver for WrongKind {
    fn resolve(&mut self, _request: ResolveRequest<'_>) -> ResolveResponse {
        ResolveResponse::Decimal {
            value: Some(BigDecimal::from(1)),
            reason: None,
            partially_recognized: false,
        }
    }
}

#[test]
fn test_case_order_decides_ambiguous_strings() {
    // "5" is recognizable both as a canonical integer string and as a
    // unit-suffixed string; the earlier case (exact parse) wins, which is
    // observable because the unit case would also accept "5e0"
    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let wrapped = wrap(&DataType::uint(256), &Value::from("5"), &opts, &mut NullResolver)
        .expect("should wrap");
    assert_eq!(wrapped.value, ValuePayload::Int(BigInt::from(5)));

    // A hex string for dynamic bytes is recognizable both as hex and (in
    // loose mode) could look numeric; the hex case is earlier, so no
    // zero-as-0x00 rewrite applies
    let opts = WrapOptions::new(&types).loose();
    let wrapped = wrap(
        &DataType::bytes_dynamic(),
        &Value::from("0x"),
        &opts,
        &mut NullResolver,
    )
    .expect("should wrap");
    assert_eq!(wrapped.value, ValuePayload::Bytes(vec![]));
}

#[test]
fn test_later_case_with_higher_specificity_wins_error_selection() {
    // For a uint target, a sequence with an out-of-range element reaches
    // the byte-array case (validation failure, specificity 5) after
    // earlier cases reject the shape at specificity 1; the surfaced
    // reason must come from the later, more specific failure
    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let err = wrap(
        &DataType::uint(256),
        &Value::Sequence(vec![Value::from(999)]),
        &opts,
        &mut NullResolver,
    )
    .expect_err("bad byte element");
    assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    assert!(err.to_string().contains("byte range"));
}

#[test]
fn test_resolver_recognizes_foreign_values() {
    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let foreign = Value::record([("magnitude", Value::from(42))]);
    let wrapped = wrap(&DataType::uint(256), &foreign, &opts, &mut FortyTwo)
        .expect("resolver should recognize");
    assert_eq!(wrapped.value, ValuePayload::Int(BigInt::from(42)));
}

#[test]
fn test_resolver_non_recognition_specificities() {
    struct Partial(bool);
    impl Resolver for Partial {
        fn resolve(&mut self, request: ResolveRequest<'_>) -> ResolveResponse {
            match request {
                ResolveRequest::Integer { .. } => ResolveResponse::Integer {
                    value: None,
                    reason: Some("rejected by the resolver".to_string()),
                    partially_recognized: self.0,
                },
                other => ResolveResponse::unrecognized(other.kind()),
            }
        }
    }

    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let foreign = Value::record([("magnitude", Value::from(42))]);

    let err = wrap(&DataType::uint(256), &foreign, &opts, &mut Partial(true))
        .expect_err("partially recognized");
    assert_eq!(err.specificity(), Some(specificity::VALIDATION));
    assert!(err.to_string().contains("rejected by the resolver"));

    let err = wrap(&DataType::uint(256), &foreign, &opts, &mut Partial(false))
        .expect_err("not recognized");
    assert_eq!(err.specificity(), Some(specificity::UNRESOLVED));
}

#[test]
fn test_protocol_violation_is_fatal() {
    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let foreign = Value::record([("magnitude", Value::from(42))]);
    let err = wrap(&DataType::uint(256), &foreign, &opts, &mut WrongKind)
        .expect_err("kind mismatch");
    assert_eq!(
        err,
        WrapError::BadResponseKind {
            expected: RequestKind::Integer,
            got: RequestKind::Decimal,
        }
    );
}

#[test]
fn test_children_resolve_left_to_right() {
    /// Records the order of resolver consultations
    struct Recorder {
        seen: Vec<String>,
    }
    impl Resolver for Recorder {
        fn resolve(&mut self, request: ResolveRequest<'_>) -> ResolveResponse {
            match request {
                ResolveRequest::Integer { input } => {
                    self.seen.push(input.to_string());
                    ResolveResponse::Integer {
                        value: Some(BigInt::from(self.seen.len() as i64)),
                        reason: None,
                        partially_recognized: false,
                    }
                }
                other => ResolveResponse::unrecognized(other.kind()),
            }
        }
    }

    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types);
    let array = DataType::Array {
        element: Box::new(DataType::uint(256)),
        length: None,
    };
    let input = Value::Sequence(vec![
        Value::record([("first", Value::from(1))]),
        Value::record([("second", Value::from(2))]),
    ]);
    let mut recorder = Recorder { seen: Vec::new() };
    let wrapped = wrap(&array, &input, &opts, &mut recorder).expect("should wrap");
    assert_eq!(recorder.seen.len(), 2);
    match wrapped.value {
        ValuePayload::Array(elements) => {
            assert_eq!(elements[0].value, ValuePayload::Int(BigInt::from(1)));
            assert_eq!(elements[1].value, ValuePayload::Int(BigInt::from(2)));
        }
        other => panic!("expected array payload, got {:?}", other),
    }
}

#[test]
fn test_specificity_floor_does_not_leak_into_children() {
    // A floor set at the outer dispatch must not raise errors produced
    // inside nested dispatches beyond what the outer level re-raises
    let types = UserDefinedTypes::new();
    let opts = WrapOptions::new(&types).with_floor(specificity::CHECKSUM);
    let err = wrap(&DataType::uint(8), &Value::from(300), &opts, &mut NullResolver)
        .expect_err("out of range");
    // The retained error is the validation failure, floored to 6 at the
    // outer level only
    assert_eq!(err.specificity(), Some(specificity::CHECKSUM));
    assert!(err.to_string().contains("out of range"));
}
