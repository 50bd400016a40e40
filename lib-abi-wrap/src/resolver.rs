//! External resolver protocol
//!
//! Three shapes cannot be resolved by the built-in cases alone: foreign
//! arbitrary-precision integers, foreign decimals, and human-readable
//! address names. For those the engine consults a caller-supplied
//! [`Resolver`] synchronously; a coercion is re-entrant around the call
//! rather than suspended. A response of the wrong kind is a protocol
//! violation and aborts the whole coercion.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use lib_abi_types::{DataType, Value};

use crate::error::{specificity, RequestKind, WrapError, WrapResult};
use crate::options::WrapOptions;

/// A request the engine hands to the resolver
#[derive(Debug)]
pub enum ResolveRequest<'a> {
    /// Recognize `input` as an arbitrary-precision integer
    Integer { input: &'a Value },
    /// Recognize `input` as an arbitrary-precision decimal
    Decimal { input: &'a Value },
    /// Resolve a human-readable name to a literal address
    Address { name: &'a str },
}

impl ResolveRequest<'_> {
    pub fn kind(&self) -> RequestKind {
        match self {
            ResolveRequest::Integer { .. } => RequestKind::Integer,
            ResolveRequest::Decimal { .. } => RequestKind::Decimal,
            ResolveRequest::Address { .. } => RequestKind::Address,
        }
    }
}

/// The resolver's answer
///
/// A `None` payload means non-recognition; `partially_recognized`
/// distinguishes "recognized the shape but rejected the content" (which
/// surfaces at ordinary validation specificity) from "no idea" (which
/// surfaces lower). `reason`, when present, becomes the error text.
#[derive(Debug, Clone)]
pub enum ResolveResponse {
    Integer {
        value: Option<BigInt>,
        reason: Option<String>,
        partially_recognized: bool,
    },
    Decimal {
        value: Option<BigDecimal>,
        reason: Option<String>,
        partially_recognized: bool,
    },
    Address {
        address: Option<String>,
        reason: Option<String>,
        partially_recognized: bool,
    },
}

impl ResolveResponse {
    pub fn kind(&self) -> RequestKind {
        match self {
            ResolveResponse::Integer { .. } => RequestKind::Integer,
            ResolveResponse::Decimal { .. } => RequestKind::Decimal,
            ResolveResponse::Address { .. } => RequestKind::Address,
        }
    }

    /// Non-recognition response of the given kind
    pub fn unrecognized(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Integer => ResolveResponse::Integer {
                value: None,
                reason: None,
                partially_recognized: false,
            },
            RequestKind::Decimal => ResolveResponse::Decimal {
                value: None,
                reason: None,
                partially_recognized: false,
            },
            RequestKind::Address => ResolveResponse::Address {
                address: None,
                reason: None,
                partially_recognized: false,
            },
        }
    }
}

/// External capability for recognizing values the built-in cases cannot
pub trait Resolver {
    fn resolve(&mut self, request: ResolveRequest<'_>) -> ResolveResponse;
}

/// Resolver that recognizes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl Resolver for NullResolver {
    fn resolve(&mut self, request: ResolveRequest<'_>) -> ResolveResponse {
        ResolveResponse::unrecognized(request.kind())
    }
}

fn non_recognition(
    ty: &DataType,
    input: &Value,
    opts: &WrapOptions<'_>,
    reason: Option<String>,
    partially_recognized: bool,
    default_reason: &str,
) -> WrapError {
    let rank = if partially_recognized {
        specificity::VALIDATION
    } else {
        specificity::UNRESOLVED
    };
    WrapError::mismatch(
        ty,
        input,
        &opts.name,
        rank,
        reason.unwrap_or_else(|| default_reason.to_string()),
    )
}

/// Ask the resolver to recognize `input` as an integer
pub(crate) fn consult_integer(
    resolver: &mut dyn Resolver,
    ty: &DataType,
    input: &Value,
    opts: &WrapOptions<'_>,
) -> WrapResult<BigInt> {
    match resolver.resolve(ResolveRequest::Integer { input }) {
        ResolveResponse::Integer {
            value: Some(v), ..
        } => Ok(v),
        ResolveResponse::Integer {
            value: None,
            reason,
            partially_recognized,
        } => Err(non_recognition(
            ty,
            input,
            opts,
            reason,
            partially_recognized,
            "value is not recognizable as an integer",
        )),
        other => Err(WrapError::BadResponseKind {
            expected: RequestKind::Integer,
            got: other.kind(),
        }),
    }
}

/// Ask the resolver to recognize `input` as a decimal
pub(crate) fn consult_decimal(
    resolver: &mut dyn Resolver,
    ty: &DataType,
    input: &Value,
    opts: &WrapOptions<'_>,
) -> WrapResult<BigDecimal> {
    match resolver.resolve(ResolveRequest::Decimal { input }) {
        ResolveResponse::Decimal {
            value: Some(v), ..
        } => Ok(v),
        ResolveResponse::Decimal {
            value: None,
            reason,
            partially_recognized,
        } => Err(non_recognition(
            ty,
            input,
            opts,
            reason,
            partially_recognized,
            "value is not recognizable as a decimal",
        )),
        other => Err(WrapError::BadResponseKind {
            expected: RequestKind::Decimal,
            got: other.kind(),
        }),
    }
}

/// Ask the resolver to resolve an address name
pub(crate) fn consult_address(
    resolver: &mut dyn Resolver,
    ty: &DataType,
    input: &Value,
    name: &str,
    opts: &WrapOptions<'_>,
) -> WrapResult<String> {
    match resolver.resolve(ResolveRequest::Address { name }) {
        ResolveResponse::Address {
            address: Some(a), ..
        } => Ok(a),
        ResolveResponse::Address {
            address: None,
            reason,
            partially_recognized,
        } => Err(non_recognition(
            ty,
            input,
            opts,
            reason,
            partially_recognized,
            "name could not be resolved to an address",
        )),
        other => Err(WrapError::BadResponseKind {
            expected: RequestKind::Address,
            got: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_abi_types::UserDefinedTypes;

    struct WrongKindResolver;

    impl Resolver for WrongKindResolver {
        fn resolve(&mut self, _request: ResolveRequest<'_>) -> ResolveResponse {
            ResolveResponse::unrecognized(RequestKind::Address)
        }
    }

    #[test]
    fn test_null_resolver_is_unrecognized_at_low_specificity() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let input = Value::from("mystery");
        let mut resolver = NullResolver;
        let err = consult_integer(&mut resolver, &DataType::uint(256), &input, &opts)
            .expect_err("null resolver never recognizes");
        assert_eq!(err.specificity(), Some(specificity::UNRESOLVED));
    }

    #[test]
    fn test_partial_recognition_raises_specificity() {
        struct Partial;
        impl Resolver for Partial {
            fn resolve(&mut self, _request: ResolveRequest<'_>) -> ResolveResponse {
                ResolveResponse::Integer {
                    value: None,
                    reason: Some("looked numeric but was not".to_string()),
                    partially_recognized: true,
                }
            }
        }
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let input = Value::from("mystery");
        let err = consult_integer(&mut Partial, &DataType::uint(256), &input, &opts)
            .expect_err("partial recognition still fails");
        assert_eq!(err.specificity(), Some(specificity::VALIDATION));
        assert!(err.to_string().contains("looked numeric"));
    }

    #[test]
    fn test_kind_mismatch_is_protocol_violation() {
        let types = UserDefinedTypes::new();
        let opts = WrapOptions::new(&types);
        let input = Value::from("mystery");
        let err = consult_integer(&mut WrongKindResolver, &DataType::uint(256), &input, &opts)
            .expect_err("wrong kind must fail");
        assert_eq!(
            err,
            WrapError::BadResponseKind {
                expected: RequestKind::Integer,
                got: RequestKind::Address,
            }
        );
    }
}
