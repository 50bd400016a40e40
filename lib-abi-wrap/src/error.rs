//! Coercion and resolution errors
//!
//! Two families, with different propagation rules. Type mismatches are
//! expected and recoverable: the dispatcher catches them, keeps the most
//! specific one, and tries the next case. Everything else is fatal and
//! passes through every dispatch layer unchanged.

use thiserror::Error;

use lib_abi_types::{DataType, MethodSignature, Value};

/// Specificity ranks for type-mismatch errors
///
/// Used purely to select which failure message surfaces when every case
/// of a dispatch fails; higher wins, ties favor the earliest case.
pub mod specificity {
    /// Dispatcher-only placeholder; no case produced an error
    pub const NONE: u8 = 0;
    /// The case did not even recognize the input's shape
    pub const UNRECOGNIZED: u8 = 1;
    /// Permanent failure: no case could ever accept this input
    pub const PERMANENT: u8 = 2;
    /// The external resolver did not recognize the input
    pub const UNRESOLVED: u8 = 3;
    /// Ordinary validation failure inside a shape-matching case
    pub const VALIDATION: u8 = 5;
    /// Address checksum failure; outranks ordinary validation
    pub const CHECKSUM: u8 = 6;
}

/// Kind tag for resolver requests and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Integer,
    Decimal,
    Address,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Integer => write!(f, "integer"),
            RequestKind::Decimal => write!(f, "decimal"),
            RequestKind::Address => write!(f, "address"),
        }
    }
}

/// Coercion error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WrapError {
    /// The input was not recognizable as the target type
    #[error("{name}: {reason}")]
    TypeMismatch {
        /// Target type the coercion was against
        ty: DataType,
        /// The offending input
        input: Value,
        /// Diagnostic name of the value being coerced (dotted/bracketed)
        name: String,
        /// Rank in 0..=6; see [`specificity`]
        specificity: u8,
        /// Human-readable explanation
        reason: String,
    },

    /// The resolver answered a request with a response of the wrong kind
    #[error("resolver answered a {expected} request with a {got} response")]
    BadResponseKind { expected: RequestKind, got: RequestKind },
}

impl WrapError {
    /// Build a type mismatch
    pub fn mismatch(
        ty: &DataType,
        input: &Value,
        name: &str,
        specificity: u8,
        reason: impl Into<String>,
    ) -> Self {
        WrapError::TypeMismatch {
            ty: ty.clone(),
            input: input.clone(),
            name: name.to_string(),
            specificity,
            reason: reason.into(),
        }
    }

    /// The mismatch specificity, or `None` for fatal errors
    pub fn specificity(&self) -> Option<u8> {
        match self {
            WrapError::TypeMismatch { specificity, .. } => Some(*specificity),
            WrapError::BadResponseKind { .. } => None,
        }
    }
}

/// Result type for coercion
pub type WrapResult<T> = Result<T, WrapError>;

/// Overload-resolution error
#[derive(Error, Debug)]
pub enum OverloadError {
    /// No candidate signature accepted the supplied arguments
    #[error("no overload of {name} matches the given arguments")]
    NoMatchingCandidate {
        name: String,
        /// Per-candidate coercion failures, in candidate order
        failures: Vec<WrapError>,
    },

    /// Multiple candidates matched with none strictly best
    #[error("ambiguous call to {name}: {} overloads match with no unique best candidate", .matching.len())]
    NoUniqueBestCandidate {
        name: String,
        /// The surviving candidate signatures
        matching: Vec<MethodSignature>,
    },

    /// A coercion failed in a way that is not a type mismatch
    #[error(transparent)]
    Wrap(#[from] WrapError),
}

/// Result type for overload resolution
pub type OverloadResult<T> = Result<T, OverloadError>;
