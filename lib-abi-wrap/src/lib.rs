//! ABI Value Coercion Engine
//!
//! Converts loosely-typed caller-supplied values into strictly-typed
//! values conforming to the data model in `lib-abi-types`. Three pieces
//! work together:
//!
//! - a **dispatcher** that tries an ordered list of narrow recognizer
//!   cases per target type, retaining the most informative failure;
//! - a **resolver protocol** that hands foreign numbers and address
//!   names to a caller-supplied capability;
//! - an **overload resolution engine** that picks the unique best
//!   signature from a candidate set under a specificity partial order.
//!
//! The engine performs no I/O and no arithmetic of its own; it
//! validates, normalizes, and re-represents values produced by the
//! numeric crates.

pub mod checksum;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod overload;
pub mod resolver;
pub mod units;
pub mod wrap;

pub use dispatch::{dispatch_cases, WrapCase};
pub use error::{
    specificity, OverloadError, OverloadResult, RequestKind, WrapError, WrapResult,
};
pub use options::WrapOptions;
pub use overload::{
    arguments_at_least_as_specific, is_at_least_as_specific, resolve_overloads, Resolution,
};
pub use resolver::{NullResolver, ResolveRequest, ResolveResponse, Resolver};
pub use wrap::{wrap, wrap_multiple};

// Re-export the data model for convenience
pub use lib_abi_types as types;
