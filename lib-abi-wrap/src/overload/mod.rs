//! Overload resolution
//!
//! Selecting the unique best-matching method signature from a candidate
//! set: coerce the supplied arguments against every candidate in
//! non-loose mode, then keep only candidates not strictly dominated under
//! the "at least as specific as" partial order.

pub mod order;
pub mod resolve;

pub use order::{arguments_at_least_as_specific, is_at_least_as_specific};
pub use resolve::{resolve_overloads, Resolution};
