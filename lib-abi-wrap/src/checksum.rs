//! Address checksum capability
//!
//! Mixed-case checksum over the Keccak-256 hash of the lowercase hex
//! digits: a hex letter is uppercased when the corresponding hash nibble
//! is 8 or above. Uniform-case input bypasses validation; mixed-case
//! input must match the computed form exactly.

use sha3::{Digest, Keccak256};

use lib_abi_types::ADDRESS_SIZE;

/// Number of hex digits in an address
pub const ADDRESS_DIGITS: usize = ADDRESS_SIZE * 2;

/// Compute the canonical checksummed form of `digits`, which must be
/// exactly [`ADDRESS_DIGITS`] hex characters (any case). Returns the
/// `0x`-prefixed canonical string.
pub fn to_checksum(digits: &str) -> String {
    let lower = digits.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(2 + ADDRESS_DIGITS);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether the digits use a single case (all lower or all upper among
/// letters; digit-only strings count as uniform)
pub fn is_uniform_case(digits: &str) -> bool {
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    !(has_lower && has_upper)
}

/// Whether mixed-case `digits` match their own checksum form
pub fn passes_checksum(digits: &str) -> bool {
    to_checksum(digits)[2..] == *digits
}
