//! Ether denomination parsing
//!
//! Handles numeric strings with an optional unit suffix, including
//! scientific notation ("1.5e18", "3 gwei", "ether"). A bare unit word
//! means one of that unit; a bare number means no scaling.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;

/// Power of ten for a unit suffix, case-insensitive
pub fn unit_exponent(unit: &str) -> Option<u32> {
    match unit.to_ascii_lowercase().as_str() {
        "wei" => Some(0),
        "gwei" | "shannon" => Some(9),
        "szabo" => Some(12),
        "finney" => Some(15),
        "ether" => Some(18),
        _ => None,
    }
}

/// Parse `input` as `<number>? <unit>?` and return the wei-scaled value.
///
/// Returns `None` when the string matches neither shape. The numeric part
/// may use scientific notation and a sign; the unit defaults to none
/// (multiplier 1) and the number defaults to 1 when only a unit is given.
pub fn parse_with_unit(input: &str) -> Option<BigDecimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Split a trailing alphabetic word off as the unit candidate
    let split_at = trimmed
        .rfind(|c: char| !c.is_ascii_alphabetic())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (mut number_part, mut unit_part) = trimmed.split_at(split_at);
    // An exponent suffix like "1e9" is numeric, not a unit
    if unit_exponent(unit_part).is_none() {
        number_part = trimmed;
        unit_part = "";
    }

    let exponent = if unit_part.is_empty() {
        0
    } else {
        unit_exponent(unit_part)?
    };

    let number_part = number_part.trim();
    let number = if number_part.is_empty() {
        if unit_part.is_empty() {
            return None;
        }
        BigDecimal::from(1)
    } else {
        BigDecimal::from_str(number_part).ok()?
    };

    Some(number * BigDecimal::from(BigInt::from(10).pow(exponent)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(s: &str) -> Option<BigDecimal> {
        parse_with_unit(s)
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(wei("3"), Some(BigDecimal::from(3)));
        assert_eq!(wei("3e2"), Some(BigDecimal::from(300)));
        assert_eq!(wei("-2"), Some(BigDecimal::from(-2)));
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(wei("1 gwei"), Some(BigDecimal::from(1_000_000_000)));
        assert_eq!(wei("1 shannon"), Some(BigDecimal::from(1_000_000_000)));
        assert_eq!(wei("2 wei"), Some(BigDecimal::from(2)));
        assert_eq!(
            wei("1 ether"),
            Some(BigDecimal::from(1_000_000_000_000_000_000_u64))
        );
        assert_eq!(wei("1ETHER"), Some(BigDecimal::from_str("1e18").unwrap()));
    }

    #[test]
    fn test_bare_unit_means_one() {
        assert_eq!(wei("ether"), Some(BigDecimal::from_str("1e18").unwrap()));
        assert_eq!(wei("Gwei"), Some(BigDecimal::from(1_000_000_000)));
    }

    #[test]
    fn test_fractional_amounts_scale() {
        assert_eq!(
            wei("0.5 gwei"),
            Some(BigDecimal::from_str("5e8").unwrap())
        );
    }

    #[test]
    fn test_rejects_unknown_words() {
        assert_eq!(wei("3 parsecs"), None);
        assert_eq!(wei("hello"), None);
        assert_eq!(wei(""), None);
    }
}
