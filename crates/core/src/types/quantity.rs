//! Decimal quantity helpers.
//!
//! Quantities are `rust_decimal::Decimal` end to end; no movement ever passes
//! through binary floating point, so long replays do not drift.

use rust_decimal::Decimal;

/// Tolerance under which a balance counts as zero (0.001, presumably kg).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Returns true if `value` lies within `tolerance` of zero.
#[must_use]
pub fn is_effectively_zero(value: Decimal, tolerance: Decimal) -> bool {
    value.abs() <= tolerance
}

/// Returns true if `value` is below zero by more than `tolerance`.
#[must_use]
pub fn is_below_zero(value: Decimal, tolerance: Decimal) -> bool {
    value < -tolerance
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tolerance_value() {
        assert_eq!(BALANCE_TOLERANCE, dec("0.001"));
    }

    #[test]
    fn test_is_effectively_zero() {
        assert!(is_effectively_zero(dec("0"), BALANCE_TOLERANCE));
        assert!(is_effectively_zero(dec("0.001"), BALANCE_TOLERANCE));
        assert!(is_effectively_zero(dec("-0.0009"), BALANCE_TOLERANCE));
        assert!(!is_effectively_zero(dec("0.0011"), BALANCE_TOLERANCE));
    }

    #[test]
    fn test_is_below_zero() {
        assert!(!is_below_zero(dec("-0.0005"), BALANCE_TOLERANCE));
        assert!(!is_below_zero(dec("-0.001"), BALANCE_TOLERANCE));
        assert!(is_below_zero(dec("-0.002"), BALANCE_TOLERANCE));
    }
}
