//! Decimal arithmetic utilities for funding rate figures.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Convert a decimal fraction (0.015) to percent (1.5).
///
/// Assumes the venue reports funding as a fraction; if it ever switches to
/// percent this is the only place to change. Returns `None` when the value
/// is too large to scale.
pub fn to_percentage(fraction: Decimal) -> Option<Decimal> {
    fraction.checked_mul(dec!(100))
}

/// Round a decimal to a specific number of decimal places, halves away
/// from zero (2.665 -> 2.67, -2.665 -> -2.67).
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether `value` reaches `threshold` in either direction (boundary included).
pub fn exceeds_abs(value: Decimal, threshold: Decimal) -> bool {
    value.abs() >= threshold
}
