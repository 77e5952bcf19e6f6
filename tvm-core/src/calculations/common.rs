//! Common utility functions for TVM calculations.
//!
//! This module provides the rounding and formatting rules shared by the
//! solver and the entry state machine.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a float into a [`Decimal`], or `None` for NaN, infinities and
/// magnitudes outside the decimal range.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Rounds a value to `decimals` places using half-up rounding.
///
/// Values that cannot be represented as a [`Decimal`] (non-finite or beyond
/// roughly 7.9e28) are returned unchanged.
///
/// # Examples
///
/// ```
/// use tvm_core::calculations::common::round_to_decimals;
///
/// assert_eq!(round_to_decimals(1628.894626777442, 10), 1628.8946267774);
/// assert_eq!(round_to_decimals(0.125, 2), 0.13);
/// assert_eq!(round_to_decimals(-0.125, 2), -0.13); // Away from zero
/// assert!(round_to_decimals(f64::NAN, 10).is_nan());
/// ```
pub fn round_to_decimals(
    value: f64,
    decimals: u32,
) -> f64 {
    let Some(decimal) = to_decimal(value) else {
        return value;
    };
    // Going through text lands on the nearest f64 to the rounded decimal.
    decimal
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
        .parse()
        .unwrap_or(value)
}

/// Magnitudes at or above this are written in exponent form.
const EXPONENT_ABOVE: f64 = 1e21;

/// Nonzero magnitudes below this are written in exponent form.
const EXPONENT_BELOW: f64 = 1e-7;

/// Renders a value the way the display shows it.
///
/// Finite values use the shortest representation that parses back to the
/// same float. Magnitudes of 1e21 and above, or below 1e-7, use exponent
/// form. Negative zero shows as `0`, and non-finite values are shown as
/// `NaN`, `Infinity` or `-Infinity`.
///
/// # Examples
///
/// ```
/// use tvm_core::calculations::common::format_value;
///
/// assert_eq!(format_value(20.0), "20");
/// assert_eq!(format_value(-0.0), "0");
/// assert_eq!(format_value(0.125), "0.125");
/// assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
/// assert_eq!(format_value(9.9999996e31), "9.9999996e31");
/// assert_eq!(format_value(2.5e-9), "2.5e-9");
/// ```
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= EXPONENT_ABOVE || value.abs() < EXPONENT_BELOW {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}
