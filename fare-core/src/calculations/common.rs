//! Common helpers shared by the calculations and their callers.
//!
//! Raw field text is coerced here, and the display rounding used by the
//! presentation layer lives here so every caller rounds the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, error};

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Coerces raw field text into an amount.
///
/// Empty, missing or unparseable text is zero. Accepts thousands
/// separators and scientific notation.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::calculations::common::coerce_amount;
///
/// assert_eq!(coerce_amount("1,234.50"), dec!(1234.50));
/// assert_eq!(coerce_amount("  12.5 "), dec!(12.5));
/// assert_eq!(coerce_amount(""), dec!(0));
/// assert_eq!(coerce_amount("abc"), dec!(0));
/// ```
pub fn coerce_amount(raw: &str) -> Decimal {
    let normalized = normalize_decimal_input(raw);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|e| {
            debug!(input = %raw, "non-numeric amount treated as zero: {}", e);
            Decimal::ZERO
        })
}

/// Coerces an optional raw field; a missing field is zero.
pub fn coerce_optional_amount(raw: Option<&str>) -> Decimal {
    raw.map(coerce_amount).unwrap_or(Decimal::ZERO)
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unwraps a calculation step, logging the failure and yielding zero.
pub fn zero_on_failure<E: std::fmt::Display>(
    step: &'static str,
    result: Result<Decimal, E>,
) -> Decimal {
    result.unwrap_or_else(|e| {
        error!(step, "calculation error: {}", e);
        Decimal::ZERO
    })
}
