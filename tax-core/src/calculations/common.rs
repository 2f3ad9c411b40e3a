//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used by the calculators,
//! including rounding and other common operations.

use rust_decimal::Decimal;

/// Number of decimal places reported for tax and refund amounts.
pub const PRECISION: u32 = 1;

/// Rounds a decimal value to one decimal place using half-up rounding.
///
/// Values at exactly 0.05 are rounded away from zero, so this never applies
/// banker's rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.44)), dec!(123.4));
/// assert_eq!(round_half_up(dec!(123.45)), dec!(123.5));
/// assert_eq!(round_half_up(dec!(123.46)), dec!(123.5));
/// assert_eq!(round_half_up(dec!(-123.45)), dec!(-123.5)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRECISION, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
