//! Core pricing calculation functions.
//!
//! Pure functions for pricing math, shared by the pipeline steps.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use tour_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Extended amount for a quantity of units, `None` if out of range
pub fn line_total(qty: i64, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(qty).checked_mul(unit_price)
}

/// `rate` share of `amount`, rounded to cents, `None` if out of range
pub fn percentage_of(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate).map(|share| round_money(share, 2))
}

/// Checked sum of amounts, `None` if out of range
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

/// Whether a price counts as set. Zero and negative prices mean "not offered".
pub fn is_positive_price(price: Option<Decimal>) -> bool {
    matches!(price, Some(p) if p > Decimal::ZERO)
}
