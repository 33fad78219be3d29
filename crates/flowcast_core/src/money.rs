//! Decimal rounding policy.
//!
//! Every stored amount is rounded HALF_UP (midpoint away from zero). Money and
//! share counts keep two places; portions keep ten.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MONEY_SCALE: u32 = 2;
pub const PORTION_SCALE: u32 = 10;

#[inline]
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    round_to(value, MONEY_SCALE)
}

#[inline]
pub fn round_portion(value: Decimal) -> Decimal {
    round_to(value, PORTION_SCALE)
}

/// `numerator / denominator` rounded to `dp` places.
#[inline]
pub fn ratio(numerator: i32, denominator: i32, dp: u32) -> Decimal {
    round_to(Decimal::from(numerator) / Decimal::from(denominator), dp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_money(dec!(38.4615)), dec!(38.46));
    }

    #[test]
    fn test_ratio_precision() {
        assert_eq!(ratio(11, 14, PORTION_SCALE), dec!(0.7857142857));
        assert_eq!(ratio(1, 12, PORTION_SCALE), dec!(0.0833333333));
        assert_eq!(ratio(90, 92, 2), dec!(0.98));
    }
}
