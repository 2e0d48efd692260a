//! Target price calculations.
//!
//! The margin combines the profit target with the exchange fee so a
//! round trip at the target prices clears both.

use rust_decimal::Decimal;
use spotbot_core::Price;

/// Fractional digits target prices are rounded to.
pub const PRICE_SCALE: u32 = 8;

/// Margin to apply around a reference price:
/// `price * (min_profit_percent + fee_percent) / 100`, rounded to 8 dp.
pub fn margin_price(price: Price, min_profit_percent: Decimal, fee_percent: Decimal) -> Price {
    let margin = price.inner() * (min_profit_percent + fee_percent) / Decimal::from(100);
    Price::new(margin.round_dp(PRICE_SCALE))
}

/// Target buy price: weighted average minus the margin.
pub fn target_buy_price(
    weighted_avg_price: Price,
    min_profit_percent: Decimal,
    fee_percent: Decimal,
) -> Price {
    weighted_avg_price - margin_price(weighted_avg_price, min_profit_percent, fee_percent)
}

/// Target sell price: buy price plus the margin.
///
/// Computed once at buy time from the buy price; the sell watch keeps
/// this static target rather than chasing the live weighted average.
pub fn target_sell_price(
    buy_price: Price,
    min_profit_percent: Decimal,
    fee_percent: Decimal,
) -> Price {
    buy_price + margin_price(buy_price, min_profit_percent, fee_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_margin_price() {
        // 100 * (1 + 0.1) / 100 = 1.10
        let margin = margin_price(Price::new(dec!(100)), dec!(1), dec!(0.1));
        assert_eq!(margin.inner(), dec!(1.10));
    }

    #[test]
    fn test_target_buy_price() {
        // 100 - 1.10 = 98.90
        let target = target_buy_price(Price::new(dec!(100)), dec!(1), dec!(0.1));
        assert_eq!(target.inner(), dec!(98.90));
    }

    #[test]
    fn test_target_sell_price() {
        // 98.90 + 98.90 * 1.1 / 100 = 98.90 + 1.0879 = 99.9879
        let target = target_sell_price(Price::new(dec!(98.90)), dec!(1), dec!(0.1));
        assert_eq!(target.inner(), dec!(99.9879));
    }

    #[test]
    fn test_margin_rounds_to_eight_digits() {
        let margin = margin_price(Price::new(dec!(0.000123456789)), dec!(1), dec!(0.1));
        assert!(margin.inner().scale() <= PRICE_SCALE);
    }

    #[test]
    fn test_zero_fee_only_profit() {
        let margin = margin_price(Price::new(dec!(100)), dec!(1), dec!(0));
        assert_eq!(margin.inner(), dec!(1));
    }
}
