//! 24-hour rolling statistics per trading pair.

use crate::{Price, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One pair's market snapshot entry for a ranking cycle.
///
/// Produced once per cycle from the exchange's 24h ticker data and
/// read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStats {
    /// Trading pair symbol.
    pub symbol: Symbol,
    /// Last traded price.
    pub last_price: Price,
    /// Current best ask.
    pub ask_price: Price,
    /// Current best bid.
    pub bid_price: Price,
    /// Volume-weighted average price over the rolling window.
    pub weighted_avg_price: Price,
    /// Percentage price change over the window.
    pub price_change_percent: Decimal,
    /// Quote-currency volume over the window.
    pub quote_volume: Decimal,
}

impl PairStats {
    /// Whether the snapshot carries usable prices.
    pub fn has_prices(&self) -> bool {
        self.ask_price.is_positive() && self.weighted_avg_price.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_has_prices() {
        let stats = PairStats {
            symbol: Symbol::new("ETHBTC"),
            last_price: Price::new(dec!(0.05)),
            ask_price: Price::new(dec!(0.0501)),
            bid_price: Price::new(dec!(0.0499)),
            weighted_avg_price: Price::new(dec!(0.0502)),
            price_change_percent: dec!(-3.2),
            quote_volume: dec!(410),
        };
        assert!(stats.has_prices());

        let empty = PairStats {
            ask_price: Price::ZERO,
            ..stats
        };
        assert!(!empty.has_prices());
    }
}
