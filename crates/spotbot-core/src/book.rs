//! Streamed order-book snapshot types.
//!
//! Snapshots arrive already decoded from the exchange gateway, ordered
//! per symbol. The scan helpers here drive the execution matcher.

use crate::{Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderBookLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Partial book depth snapshot for one symbol.
///
/// Bids are expected best-first (descending), asks best-first
/// (ascending); the scan helpers do not rely on that ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBookSnapshot {
    pub fn new(symbol: Symbol, bids: Vec<OrderBookLevel>, asks: Vec<OrderBookLevel>) -> Self {
        Self {
            symbol,
            bids,
            asks,
        }
    }

    /// Best (highest) bid level.
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.iter().max_by_key(|l| l.price)
    }

    /// Best (lowest) ask level.
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.iter().min_by_key(|l| l.price)
    }

    /// Lowest ask at or below the target buy price.
    ///
    /// This is the level a buy watch executes against.
    pub fn lowest_ask_at_or_below(&self, target: Price) -> Option<&OrderBookLevel> {
        self.asks
            .iter()
            .filter(|l| l.price <= target)
            .min_by_key(|l| l.price)
    }

    /// Highest bid at or above the target sell price.
    ///
    /// This is the level a sell watch executes against.
    pub fn highest_bid_at_or_above(&self, target: Price) -> Option<&OrderBookLevel> {
        self.bids
            .iter()
            .filter(|l| l.price >= target)
            .max_by_key(|l| l.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            Symbol::new("ETHBTC"),
            vec![
                OrderBookLevel::new(Price::new(dec!(99.0)), Quantity::new(dec!(1))),
                OrderBookLevel::new(Price::new(dec!(98.5)), Quantity::new(dec!(2))),
            ],
            vec![
                OrderBookLevel::new(Price::new(dec!(99.5)), Quantity::new(dec!(1))),
                OrderBookLevel::new(Price::new(dec!(100.0)), Quantity::new(dec!(3))),
            ],
        )
    }

    #[test]
    fn test_best_levels() {
        let book = snapshot();
        assert_eq!(book.best_bid().unwrap().price, Price::new(dec!(99.0)));
        assert_eq!(book.best_ask().unwrap().price, Price::new(dec!(99.5)));
    }

    #[test]
    fn test_lowest_ask_at_or_below() {
        let book = snapshot();
        let level = book.lowest_ask_at_or_below(Price::new(dec!(99.5))).unwrap();
        assert_eq!(level.price, Price::new(dec!(99.5)));

        assert!(book.lowest_ask_at_or_below(Price::new(dec!(99.0))).is_none());
    }

    #[test]
    fn test_highest_bid_at_or_above() {
        let book = snapshot();
        let level = book
            .highest_bid_at_or_above(Price::new(dec!(98.9)))
            .unwrap();
        assert_eq!(level.price, Price::new(dec!(99.0)));

        assert!(book
            .highest_bid_at_or_above(Price::new(dec!(99.1)))
            .is_none());
    }

    #[test]
    fn test_empty_book_scans() {
        let book = OrderBookSnapshot::new(Symbol::new("ETHBTC"), vec![], vec![]);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(book.lowest_ask_at_or_below(Price::new(dec!(100))).is_none());
        assert!(book
            .highest_bid_at_or_above(Price::new(dec!(0)))
            .is_none());
    }
}
