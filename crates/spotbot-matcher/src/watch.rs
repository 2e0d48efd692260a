//! Per-symbol watch state.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use spotbot_core::{OrderSide, Price, Symbol, Trade};
use std::sync::Arc;

/// Lifecycle of a single order-book watch.
///
/// `Watching` is the steady state; a satisfying level moves the watch
/// to `Matched` exactly once, and every path out of `Matched` ends in
/// `Closed`. A closed watch ignores any snapshot still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Watching,
    Matched,
    Closed,
}

/// What the watch is waiting for.
#[derive(Debug, Clone)]
pub enum WatchSide {
    /// Waiting for an ask at or below `target`, to spend up to `budget`
    /// of the quote asset.
    Buy { target: Price, budget: Decimal },
    /// Waiting for a bid at or above the trade's expected sell price.
    Sell { trade: Trade },
}

impl WatchSide {
    pub fn order_side(&self) -> OrderSide {
        match self {
            WatchSide::Buy { .. } => OrderSide::Buy,
            WatchSide::Sell { .. } => OrderSide::Sell,
        }
    }

    pub fn target(&self) -> Price {
        match self {
            WatchSide::Buy { target, .. } => *target,
            WatchSide::Sell { trade } => trade.expected_sell_price,
        }
    }
}

/// A live watch shared between the matcher and its snapshot callback.
#[derive(Debug)]
pub struct OrderBookWatch {
    pub symbol: Symbol,
    pub side: WatchSide,
    state: Mutex<WatchState>,
}

impl OrderBookWatch {
    pub fn new(symbol: Symbol, side: WatchSide) -> Arc<Self> {
        Arc::new(Self {
            symbol,
            side,
            state: Mutex::new(WatchState::Watching),
        })
    }

    pub fn state(&self) -> WatchState {
        *self.state.lock()
    }

    /// `Watching -> Matched`; false if the watch already left `Watching`.
    pub fn try_match(&self) -> bool {
        let mut state = self.state.lock();
        if *state == WatchState::Watching {
            *state = WatchState::Matched;
            true
        } else {
            false
        }
    }

    pub fn close(&self) {
        *self.state.lock() = WatchState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_try_match_fires_once() {
        let watch = OrderBookWatch::new(
            Symbol::new("ETHBTC"),
            WatchSide::Buy {
                target: Price::new(dec!(98.90)),
                budget: dec!(50),
            },
        );
        assert_eq!(watch.state(), WatchState::Watching);
        assert!(watch.try_match());
        assert!(!watch.try_match());
        watch.close();
        assert_eq!(watch.state(), WatchState::Closed);
        assert!(!watch.try_match());
    }

    #[test]
    fn test_side_target_and_order_side() {
        let side = WatchSide::Buy {
            target: Price::new(dec!(98.90)),
            budget: dec!(50),
        };
        assert_eq!(side.order_side(), OrderSide::Buy);
        assert_eq!(side.target(), Price::new(dec!(98.90)));
    }
}
