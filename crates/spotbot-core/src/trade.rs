//! The persisted trade lifecycle entity.
//!
//! A `Trade` is created only on a successful buy-order placement and is
//! mutated to `Sold` or `Cancelled` exactly once. Records are never
//! deleted; the store is an append/update-only ledger.

use crate::error::{CoreError, Result};
use crate::{Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique trade identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted lifecycle states.
///
/// A selected-but-unfilled candidate is transient and never stored, so
/// there is no pending variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeState {
    /// Open: bought, eligible for sell matching.
    Bought,
    /// Closed with a sell fill. Terminal.
    Sold,
    /// Closed without a sell. Terminal.
    Cancelled,
}

impl TradeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sold | Self::Cancelled)
    }
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bought => write!(f, "bought"),
            Self::Sold => write!(f, "sold"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One trade, from buy fill to close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub buy_price: Price,
    /// Quote-currency value of the buy (quantity * buy price).
    pub buy_notional: Decimal,
    pub buy_time: DateTime<Utc>,
    /// Static sell target computed from the buy price at buy time.
    pub expected_sell_price: Price,
    pub sell_price: Option<Price>,
    pub sell_notional: Option<Decimal>,
    pub sell_time: Option<DateTime<Utc>>,
    pub state: TradeState,
}

impl Trade {
    /// Create an open trade from a filled buy order.
    pub fn open(
        symbol: Symbol,
        quantity: Quantity,
        buy_price: Price,
        expected_sell_price: Price,
    ) -> Self {
        Self {
            id: TradeId::new(),
            symbol,
            quantity,
            buy_price,
            buy_notional: quantity.notional(buy_price),
            buy_time: Utc::now(),
            expected_sell_price,
            sell_price: None,
            sell_notional: None,
            sell_time: None,
            state: TradeState::Bought,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == TradeState::Bought
    }

    /// Transition `Bought -> Sold`, recording the sell fill.
    pub fn close_sold(&mut self, sell_price: Price) -> Result<()> {
        if self.state != TradeState::Bought {
            return Err(CoreError::InvalidTransition {
                from: self.state,
                to: TradeState::Sold,
            });
        }
        self.sell_price = Some(sell_price);
        self.sell_notional = Some(self.quantity.notional(sell_price));
        self.sell_time = Some(Utc::now());
        self.state = TradeState::Sold;
        Ok(())
    }

    /// Transition `Bought -> Cancelled`.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != TradeState::Bought {
            return Err(CoreError::InvalidTransition {
                from: self.state,
                to: TradeState::Cancelled,
            });
        }
        self.state = TradeState::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_trade() -> Trade {
        Trade::open(
            Symbol::new("ETHBTC"),
            Quantity::new(dec!(0.505)),
            Price::new(dec!(98.90)),
            Price::new(dec!(99.9879)),
        )
    }

    #[test]
    fn test_open_trade_fields() {
        let trade = open_trade();
        assert_eq!(trade.state, TradeState::Bought);
        assert!(trade.is_open());
        assert_eq!(trade.buy_notional, dec!(49.94450));
        assert!(trade.sell_price.is_none());
        assert!(trade.sell_time.is_none());
    }

    #[test]
    fn test_close_sold() {
        let mut trade = open_trade();
        trade.close_sold(Price::new(dec!(100.0))).unwrap();

        assert_eq!(trade.state, TradeState::Sold);
        assert_eq!(trade.sell_price, Some(Price::new(dec!(100.0))));
        assert_eq!(trade.sell_notional, Some(dec!(50.5000)));
        assert!(trade.sell_time.is_some());
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let mut trade = open_trade();
        trade.close_sold(Price::new(dec!(100.0))).unwrap();

        assert!(trade.close_sold(Price::new(dec!(101.0))).is_err());
        assert!(trade.cancel().is_err());
    }

    #[test]
    fn test_cancel() {
        let mut trade = open_trade();
        trade.cancel().unwrap();
        assert_eq!(trade.state, TradeState::Cancelled);
        assert!(trade.state.is_terminal());
    }

    #[test]
    fn test_trade_ids_unique() {
        assert_ne!(open_trade().id, open_trade().id);
    }

    #[test]
    fn test_trade_serde_round_trip() {
        let trade = open_trade();
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"bought\""));

        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}
