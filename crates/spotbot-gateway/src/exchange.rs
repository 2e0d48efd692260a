//! Exchange gateway interface.
//!
//! Wraps all exchange connectivity behind a trait: REST-style queries,
//! streaming subscriptions, and order placement. Stream callbacks are
//! invoked on gateway-owned execution contexts, ordered per symbol.

use crate::error::GatewayError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotbot_core::{
    InstrumentFilters, OrderBookSnapshot, OrderSide, PairStats, Price, Quantity, Symbol,
    TimeInForce,
};
use std::fmt;
use std::sync::Arc;

/// Opaque handle for a live stream subscription.
///
/// Owned by the subscription registry once registered; only the
/// gateway can release the underlying stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionHandle(pub u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}

/// One asset's balance on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

/// Successful limit order placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFill {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub price: Price,
    pub quantity: Quantity,
}

/// Order status change delivered on the account stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdateEvent {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub status: String,
}

/// Callback for order-book snapshots.
pub type OrderBookCallback = Arc<dyn Fn(OrderBookSnapshot) + Send + Sync>;

/// Callback for account balance updates.
pub type BalanceCallback = Arc<dyn Fn(Vec<AssetBalance>) + Send + Sync>;

/// Callback for order status updates.
pub type OrderUpdateCallback = Arc<dyn Fn(OrderUpdateEvent) + Send + Sync>;

/// Exchange connectivity seam.
///
/// Implementations own transports, authentication, and decoding; the
/// engine sees typed data only. `place_limit_order` may block on
/// network I/O, so callers must not hold engine locks across it.
pub trait ExchangeGateway: Send + Sync {
    /// Current account balances.
    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, GatewayError>;

    /// 24h statistics for every symbol.
    fn get_all_symbol_stats(&self) -> Result<Vec<PairStats>, GatewayError>;

    /// Filter metadata for one symbol; `None` when the exchange does
    /// not list it.
    fn get_symbol_filters(&self, symbol: &Symbol)
        -> Result<Option<InstrumentFilters>, GatewayError>;

    /// Subscribe to a symbol's partial book depth stream.
    fn subscribe_order_book(
        &self,
        symbol: &Symbol,
        depth: usize,
        on_update: OrderBookCallback,
    ) -> Result<SubscriptionHandle, GatewayError>;

    /// Subscribe to the account/user-data stream.
    fn subscribe_account_stream(
        &self,
        on_balance: BalanceCallback,
        on_order: OrderUpdateCallback,
    ) -> Result<SubscriptionHandle, GatewayError>;

    /// Release a live subscription.
    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), GatewayError>;

    /// Place a limit order.
    fn place_limit_order(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        time_in_force: TimeInForce,
    ) -> Result<OrderFill, GatewayError>;
}

/// Arc wrapper for gateway trait objects.
pub type DynExchangeGateway = Arc<dyn ExchangeGateway>;
