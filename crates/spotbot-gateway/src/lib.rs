//! External collaborator interfaces.
//!
//! The engine core is a pure logic layer: market data, order
//! placement, and trade persistence all go through the traits here.
//! The mock implementations are the test doubles used across the
//! workspace.

pub mod error;
pub mod exchange;
pub mod mock;
pub mod store;

pub use error::{GatewayError, StoreError};
pub use exchange::{
    AssetBalance, BalanceCallback, DynExchangeGateway, ExchangeGateway, OrderBookCallback,
    OrderFill, OrderUpdateCallback, OrderUpdateEvent, SubscriptionHandle,
};
pub use mock::{MemoryTradeStore, MockGateway, PlacedOrder};
pub use store::{DynTradeStore, TradeStore};
