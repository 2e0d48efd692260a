//! Trade lifecycle store interface.

use crate::error::StoreError;
use spotbot_core::{Trade, TradeId};
use std::sync::Arc;

/// Durable record of each trade and the bot's key-value settings.
///
/// Trades are upserted by identifier and never deleted. The store
/// provides read-your-writes consistency for a single trade id; no
/// cross-trade transactions are required by the engine.
pub trait TradeStore: Send + Sync {
    /// Insert or update a trade by its identifier.
    fn save_trade(&self, trade: &Trade) -> Result<(), StoreError>;

    /// All trades currently in the bought state.
    fn get_open_trades(&self) -> Result<Vec<Trade>, StoreError>;

    /// Lookup by identifier.
    fn get_trade_by_id(&self, id: &TradeId) -> Result<Option<Trade>, StoreError>;

    /// Raw setting value for a key, if present.
    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Arc wrapper for store trait objects.
pub type DynTradeStore = Arc<dyn TradeStore>;
