//! Engine alerts raised by the matcher.

use spotbot_core::Trade;
use spotbot_gateway::StoreError;
use tokio::sync::mpsc;

/// Out-of-band notifications the application loop reacts to.
#[derive(Debug, Clone)]
pub enum EngineAlert {
    /// A buy order filled and the trade was recorded as open.
    TradeOpened { trade: Trade },
    /// A sell order filled and the trade was recorded as sold.
    TradeClosed { trade: Trade },
    /// An order filled but the trade could not be persisted.
    ///
    /// The exchange position and the ledger now disagree; this needs
    /// operator attention and must never be dropped silently.
    PersistenceFailure { trade: Trade, error: StoreError },
}

pub type AlertSender = mpsc::UnboundedSender<EngineAlert>;
pub type AlertReceiver = mpsc::UnboundedReceiver<EngineAlert>;

/// Create the alert channel wiring the matcher to the application loop.
pub fn alert_channel() -> (AlertSender, AlertReceiver) {
    mpsc::unbounded_channel()
}
