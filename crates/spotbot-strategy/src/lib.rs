//! Pair ranking strategies.
//!
//! Selects at most one candidate pair to buy from a snapshot of
//! 24-hour statistics, behind a named-strategy seam so alternative
//! rankings can be added without touching the matcher.

pub mod error;
pub mod pricing;
pub mod smart;

pub use error::{StrategyError, StrategyResult};
pub use smart::{SmartStrategy, SmartStrategyConfig};

use spotbot_core::{PairStats, Price, Quantity, Symbol};
use spotbot_filters::FilterValidator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Trading limits every strategy selects under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLimits {
    /// Quote-currency budget per trade.
    pub trading_limit_per_pair: Decimal,
    /// Maximum number of trades in the bought state.
    pub max_open_trades: usize,
    /// Minimum profit target in percent.
    pub min_profit_percent: Decimal,
    /// Exchange trading fee in percent.
    pub exchange_fee_percent: Decimal,
}

/// A selected pair with its target entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: Symbol,
    /// Target buy price the order-book watch matches against.
    pub target_buy_price: Price,
    /// Quantity accepted by the filter validator at selection time.
    pub quantity: Quantity,
}

/// Pair selection strategy.
///
/// Implementations must be deterministic: identical snapshot input
/// yields the identical candidate.
pub trait PairStrategy: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Select at most one candidate from a ranking-cycle snapshot.
    fn select(
        &self,
        stats: &[PairStats],
        open_symbols: &HashSet<Symbol>,
        limits: &StrategyLimits,
        validator: &FilterValidator,
    ) -> Option<Candidate>;
}

/// Named strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Smart,
}

impl StrategyKind {
    /// Construct the strategy behind the name.
    pub fn build(self, config: SmartStrategyConfig) -> Box<dyn PairStrategy> {
        match self {
            Self::Smart => Box::new(SmartStrategy::new(config)),
        }
    }
}
