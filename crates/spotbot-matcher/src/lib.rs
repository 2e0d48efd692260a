//! Order-book execution matching.
//!
//! Once the strategy has picked a pair, this crate owns the rest of
//! the trade's life: it watches the live order book for a level that
//! satisfies the watch target, wins the right to act through the
//! subscription registry, places the limit order, and records the
//! resulting trade. A periodic sweep re-arms sell-side watches for
//! any open trade that lost its subscription.

pub mod alert;
pub mod error;
pub mod matcher;
pub mod sweep;
pub mod watch;

pub use alert::{AlertReceiver, AlertSender, EngineAlert};
pub use error::{MatcherError, MatcherResult};
pub use matcher::ExecutionMatcher;
pub use sweep::SellSweep;
pub use watch::{OrderBookWatch, WatchSide, WatchState};
