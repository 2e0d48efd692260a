//! Periodic sell-side resubscription sweep.

use crate::matcher::ExecutionMatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Re-arms sell watches for open trades at a fixed interval.
///
/// Each pass loads the open trades and installs a watch for every
/// symbol without a live subscription. Passes are idempotent, so the
/// interval only bounds how long a dropped subscription stays dark.
pub struct SellSweep {
    matcher: Arc<ExecutionMatcher>,
    interval: Duration,
}

impl SellSweep {
    pub fn new(matcher: Arc<ExecutionMatcher>, interval: Duration) -> Self {
        Self { matcher, interval }
    }

    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = self.interval.as_millis() as u64, "sell sweep started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("sell sweep stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match self.matcher.sweep_open_trades() {
                        Ok(installed) if installed > 0 => {
                            info!(installed, "sell watches re-armed");
                        }
                        Ok(_) => debug!("sell sweep pass complete"),
                        Err(err) => warn!(error = %err, "sell sweep pass failed"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::alert_channel;
    use rust_decimal_macros::dec;
    use spotbot_core::{InstrumentFilters, Price, Quantity, Symbol, Trade};
    use spotbot_filters::{FilterCache, FilterValidator};
    use spotbot_gateway::{
        DynExchangeGateway, DynTradeStore, MemoryTradeStore, MockGateway, TradeStore,
    };
    use spotbot_registry::SubscriptionRegistry;
    use spotbot_strategy::StrategyLimits;

    fn build(gateway: &Arc<MockGateway>, store: &Arc<MemoryTradeStore>) -> Arc<ExecutionMatcher> {
        let cache = Arc::new(FilterCache::new());
        cache.insert(
            Symbol::new("ETHBTC"),
            InstrumentFilters {
                tick_size: Price::new(dec!(0.01)),
                step_size: Quantity::new(dec!(0.001)),
                min_qty: Quantity::new(dec!(0.001)),
                max_qty: Quantity::new(dec!(100000)),
                min_notional: dec!(10),
            },
        );
        let (tx, _rx) = alert_channel();
        ExecutionMatcher::new(
            Arc::clone(gateway) as DynExchangeGateway,
            Arc::clone(store) as DynTradeStore,
            FilterValidator::new(cache),
            Arc::new(SubscriptionRegistry::new()),
            tx,
            StrategyLimits {
                trading_limit_per_pair: dec!(50),
                max_open_trades: 10,
                min_profit_percent: dec!(1),
                exchange_fee_percent: dec!(0.1),
            },
            10,
        )
    }

    #[tokio::test]
    async fn test_run_sweeps_until_cancelled() {
        let gateway = Arc::new(MockGateway::new());
        let store = Arc::new(MemoryTradeStore::new());
        let matcher = build(&gateway, &store);

        let trade = Trade::open(
            Symbol::new("ETHBTC"),
            Quantity::new(dec!(0.505)),
            Price::new(dec!(98.50)),
            Price::new(dec!(99.58)),
        );
        store.save_trade(&trade).unwrap();

        let cancel = CancellationToken::new();
        let sweep = SellSweep::new(Arc::clone(&matcher), Duration::from_millis(10));
        let task = tokio::spawn(sweep.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matcher.registry().contains("ETHBTC"));
        assert_eq!(gateway.subscribed_symbols().len(), 1);

        cancel.cancel();
        task.await.unwrap();
        // One sell watch, never duplicated across passes.
        assert_eq!(gateway.subscribed_symbols().len(), 1);
    }
}
