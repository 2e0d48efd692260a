//! Main application orchestration.
//!
//! Coordinates all components:
//! - instrument filter cache fed from the gateway
//! - pair selection strategy and the buy cycle
//! - execution matcher and the sell sweep task
//! - account stream events and engine alerts
//! - graceful shutdown draining every subscription

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::settings::EngineSettings;
use rust_decimal::Decimal;
use spotbot_core::Symbol;
use spotbot_filters::{FilterCache, FilterValidator};
use spotbot_gateway::{
    AssetBalance, BalanceCallback, DynExchangeGateway, DynTradeStore, OrderUpdateCallback,
    OrderUpdateEvent, SubscriptionHandle,
};
use spotbot_matcher::{alert::alert_channel, AlertReceiver, EngineAlert, ExecutionMatcher, SellSweep};
use spotbot_registry::{SubscriptionRegistry, ACCOUNT_STREAM_KEY};
use spotbot_strategy::{PairStrategy, StrategyKind, StrategyLimits};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Events delivered by the account stream.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    BalanceUpdate(Vec<AssetBalance>),
    OrderUpdate(OrderUpdateEvent),
}

/// Main application.
pub struct Application {
    config: AppConfig,
    settings: EngineSettings,
    limits: StrategyLimits,
    gateway: DynExchangeGateway,
    store: DynTradeStore,
    cache: Arc<FilterCache>,
    validator: FilterValidator,
    registry: Arc<SubscriptionRegistry<SubscriptionHandle>>,
    matcher: Arc<ExecutionMatcher>,
    strategy: Box<dyn PairStrategy>,
    alerts: Option<AlertReceiver>,
}

impl Application {
    /// Build the engine around the given collaborators.
    ///
    /// Fails fast on missing or malformed trading settings, before any
    /// subscription is opened.
    pub fn new(
        config: AppConfig,
        gateway: DynExchangeGateway,
        store: DynTradeStore,
    ) -> AppResult<Self> {
        let settings = EngineSettings::load(store.as_ref())?;
        let smart_config = settings.smart_config();
        smart_config.validate()?;

        let limits = settings.strategy_limits();
        let cache = Arc::new(FilterCache::new());
        let validator = FilterValidator::new(Arc::clone(&cache));
        let registry = Arc::new(SubscriptionRegistry::new());
        let (alert_tx, alert_rx) = alert_channel();
        let matcher = ExecutionMatcher::new(
            Arc::clone(&gateway),
            Arc::clone(&store),
            validator.clone(),
            Arc::clone(&registry),
            alert_tx,
            limits.clone(),
            config.order_book_depth,
        );
        let strategy = StrategyKind::Smart.build(smart_config);

        Ok(Self {
            config,
            settings,
            limits,
            gateway,
            store,
            cache,
            validator,
            registry,
            matcher,
            strategy,
            alerts: Some(alert_rx),
        })
    }

    /// Run the engine until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) -> AppResult<()> {
        let Some(mut alerts) = self.alerts.take() else {
            return Err(AppError::Config("application already running".to_string()));
        };

        self.refresh_filters()?;

        // Account stream: balances and order updates feed the event loop.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<EngineEvent>();
        let balance_tx = event_tx.clone();
        let on_balance: BalanceCallback = Arc::new(move |balances| {
            let _ = balance_tx.send(EngineEvent::BalanceUpdate(balances));
        });
        let order_tx = event_tx;
        let on_order: OrderUpdateCallback = Arc::new(move |event| {
            let _ = order_tx.send(EngineEvent::OrderUpdate(event));
        });
        let account_handle = self.gateway.subscribe_account_stream(on_balance, on_order)?;
        if !self.registry.try_add(ACCOUNT_STREAM_KEY, account_handle) {
            self.gateway.unsubscribe(account_handle)?;
            return Err(AppError::Config(
                "account stream key already registered".to_string(),
            ));
        }

        // Restore sell watches for trades left open by a previous run.
        let restored = self.matcher.sweep_open_trades()?;
        if restored > 0 {
            info!(restored, "sell watches restored from open trades");
        }

        let sweep = SellSweep::new(
            Arc::clone(&self.matcher),
            Duration::from_millis(self.config.sweep_interval_ms),
        );
        let sweep_task = tokio::spawn(sweep.run(cancel.child_token()));

        // Kick off a first buy cycle from the current balances.
        match self.gateway.get_account_balances() {
            Ok(balances) => self.run_buy_cycle(&balances),
            Err(err) => warn!(error = %err, "failed to fetch initial balances"),
        }

        info!("Entering main event loop");
        loop {
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    match event {
                        EngineEvent::BalanceUpdate(balances) => self.run_buy_cycle(&balances),
                        EngineEvent::OrderUpdate(update) => {
                            debug!(symbol = %update.symbol, status = %update.status, "order update");
                        }
                    }
                }
                Some(alert) = alerts.recv() => {
                    self.handle_alert(alert);
                }
                _ = cancel.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        if let Err(err) = sweep_task.await {
            warn!(error = %err, "sell sweep task ended abnormally");
        }
        self.shutdown();
        Ok(())
    }

    /// One strategy pass: stats, selection, buy watch.
    ///
    /// Skipped entirely when the free base-currency balance cannot
    /// fund a new trade; open trades keep trading regardless.
    ///
    /// Gateway calls here are synchronous and run on the event-loop
    /// task. That is fine for an in-process gateway; a network-backed
    /// implementation should be wrapped in `spawn_blocking` so a slow
    /// request cannot stall alert and shutdown handling.
    fn run_buy_cycle(&self, balances: &[AssetBalance]) {
        let free = balances
            .iter()
            .find(|b| b.asset == self.settings.base_currency)
            .map(|b| b.free)
            .unwrap_or(Decimal::ZERO);
        if free < self.settings.trading_limit_per_pair {
            info!(
                free = %free,
                required = %self.settings.trading_limit_per_pair,
                currency = %self.settings.base_currency,
                "insufficient balance for a new trade"
            );
            return;
        }

        let stats = match self.gateway.get_all_symbol_stats() {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "failed to fetch pair statistics");
                return;
            }
        };
        let quoted: Vec<_> = stats
            .into_iter()
            .filter(|s| s.symbol.is_quoted_in(&self.settings.base_currency))
            .collect();

        let open_symbols = match self.open_symbols() {
            Ok(symbols) => symbols,
            Err(err) => {
                warn!(error = %err, "failed to load open trades");
                return;
            }
        };

        let Some(candidate) =
            self.strategy
                .select(&quoted, &open_symbols, &self.limits, &self.validator)
        else {
            debug!(pairs = quoted.len(), "no pair selected this pass");
            return;
        };
        info!(
            symbol = %candidate.symbol,
            target = %candidate.target_buy_price,
            strategy = self.strategy.name(),
            "pair selected"
        );
        if let Err(err) = self.matcher.watch_buy(&candidate) {
            warn!(symbol = %candidate.symbol, error = %err, "failed to install buy watch");
        }
    }

    fn handle_alert(&self, alert: EngineAlert) {
        match alert {
            EngineAlert::TradeOpened { trade } => {
                info!(
                    trade_id = %trade.id,
                    symbol = %trade.symbol,
                    notional = %trade.buy_notional,
                    "trade opened"
                );
                // Arm the sell watch right away instead of waiting for
                // the next interval pass.
                if let Err(err) = self.matcher.sweep_open_trades() {
                    warn!(error = %err, "post-buy sweep failed");
                }
            }
            EngineAlert::TradeClosed { trade } => {
                let profit = trade
                    .sell_notional
                    .map(|sold| sold - trade.buy_notional);
                info!(
                    trade_id = %trade.id,
                    symbol = %trade.symbol,
                    profit = ?profit,
                    "trade closed"
                );
            }
            EngineAlert::PersistenceFailure { trade, error } => {
                error!(
                    trade_id = %trade.id,
                    symbol = %trade.symbol,
                    state = %trade.state,
                    error = %error,
                    "trade persistence failed after a filled order"
                );
            }
        }
    }

    /// Load instrument filters for every pair in the base currency.
    fn refresh_filters(&self) -> AppResult<usize> {
        let stats = self.gateway.get_all_symbol_stats()?;
        let mut loaded = 0;
        for pair in &stats {
            if !pair.symbol.is_quoted_in(&self.settings.base_currency) {
                continue;
            }
            if let Some(filters) = self.gateway.get_symbol_filters(&pair.symbol)? {
                self.cache.insert(pair.symbol.clone(), filters);
                loaded += 1;
            }
        }
        info!(loaded, "instrument filters loaded");
        Ok(loaded)
    }

    fn open_symbols(&self) -> AppResult<HashSet<Symbol>> {
        let open = self.store.get_open_trades()?;
        Ok(open.into_iter().map(|t| t.symbol).collect())
    }

    fn shutdown(&self) {
        let handles = self.registry.remove_all();
        info!(count = handles.len(), "releasing subscriptions");
        for handle in handles {
            if let Err(err) = self.gateway.unsubscribe(handle) {
                warn!(handle = %handle, error = %err, "failed to release subscription during shutdown");
            }
        }
    }
}
