//! Execution matcher: from live order-book snapshots to filled trades.

use crate::alert::{AlertSender, EngineAlert};
use crate::error::MatcherResult;
use crate::watch::{OrderBookWatch, WatchSide, WatchState};
use rust_decimal::Decimal;
use spotbot_core::{OrderBookSnapshot, OrderSide, Price, Symbol, TimeInForce, Trade};
use spotbot_filters::FilterValidator;
use spotbot_gateway::{DynExchangeGateway, DynTradeStore, OrderBookCallback, SubscriptionHandle};
use spotbot_registry::SubscriptionRegistry;
use spotbot_strategy::pricing::target_sell_price;
use spotbot_strategy::{Candidate, StrategyLimits};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Matches order-book levels against watch targets and executes.
///
/// One matcher serves every watched symbol. The subscription registry
/// entry doubles as the right to act on a match: whichever snapshot
/// removes it first proceeds to place the order, everyone else backs
/// off. The gateway placement call happens after the registry lock is
/// released.
pub struct ExecutionMatcher {
    gateway: DynExchangeGateway,
    store: DynTradeStore,
    validator: FilterValidator,
    registry: Arc<SubscriptionRegistry<SubscriptionHandle>>,
    alerts: AlertSender,
    limits: StrategyLimits,
    depth: usize,
}

impl ExecutionMatcher {
    pub fn new(
        gateway: DynExchangeGateway,
        store: DynTradeStore,
        validator: FilterValidator,
        registry: Arc<SubscriptionRegistry<SubscriptionHandle>>,
        alerts: AlertSender,
        limits: StrategyLimits,
        depth: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            store,
            validator,
            registry,
            alerts,
            limits,
            depth,
        })
    }

    pub fn registry(&self) -> &SubscriptionRegistry<SubscriptionHandle> {
        &self.registry
    }

    /// Start watching the buy side for a strategy candidate.
    ///
    /// The full trading limit is re-validated at the matched price, so
    /// the candidate's advisory quantity is not carried over.
    pub fn watch_buy(self: &Arc<Self>, candidate: &Candidate) -> MatcherResult<()> {
        let watch = OrderBookWatch::new(
            candidate.symbol.clone(),
            WatchSide::Buy {
                target: candidate.target_buy_price,
                budget: self.limits.trading_limit_per_pair,
            },
        );
        info!(
            symbol = %candidate.symbol,
            target = %candidate.target_buy_price,
            "watching buy side"
        );
        self.install(watch)
    }

    /// Start watching the sell side for an open trade.
    ///
    /// A no-op for trades that are no longer open or whose symbol is
    /// already watched, so repeated sweeps are safe.
    pub fn watch_sell(self: &Arc<Self>, trade: Trade) -> MatcherResult<()> {
        if !trade.is_open() {
            debug!(trade_id = %trade.id, state = %trade.state, "skipping sell watch for non-open trade");
            return Ok(());
        }
        let symbol = trade.symbol.clone();
        let target = trade.expected_sell_price;
        let watch = OrderBookWatch::new(symbol.clone(), WatchSide::Sell { trade });
        info!(symbol = %symbol, target = %target, "watching sell side");
        self.install(watch)
    }

    /// Re-arm sell watches for open trades without a live subscription.
    ///
    /// Returns the number of watches installed. One trade's failure is
    /// logged and does not stop the pass.
    pub fn sweep_open_trades(self: &Arc<Self>) -> MatcherResult<usize> {
        let open = self.store.get_open_trades()?;
        let mut installed = 0;
        for trade in open {
            if self.registry.contains(trade.symbol.as_str()) {
                continue;
            }
            let symbol = trade.symbol.clone();
            match self.watch_sell(trade) {
                Ok(()) => installed += 1,
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "failed to re-arm sell watch");
                }
            }
        }
        Ok(installed)
    }

    /// Subscribe the book and register the handle.
    ///
    /// Subscribing before `try_add` means a lost registration race
    /// leaves a fresh handle to release, never a missing one.
    fn install(self: &Arc<Self>, watch: Arc<OrderBookWatch>) -> MatcherResult<()> {
        let this = Arc::clone(self);
        let cb_watch = Arc::clone(&watch);
        let on_update: OrderBookCallback =
            Arc::new(move |snapshot| this.on_snapshot(&cb_watch, &snapshot));
        let handle = self
            .gateway
            .subscribe_order_book(&watch.symbol, self.depth, on_update)?;
        if !self.registry.try_add(watch.symbol.as_str(), handle) {
            debug!(symbol = %watch.symbol, "symbol already watched, releasing duplicate subscription");
            watch.close();
            self.gateway.unsubscribe(handle)?;
        }
        Ok(())
    }

    fn on_snapshot(self: &Arc<Self>, watch: &Arc<OrderBookWatch>, snapshot: &OrderBookSnapshot) {
        if watch.state() != WatchState::Watching {
            return;
        }
        let level = match &watch.side {
            WatchSide::Buy { target, .. } => snapshot.lowest_ask_at_or_below(*target),
            WatchSide::Sell { trade } => snapshot.highest_bid_at_or_above(trade.expected_sell_price),
        };
        // No satisfying level is the steady state: stay watching.
        let Some(level) = level else {
            return;
        };
        let matched_price = level.price;
        // Losing the removal race is not terminal for this watch: the
        // entry may be gone because a concurrent snapshot already
        // acted (the winner closes the watch itself), or may not exist
        // yet because this snapshot arrived ahead of `install`'s
        // registration. Stay watching and let a later snapshot retry.
        let Some(handle) = self.registry.remove(watch.symbol.as_str()) else {
            return;
        };
        if let Err(err) = self.gateway.unsubscribe(handle) {
            warn!(symbol = %watch.symbol, handle = %handle, error = %err, "failed to release subscription");
        }
        if !watch.try_match() {
            return;
        }
        let result = match &watch.side {
            WatchSide::Buy { budget, .. } => {
                self.execute_buy(&watch.symbol, *budget, matched_price)
            }
            WatchSide::Sell { trade } => self.execute_sell(trade, matched_price),
        };
        watch.close();
        if let Err(err) = result {
            warn!(
                symbol = %watch.symbol,
                side = %watch.side.order_side(),
                price = %matched_price,
                error = %err,
                "watch closed without a filled order"
            );
        }
    }

    fn execute_buy(&self, symbol: &Symbol, budget: Decimal, price: Price) -> MatcherResult<()> {
        let quantity = self.validator.validate_buy(symbol, budget, price)?;
        let fill = self.gateway.place_limit_order(
            symbol,
            OrderSide::Buy,
            quantity,
            price,
            TimeInForce::GoodTilCancelled,
        )?;
        let expected_sell = target_sell_price(
            fill.price,
            self.limits.min_profit_percent,
            self.limits.exchange_fee_percent,
        );
        let trade = Trade::open(symbol.clone(), fill.quantity, fill.price, expected_sell);
        info!(
            trade_id = %trade.id,
            symbol = %symbol,
            quantity = %fill.quantity,
            price = %fill.price,
            expected_sell = %expected_sell,
            "buy order filled"
        );
        self.persist(trade, true);
        Ok(())
    }

    fn execute_sell(&self, trade: &Trade, price: Price) -> MatcherResult<()> {
        let quantity = self.validator.validate_sell(&trade.symbol, trade.quantity)?;
        let fill = self.gateway.place_limit_order(
            &trade.symbol,
            OrderSide::Sell,
            quantity,
            price,
            TimeInForce::GoodTilCancelled,
        )?;
        let mut closed = trade.clone();
        if let Err(err) = closed.close_sold(fill.price) {
            error!(trade_id = %trade.id, error = %err, "sell filled for a trade in an unexpected state");
            return Ok(());
        }
        info!(
            trade_id = %closed.id,
            symbol = %closed.symbol,
            quantity = %fill.quantity,
            price = %fill.price,
            "sell order filled"
        );
        self.persist(closed, false);
        Ok(())
    }

    fn persist(&self, trade: Trade, opened: bool) {
        match self.store.save_trade(&trade) {
            Ok(()) => {
                let alert = if opened {
                    EngineAlert::TradeOpened { trade }
                } else {
                    EngineAlert::TradeClosed { trade }
                };
                self.emit(alert);
            }
            Err(error) => {
                // The exchange holds a fill the ledger does not know
                // about. Surface it loudly.
                error!(
                    trade_id = %trade.id,
                    symbol = %trade.symbol,
                    state = %trade.state,
                    error = %error,
                    "order filled but trade could not be persisted"
                );
                self.emit(EngineAlert::PersistenceFailure { trade, error });
            }
        }
    }

    fn emit(&self, alert: EngineAlert) {
        if self.alerts.send(alert).is_err() {
            error!("alert channel closed, engine alert lost");
        }
    }
}
