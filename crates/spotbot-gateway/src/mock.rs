//! Hand-rolled collaborator doubles.
//!
//! Used by matcher and application tests across the workspace: the
//! gateway records placements and lets tests drive order-book
//! snapshots into subscription callbacks; the store is an in-memory
//! ledger with a scriptable write-failure switch.

use crate::error::{GatewayError, StoreError};
use crate::exchange::{
    AssetBalance, BalanceCallback, ExchangeGateway, OrderBookCallback, OrderFill,
    OrderUpdateCallback, SubscriptionHandle,
};
use crate::store::TradeStore;
use parking_lot::Mutex;
use spotbot_core::{
    InstrumentFilters, OrderBookSnapshot, OrderSide, PairStats, Price, Quantity, Symbol,
    TimeInForce, Trade, TradeId, TradeState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A recorded order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Quantity,
    pub price: Price,
    pub time_in_force: TimeInForce,
}

struct BookSubscription {
    symbol: Symbol,
    on_update: OrderBookCallback,
}

/// Scriptable in-memory exchange gateway.
#[derive(Default)]
pub struct MockGateway {
    next_handle: AtomicU64,
    balances: Mutex<Vec<AssetBalance>>,
    stats: Mutex<Vec<PairStats>>,
    filters: Mutex<HashMap<Symbol, InstrumentFilters>>,
    book_subs: Mutex<HashMap<u64, BookSubscription>>,
    account_sub: Mutex<Option<(BalanceCallback, OrderUpdateCallback)>>,
    placed: Mutex<Vec<PlacedOrder>>,
    released: Mutex<Vec<SubscriptionHandle>>,
    next_order_error: Mutex<Option<GatewayError>>,
    fail_subscriptions: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balances(&self, balances: Vec<AssetBalance>) {
        *self.balances.lock() = balances;
    }

    pub fn set_stats(&self, stats: Vec<PairStats>) {
        *self.stats.lock() = stats;
    }

    pub fn set_filters(&self, symbol: Symbol, filters: InstrumentFilters) {
        self.filters.lock().insert(symbol, filters);
    }

    /// Fail the next `place_limit_order` call with `err`.
    pub fn fail_next_order(&self, err: GatewayError) {
        *self.next_order_error.lock() = Some(err);
    }

    /// Make every subscription attempt fail.
    pub fn set_fail_subscriptions(&self, fail: bool) {
        self.fail_subscriptions.store(fail, Ordering::SeqCst);
    }

    /// Deliver a snapshot to every live subscription for its symbol.
    ///
    /// Returns the number of callbacks invoked.
    pub fn push_order_book(&self, snapshot: OrderBookSnapshot) -> usize {
        let callbacks: Vec<OrderBookCallback> = {
            let subs = self.book_subs.lock();
            subs.values()
                .filter(|s| s.symbol == snapshot.symbol)
                .map(|s| s.on_update.clone())
                .collect()
        };
        for cb in &callbacks {
            cb(snapshot.clone());
        }
        callbacks.len()
    }

    /// Deliver a balance update on the account stream, if subscribed.
    pub fn push_balances(&self, balances: Vec<AssetBalance>) -> bool {
        let cb = self
            .account_sub
            .lock()
            .as_ref()
            .map(|(on_balance, _)| on_balance.clone());
        match cb {
            Some(on_balance) => {
                on_balance(balances);
                true
            }
            None => false,
        }
    }

    pub fn placed_orders(&self) -> Vec<PlacedOrder> {
        self.placed.lock().clone()
    }

    pub fn released_handles(&self) -> Vec<SubscriptionHandle> {
        self.released.lock().clone()
    }

    pub fn subscribed_symbols(&self) -> Vec<Symbol> {
        self.book_subs
            .lock()
            .values()
            .map(|s| s.symbol.clone())
            .collect()
    }

    fn allocate_handle(&self) -> SubscriptionHandle {
        SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ExchangeGateway for MockGateway {
    fn get_account_balances(&self) -> Result<Vec<AssetBalance>, GatewayError> {
        Ok(self.balances.lock().clone())
    }

    fn get_all_symbol_stats(&self) -> Result<Vec<PairStats>, GatewayError> {
        Ok(self.stats.lock().clone())
    }

    fn get_symbol_filters(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<InstrumentFilters>, GatewayError> {
        Ok(self.filters.lock().get(symbol).cloned())
    }

    fn subscribe_order_book(
        &self,
        symbol: &Symbol,
        _depth: usize,
        on_update: OrderBookCallback,
    ) -> Result<SubscriptionHandle, GatewayError> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            return Err(GatewayError::SubscriptionFailed(symbol.to_string()));
        }
        let handle = self.allocate_handle();
        self.book_subs.lock().insert(
            handle.id(),
            BookSubscription {
                symbol: symbol.clone(),
                on_update,
            },
        );
        Ok(handle)
    }

    fn subscribe_account_stream(
        &self,
        on_balance: BalanceCallback,
        on_order: OrderUpdateCallback,
    ) -> Result<SubscriptionHandle, GatewayError> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            return Err(GatewayError::SubscriptionFailed("account".to_string()));
        }
        *self.account_sub.lock() = Some((on_balance, on_order));
        Ok(self.allocate_handle())
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), GatewayError> {
        self.book_subs.lock().remove(&handle.id());
        self.released.lock().push(handle);
        Ok(())
    }

    fn place_limit_order(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        time_in_force: TimeInForce,
    ) -> Result<OrderFill, GatewayError> {
        if let Some(err) = self.next_order_error.lock().take() {
            return Err(err);
        }
        self.placed.lock().push(PlacedOrder {
            symbol: symbol.clone(),
            side,
            quantity,
            price,
            time_in_force,
        });
        Ok(OrderFill {
            symbol: symbol.clone(),
            side,
            price,
            quantity,
        })
    }
}

/// In-memory trade ledger and settings map.
#[derive(Default)]
pub struct MemoryTradeStore {
    trades: Mutex<HashMap<TradeId, Trade>>,
    settings: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_setting(&self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.lock().insert(key.into(), value.into());
    }

    /// Make subsequent `save_trade` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn trade_count(&self) -> usize {
        self.trades.lock().len()
    }
}

impl TradeStore for MemoryTradeStore {
    fn save_trade(&self, trade: &Trade) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("simulated write failure".into()));
        }
        self.trades.lock().insert(trade.id, trade.clone());
        Ok(())
    }

    fn get_open_trades(&self) -> Result<Vec<Trade>, StoreError> {
        let mut open: Vec<Trade> = self
            .trades
            .lock()
            .values()
            .filter(|t| t.state == TradeState::Bought)
            .cloned()
            .collect();
        // Deterministic iteration for sweeps and tests.
        open.sort_by(|a, b| a.buy_time.cmp(&b.buy_time));
        Ok(open)
    }

    fn get_trade_by_id(&self, id: &TradeId) -> Result<Option<Trade>, StoreError> {
        Ok(self.trades.lock().get(id).cloned())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.settings.lock().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spotbot_core::OrderBookLevel;
    use std::sync::Arc;

    #[test]
    fn test_push_order_book_reaches_subscriber() {
        let gateway = MockGateway::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);

        let handle = gateway
            .subscribe_order_book(
                &Symbol::new("ETHBTC"),
                10,
                Arc::new(move |snapshot| seen_cb.lock().push(snapshot)),
            )
            .unwrap();

        let snapshot = OrderBookSnapshot::new(
            Symbol::new("ETHBTC"),
            vec![],
            vec![OrderBookLevel::new(
                Price::new(dec!(98.50)),
                Quantity::new(dec!(1)),
            )],
        );
        assert_eq!(gateway.push_order_book(snapshot), 1);
        assert_eq!(seen.lock().len(), 1);

        gateway.unsubscribe(handle).unwrap();
        let other = OrderBookSnapshot::new(Symbol::new("ETHBTC"), vec![], vec![]);
        assert_eq!(gateway.push_order_book(other), 0);
    }

    #[test]
    fn test_place_order_records_and_scripted_failure() {
        let gateway = MockGateway::new();
        let symbol = Symbol::new("ETHBTC");

        gateway
            .place_limit_order(
                &symbol,
                OrderSide::Buy,
                Quantity::new(dec!(0.505)),
                Price::new(dec!(98.50)),
                TimeInForce::GoodTilCancelled,
            )
            .unwrap();
        assert_eq!(gateway.placed_orders().len(), 1);

        gateway.fail_next_order(GatewayError::Network("down".into()));
        let err = gateway
            .place_limit_order(
                &symbol,
                OrderSide::Buy,
                Quantity::new(dec!(0.505)),
                Price::new(dec!(98.50)),
                TimeInForce::GoodTilCancelled,
            )
            .unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
        // Failure consumed; next call succeeds.
        assert!(gateway
            .place_limit_order(
                &symbol,
                OrderSide::Buy,
                Quantity::new(dec!(0.505)),
                Price::new(dec!(98.50)),
                TimeInForce::GoodTilCancelled,
            )
            .is_ok());
    }

    #[test]
    fn test_store_upsert_and_open_trades() {
        let store = MemoryTradeStore::new();
        let mut trade = Trade::open(
            Symbol::new("ETHBTC"),
            Quantity::new(dec!(0.505)),
            Price::new(dec!(98.50)),
            Price::new(dec!(99.58)),
        );

        store.save_trade(&trade).unwrap();
        assert_eq!(store.get_open_trades().unwrap().len(), 1);

        trade.close_sold(Price::new(dec!(99.60))).unwrap();
        store.save_trade(&trade).unwrap();

        assert_eq!(store.trade_count(), 1);
        assert!(store.get_open_trades().unwrap().is_empty());
        let fetched = store.get_trade_by_id(&trade.id).unwrap().unwrap();
        assert_eq!(fetched.state, TradeState::Sold);
    }

    #[test]
    fn test_store_scripted_write_failure() {
        let store = MemoryTradeStore::new();
        store.set_fail_writes(true);

        let trade = Trade::open(
            Symbol::new("ETHBTC"),
            Quantity::new(dec!(0.505)),
            Price::new(dec!(98.50)),
            Price::new(dec!(99.58)),
        );
        assert!(store.save_trade(&trade).is_err());
        assert_eq!(store.trade_count(), 0);
    }

    #[test]
    fn test_settings_roundtrip() {
        let store = MemoryTradeStore::new();
        assert_eq!(store.get_setting("TradingLimitPerPair").unwrap(), None);

        store.set_setting("TradingLimitPerPair", "50");
        assert_eq!(
            store.get_setting("TradingLimitPerPair").unwrap().as_deref(),
            Some("50")
        );
    }
}
