//! Per-symbol filter metadata cache.
//!
//! Filters come from exchange metadata and are immutable within one
//! refresh cycle; the cache is replaced wholesale on refresh.

use dashmap::DashMap;
use spotbot_core::{InstrumentFilters, Symbol};
use tracing::info;

/// Cache of instrument filters keyed by symbol.
#[derive(Debug, Default)]
pub struct FilterCache {
    filters: DashMap<Symbol, InstrumentFilters>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self {
            filters: DashMap::new(),
        }
    }

    /// Cached filters for `symbol`, if known.
    pub fn get(&self, symbol: &Symbol) -> Option<InstrumentFilters> {
        self.filters.get(symbol).map(|entry| entry.clone())
    }

    /// Insert or replace a single symbol's filters.
    pub fn insert(&self, symbol: Symbol, filters: InstrumentFilters) {
        self.filters.insert(symbol, filters);
    }

    /// Replace the whole cache from a fresh metadata snapshot.
    pub fn refresh(&self, entries: impl IntoIterator<Item = (Symbol, InstrumentFilters)>) {
        self.filters.clear();
        for (symbol, filters) in entries {
            self.filters.insert(symbol, filters);
        }
        info!(symbols = self.filters.len(), "filter cache refreshed");
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spotbot_core::{Price, Quantity};

    fn filters(step: &str) -> InstrumentFilters {
        InstrumentFilters {
            tick_size: Price::new(dec!(0.01)),
            step_size: Quantity::new(step.parse().unwrap()),
            min_qty: Quantity::new(dec!(0.01)),
            max_qty: Quantity::new(dec!(10000)),
            min_notional: dec!(10),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = FilterCache::new();
        assert!(cache.get(&Symbol::new("ETHBTC")).is_none());

        cache.insert(Symbol::new("ETHBTC"), filters("0.001"));
        assert!(cache.get(&Symbol::new("ETHBTC")).is_some());
    }

    #[test]
    fn test_refresh_replaces_contents() {
        let cache = FilterCache::new();
        cache.insert(Symbol::new("ETHBTC"), filters("0.001"));
        cache.insert(Symbol::new("LTCBTC"), filters("0.01"));

        cache.refresh(vec![(Symbol::new("XRPBTC"), filters("0.1"))]);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&Symbol::new("ETHBTC")).is_none());
        assert!(cache.get(&Symbol::new("XRPBTC")).is_some());
    }
}
