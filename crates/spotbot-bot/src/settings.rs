//! Trading settings loaded from the trade store.
//!
//! These travel with the account, not with the deployment, so they
//! live next to the trades rather than in the TOML file. Missing
//! optional keys fall back to defaults; malformed values are
//! configuration errors, never silent fallbacks.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use spotbot_gateway::TradeStore;
use spotbot_strategy::{SmartStrategyConfig, StrategyLimits};
use tracing::info;

const KEY_TRADING_LIMIT: &str = "TradingLimitPerPair";
const KEY_MAX_OPEN_TRADES: &str = "MaxOpenTrades";
const KEY_MIN_PROFIT_PERCENT: &str = "MinProfitPercent";
const KEY_EXCHANGE_FEE_PERCENT: &str = "ExchangeFeePercent";
const KEY_BASE_CURRENCY: &str = "BaseCurrencySymbol";
const KEY_MIN_PERCENT_CHANGE: &str = "MinPercentChange";
const KEY_MAX_PERCENT_CHANGE: &str = "MaxPercentChange";
const KEY_MIN_QUOTE_VOLUME: &str = "MinQuoteVolume";

/// Per-account trading settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub trading_limit_per_pair: Decimal,
    pub max_open_trades: usize,
    pub min_profit_percent: Decimal,
    pub exchange_fee_percent: Decimal,
    pub base_currency: String,
    pub min_percent_change: Decimal,
    pub max_percent_change: Decimal,
    pub min_quote_volume: Decimal,
}

impl EngineSettings {
    /// Load settings from the trade store.
    ///
    /// `TradingLimitPerPair` is required: without a budget nothing may
    /// trade, so this fails before any subscription is opened.
    pub fn load(store: &dyn TradeStore) -> AppResult<Self> {
        let trading_limit_per_pair = required_decimal(store, KEY_TRADING_LIMIT)?;
        let settings = Self {
            trading_limit_per_pair,
            max_open_trades: optional_usize(store, KEY_MAX_OPEN_TRADES, 10)?,
            min_profit_percent: optional_decimal(store, KEY_MIN_PROFIT_PERCENT, Decimal::ONE)?,
            exchange_fee_percent: optional_decimal(
                store,
                KEY_EXCHANGE_FEE_PERCENT,
                Decimal::new(1, 1),
            )?,
            base_currency: store
                .get_setting(KEY_BASE_CURRENCY)?
                .unwrap_or_else(|| "BTC".to_string()),
            min_percent_change: optional_decimal(
                store,
                KEY_MIN_PERCENT_CHANGE,
                Decimal::from(-25),
            )?,
            max_percent_change: optional_decimal(store, KEY_MAX_PERCENT_CHANGE, Decimal::from(25))?,
            min_quote_volume: optional_decimal(store, KEY_MIN_QUOTE_VOLUME, Decimal::from(250))?,
        };
        info!(
            trading_limit = %settings.trading_limit_per_pair,
            max_open_trades = settings.max_open_trades,
            base_currency = %settings.base_currency,
            "Trading settings loaded"
        );
        Ok(settings)
    }

    pub fn strategy_limits(&self) -> StrategyLimits {
        StrategyLimits {
            trading_limit_per_pair: self.trading_limit_per_pair,
            max_open_trades: self.max_open_trades,
            min_profit_percent: self.min_profit_percent,
            exchange_fee_percent: self.exchange_fee_percent,
        }
    }

    pub fn smart_config(&self) -> SmartStrategyConfig {
        SmartStrategyConfig {
            min_percent_change: self.min_percent_change,
            max_percent_change: self.max_percent_change,
            min_quote_volume: self.min_quote_volume,
        }
    }
}

fn required_decimal(store: &dyn TradeStore, key: &str) -> AppResult<Decimal> {
    match store.get_setting(key)? {
        Some(raw) => parse_decimal(key, &raw),
        None => Err(AppError::Config(format!("missing required setting {key}"))),
    }
}

fn optional_decimal(store: &dyn TradeStore, key: &str, default: Decimal) -> AppResult<Decimal> {
    match store.get_setting(key)? {
        Some(raw) => parse_decimal(key, &raw),
        None => Ok(default),
    }
}

fn optional_usize(store: &dyn TradeStore, key: &str, default: usize) -> AppResult<usize> {
    match store.get_setting(key)? {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("invalid value for {key}: {raw}"))),
        None => Ok(default),
    }
}

fn parse_decimal(key: &str, raw: &str) -> AppResult<Decimal> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("invalid value for {key}: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spotbot_gateway::MemoryTradeStore;

    #[test]
    fn test_load_with_defaults() {
        let store = MemoryTradeStore::new();
        store.set_setting("TradingLimitPerPair", "50");

        let settings = EngineSettings::load(&store).unwrap();
        assert_eq!(settings.trading_limit_per_pair, dec!(50));
        assert_eq!(settings.max_open_trades, 10);
        assert_eq!(settings.min_profit_percent, dec!(1));
        assert_eq!(settings.exchange_fee_percent, dec!(0.1));
        assert_eq!(settings.base_currency, "BTC");
        assert_eq!(settings.min_percent_change, dec!(-25));
        assert_eq!(settings.max_percent_change, dec!(25));
        assert_eq!(settings.min_quote_volume, dec!(250));
    }

    #[test]
    fn test_missing_trading_limit_fails() {
        let store = MemoryTradeStore::new();
        let err = EngineSettings::load(&store).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_malformed_value_is_an_error_not_a_default() {
        let store = MemoryTradeStore::new();
        store.set_setting("TradingLimitPerPair", "50");
        store.set_setting("MaxOpenTrades", "ten");

        let err = EngineSettings::load(&store).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_overrides_win() {
        let store = MemoryTradeStore::new();
        store.set_setting("TradingLimitPerPair", "75");
        store.set_setting("MaxOpenTrades", "3");
        store.set_setting("BaseCurrencySymbol", "USDT");
        store.set_setting("MinProfitPercent", "2.5");

        let settings = EngineSettings::load(&store).unwrap();
        assert_eq!(settings.trading_limit_per_pair, dec!(75));
        assert_eq!(settings.max_open_trades, 3);
        assert_eq!(settings.base_currency, "USDT");
        assert_eq!(settings.strategy_limits().min_profit_percent, dec!(2.5));
    }
}
