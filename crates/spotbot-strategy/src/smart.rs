//! The "smart" mean-reversion pair selector.
//!
//! Ranks pairs ascending by 24h percentage change, so the most
//! depressed pairs are considered first as re-entry opportunities, and
//! returns the first one the market and the filters both accept. The
//! early exit trades ranking optimality for responsiveness: prices can
//! move between ranking and execution, so the first live match wins.

use crate::error::{StrategyError, StrategyResult};
use crate::{pricing, Candidate, PairStrategy, StrategyLimits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotbot_core::{PairStats, Symbol};
use spotbot_filters::FilterValidator;
use std::collections::HashSet;
use tracing::{debug, info};

/// Ranking thresholds for the smart strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartStrategyConfig {
    /// Inclusive lower bound on 24h percentage change.
    #[serde(default = "default_min_percent_change")]
    pub min_percent_change: Decimal,
    /// Exclusive upper bound on 24h percentage change.
    #[serde(default = "default_max_percent_change")]
    pub max_percent_change: Decimal,
    /// Minimum 24h quote-currency volume.
    #[serde(default = "default_min_quote_volume")]
    pub min_quote_volume: Decimal,
}

fn default_min_percent_change() -> Decimal {
    Decimal::from(-25)
}

fn default_max_percent_change() -> Decimal {
    Decimal::from(25)
}

fn default_min_quote_volume() -> Decimal {
    Decimal::from(250)
}

impl Default for SmartStrategyConfig {
    fn default() -> Self {
        Self {
            min_percent_change: default_min_percent_change(),
            max_percent_change: default_max_percent_change(),
            min_quote_volume: default_min_quote_volume(),
        }
    }
}

impl SmartStrategyConfig {
    pub fn validate(&self) -> StrategyResult<()> {
        if self.min_percent_change >= self.max_percent_change {
            return Err(StrategyError::InvalidConfig(format!(
                "min_percent_change ({}) must be below max_percent_change ({})",
                self.min_percent_change, self.max_percent_change
            )));
        }
        if self.min_quote_volume.is_sign_negative() {
            return Err(StrategyError::InvalidConfig(format!(
                "min_quote_volume ({}) must be non-negative",
                self.min_quote_volume
            )));
        }
        Ok(())
    }
}

/// Mean-reversion selector with early exit.
pub struct SmartStrategy {
    config: SmartStrategyConfig,
}

impl SmartStrategy {
    pub fn new(config: SmartStrategyConfig) -> Self {
        Self { config }
    }

    fn passes_thresholds(&self, stats: &PairStats) -> bool {
        stats.price_change_percent >= self.config.min_percent_change
            && stats.price_change_percent < self.config.max_percent_change
            && stats.quote_volume > self.config.min_quote_volume
    }
}

impl PairStrategy for SmartStrategy {
    fn name(&self) -> &'static str {
        "smart"
    }

    fn select(
        &self,
        stats: &[PairStats],
        open_symbols: &HashSet<Symbol>,
        limits: &StrategyLimits,
        validator: &FilterValidator,
    ) -> Option<Candidate> {
        if open_symbols.len() >= limits.max_open_trades {
            debug!(
                open = open_symbols.len(),
                max = limits.max_open_trades,
                "open trade limit reached, no candidate"
            );
            return None;
        }

        let mut ranked: Vec<&PairStats> = stats
            .iter()
            .filter(|s| s.has_prices() && self.passes_thresholds(s))
            .collect();
        // Most depressed pairs first; stable sort keeps selection deterministic.
        ranked.sort_by(|a, b| a.price_change_percent.cmp(&b.price_change_percent));

        for pair in ranked {
            if open_symbols.contains(&pair.symbol) {
                debug!(symbol = %pair.symbol, "already open, skipping");
                continue;
            }

            let target = pricing::target_buy_price(
                pair.weighted_avg_price,
                limits.min_profit_percent,
                limits.exchange_fee_percent,
            );
            if pair.ask_price > target {
                continue;
            }

            match validator.validate_buy(&pair.symbol, limits.trading_limit_per_pair, pair.ask_price)
            {
                Ok(quantity) => {
                    info!(
                        symbol = %pair.symbol,
                        change_pct = %pair.price_change_percent,
                        target_buy = %target,
                        %quantity,
                        "candidate selected"
                    );
                    return Some(Candidate {
                        symbol: pair.symbol.clone(),
                        target_buy_price: target,
                        quantity,
                    });
                }
                Err(err) => {
                    debug!(symbol = %pair.symbol, %err, "filter rejection, skipping");
                    continue;
                }
            }
        }

        None
    }
}
