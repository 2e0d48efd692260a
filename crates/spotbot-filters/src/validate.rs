//! Quantity validation against per-symbol exchange filters.
//!
//! All rounding floors toward zero. A floored quantity can never exceed
//! the requested budget or the available balance, which is the whole
//! point of validating before placement.

use crate::cache::FilterCache;
use crate::error::{FilterError, FilterResult};
use rust_decimal::Decimal;
use spotbot_core::{InstrumentFilters, Price, Quantity, Symbol};
use std::sync::Arc;
use tracing::trace;

/// Fixed scale the floored quantity is renormalized to.
///
/// Flooring with `%` can leave a long artificial scale on the decimal;
/// rounding at 20 fractional digits is far finer than any exchange step
/// size and only strips that artifact.
pub const QUANTITY_SCALE: u32 = 20;

/// Validate a buy sized from a quote-currency budget.
///
/// Raw quantity is `target_notional / price`, floored to the step size
/// and checked against `[min_qty, max_qty]`. The resulting notional,
/// floored to the tick size, must reach the minimum notional.
pub fn validate_buy(
    filters: &InstrumentFilters,
    target_notional: Decimal,
    price: Price,
) -> FilterResult<Quantity> {
    if !price.is_positive() {
        return Err(FilterError::NonPositivePrice(price.inner()));
    }

    let raw = Quantity::new(target_notional / price.inner());
    let quantity = floor_and_normalize(raw, filters);
    check_range(quantity, filters)?;

    let total = Price::new(quantity.notional(price)).floor_to_tick(filters.tick_size);
    if total.inner() < filters.min_notional {
        return Err(FilterError::BelowMinNotional {
            notional: total.inner(),
            min_notional: filters.min_notional,
        });
    }

    trace!(%quantity, %price, "buy quantity validated");
    Ok(quantity)
}

/// Validate a sell of an already-held quantity.
///
/// Same flooring and range check as buys; no notional requirement.
pub fn validate_sell(filters: &InstrumentFilters, raw_quantity: Quantity) -> FilterResult<Quantity> {
    let quantity = floor_and_normalize(raw_quantity, filters);
    check_range(quantity, filters)?;

    trace!(%quantity, "sell quantity validated");
    Ok(quantity)
}

fn floor_and_normalize(raw: Quantity, filters: &InstrumentFilters) -> Quantity {
    Quantity::new(raw.floor_to_step(filters.step_size).inner().round_dp(QUANTITY_SCALE))
}

fn check_range(quantity: Quantity, filters: &InstrumentFilters) -> FilterResult<()> {
    if !filters.qty_in_range(quantity) {
        return Err(FilterError::QuantityOutOfRange {
            quantity: quantity.inner(),
            min: filters.min_qty.inner(),
            max: filters.max_qty.inner(),
        });
    }
    Ok(())
}

/// Symbol-keyed validator over a shared filter cache.
///
/// A symbol with no cached metadata fails validation; absence is never
/// treated as "no constraint".
#[derive(Clone)]
pub struct FilterValidator {
    cache: Arc<FilterCache>,
}

impl FilterValidator {
    pub fn new(cache: Arc<FilterCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &FilterCache {
        &self.cache
    }

    /// Buy-side validation for `symbol` (see [`validate_buy`]).
    pub fn validate_buy(
        &self,
        symbol: &Symbol,
        target_notional: Decimal,
        price: Price,
    ) -> FilterResult<Quantity> {
        let filters = self.require(symbol)?;
        validate_buy(&filters, target_notional, price)
    }

    /// Sell-side validation for `symbol` (see [`validate_sell`]).
    pub fn validate_sell(&self, symbol: &Symbol, raw_quantity: Quantity) -> FilterResult<Quantity> {
        let filters = self.require(symbol)?;
        validate_sell(&filters, raw_quantity)
    }

    fn require(&self, symbol: &Symbol) -> FilterResult<InstrumentFilters> {
        self.cache
            .get(symbol)
            .ok_or_else(|| FilterError::MissingFilters(symbol.to_string()))
    }
}
