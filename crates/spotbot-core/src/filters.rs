//! Per-symbol exchange filter rules.

use crate::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Precision and limit rules for one symbol, sourced from exchange
/// metadata. Immutable within a refresh cycle.
///
/// Every accepted order must have a price that is a multiple of
/// `tick_size`, a quantity that is a multiple of `step_size` inside
/// `[min_qty, max_qty]`, and a notional of at least `min_notional`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentFilters {
    /// Minimum price increment.
    pub tick_size: Price,
    /// Minimum quantity increment.
    pub step_size: Quantity,
    /// Minimum order quantity.
    pub min_qty: Quantity,
    /// Maximum order quantity.
    pub max_qty: Quantity,
    /// Minimum notional (price * quantity).
    pub min_notional: Decimal,
}

impl InstrumentFilters {
    /// Check whether a quantity satisfies the lot-size bounds.
    pub fn qty_in_range(&self, qty: Quantity) -> bool {
        qty >= self.min_qty && qty <= self.max_qty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn filters() -> InstrumentFilters {
        InstrumentFilters {
            tick_size: Price::new(dec!(0.00001)),
            step_size: Quantity::new(dec!(0.001)),
            min_qty: Quantity::new(dec!(0.01)),
            max_qty: Quantity::new(dec!(10000)),
            min_notional: dec!(10),
        }
    }

    #[test]
    fn test_qty_in_range() {
        let f = filters();
        assert!(f.qty_in_range(Quantity::new(dec!(0.5))));
        assert!(!f.qty_in_range(Quantity::new(dec!(0.001))));
        assert!(!f.qty_in_range(Quantity::new(dec!(20000))));
    }
}
