//! Filter validation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections from filter validation.
///
/// All of these are expected, non-fatal outcomes: the caller treats a
/// rejection as "no order", never as an engine fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("No filter metadata for symbol {0}")]
    MissingFilters(String),

    #[error("Price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Quantity {quantity} outside [{min}, {max}]")]
    QuantityOutOfRange {
        quantity: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Notional {notional} below minimum {min_notional}")]
    BelowMinNotional {
        notional: Decimal,
        min_notional: Decimal,
    },
}

pub type FilterResult<T> = Result<T, FilterError>;
