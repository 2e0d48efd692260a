//! Exchange filter validation.
//!
//! Converts a desired notional amount or raw quantity into an
//! exchange-legal order size under per-symbol precision rules. Pure
//! computation plus a symbol-keyed cache of filter metadata.

pub mod cache;
pub mod error;
pub mod validate;

pub use cache::FilterCache;
pub use error::{FilterError, FilterResult};
pub use validate::{validate_buy, validate_sell, FilterValidator, QUANTITY_SCALE};
