//! Core domain types for the spotbot trading engine.
//!
//! This crate provides fundamental types used throughout the engine:
//! - `Price`, `Quantity`: Precision-safe numeric types
//! - `Symbol`: Trading pair identifier
//! - `InstrumentFilters`: Per-symbol precision/limit rules
//! - `PairStats`: 24-hour rolling statistics per pair
//! - `OrderBookSnapshot`: Streamed partial book depth
//! - `Trade`, `TradeState`: The persisted trade lifecycle entity

pub mod book;
pub mod decimal;
pub mod error;
pub mod filters;
pub mod order;
pub mod stats;
pub mod symbol;
pub mod trade;

pub use book::{OrderBookLevel, OrderBookSnapshot};
pub use decimal::{Price, Quantity};
pub use error::{CoreError, Result};
pub use filters::InstrumentFilters;
pub use order::{OrderSide, TimeInForce};
pub use stats::PairStats;
pub use symbol::Symbol;
pub use trade::{Trade, TradeId, TradeState};
