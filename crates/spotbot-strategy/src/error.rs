//! Strategy error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
