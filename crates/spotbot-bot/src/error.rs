//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] spotbot_gateway::GatewayError),

    #[error("Trade store error: {0}")]
    Store(#[from] spotbot_gateway::StoreError),

    #[error("Matcher error: {0}")]
    Matcher(#[from] spotbot_matcher::MatcherError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] spotbot_strategy::StrategyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] spotbot_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
