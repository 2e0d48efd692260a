//! Gateway and store error types.

use thiserror::Error;

/// Failures from the exchange gateway.
///
/// All of these are logged and treated as a failed attempt; none of
/// them crash the engine.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Order rejected by exchange: {0}")]
    OrderRejected(String),

    #[error("Subscription failed for {0}")]
    SubscriptionFailed(String),

    #[error("Unknown subscription handle {0}")]
    UnknownHandle(u64),
}

/// Failures from the trade lifecycle store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    #[error("Store read failed: {0}")]
    ReadFailed(String),
}
