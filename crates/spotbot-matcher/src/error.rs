use spotbot_filters::FilterError;
use spotbot_gateway::{GatewayError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("filter validation failed: {0}")]
    Filter(#[from] FilterError),

    #[error("trade store error: {0}")]
    Store(#[from] StoreError),
}

pub type MatcherResult<T> = Result<T, MatcherError>;
