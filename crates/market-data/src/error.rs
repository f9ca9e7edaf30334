//! Market data error types

use thiserror::Error;

/// Errors that can occur during market data operations
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Unknown candle interval label
    #[error("Invalid candle interval: {0}")]
    InvalidInterval(String),

    /// Generator or feed settings out of range
    #[error("Invalid market data configuration: {0}")]
    InvalidConfig(String),

    /// Data not available
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    /// The feed was already handed to a running task
    #[error("Price feed already started")]
    FeedAlreadyStarted,

    /// The feed task panicked or was aborted
    #[error("Price feed task failed: {0}")]
    TaskFailed(String),
}
