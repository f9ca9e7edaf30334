//! Common error types for OpenExchange

use thiserror::Error;

/// Common error type used across OpenExchange crates
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input was provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported trading pair
    #[error("Unsupported trading pair: {0}. Must be one of: BTC/USDC, ETH/USDC, ETH/BTC")]
    UnsupportedPair(String),

    /// Unsupported payment period
    #[error("Unsupported payment period: {0}. Must be one of: 1, 2, 7, 14, 28 days")]
    UnsupportedPeriod(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
