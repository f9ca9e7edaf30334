//! Pay-later error types

use thiserror::Error;

/// Errors that can occur while computing a schedule or driving the workflow
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayLaterError {
    /// Amount missing, non-numeric, non-finite or not positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Zero-day payment period
    #[error("Invalid payment period: {0} days")]
    InvalidPeriod(u32),

    /// Settlement price missing, non-finite or not positive
    #[error("Invalid settlement price: {0}")]
    InvalidPrice(f64),

    /// No live price and no configured fallback when confirming the trade
    #[error("No live price available to settle the trade")]
    PriceUnavailable,

    /// Advance requested after the trade was confirmed
    #[error("Trade already confirmed")]
    AlreadyConfirmed,

    /// Operation requires a different workflow step
    #[error("Not available in step {0}")]
    WrongStep(&'static str),

    /// Fee schedule rates out of range
    #[error("Invalid fee schedule: {0}")]
    InvalidSchedule(String),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<common::Error> for PayLaterError {
    fn from(err: common::Error) -> Self {
        PayLaterError::Config(err.to_string())
    }
}
