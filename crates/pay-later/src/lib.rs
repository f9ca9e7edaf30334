//! Pay-later trading for OpenExchange
//!
//! A user transfers a deposit plus fee now and repays the rest of the
//! position after a fixed period. This crate computes that schedule,
//! converts the position at a settlement price and drives the three-step
//! form the terminal session presents.
//!
//! # Modules
//!
//! - [`schedule`] - deposit, fee and total payment from an amount and period
//! - [`conversion`] - received asset at the settlement price
//! - [`workflow`] - SETUP, TRANSFER_CONFIRM and TRADE_CONFIRMED state machine
//! - [`input`] - decimal amount entry rules
//! - [`format`] - thousands-separated display strings
//! - [`clipboard`] - wallet address copy seam

pub mod clipboard;
pub mod conversion;
pub mod error;
pub mod format;
pub mod input;
pub mod schedule;
pub mod workflow;

pub use clipboard::{Clipboard, MemoryClipboard, Notification};
pub use conversion::{convert, payment_currency, received_currency, Conversion};
pub use error::PayLaterError;
pub use input::AmountInput;
pub use schedule::{compute_schedule, FeeSchedule, PaymentSchedule, DEPOSIT_RATE, WEEKLY_FEE_RATE};
pub use workflow::{
    AmountFallback, Confirmation, EditOutcome, Field, PayLaterWorkflow, Preview, Step,
    WorkflowSettings, WorkflowState,
};

/// Result type for pay-later operations
pub type Result<T> = std::result::Result<T, PayLaterError>;
