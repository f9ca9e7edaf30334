//! Common types and utilities for OpenExchange
//!
//! This crate provides shared types, traits, and utilities used across
//! all OpenExchange crates.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (Side, TradingPair, PaymentPeriod, etc.)
//! - [`price`] - The live price seam between market data and its consumers

pub mod error;
pub mod price;
pub mod types;

pub use error::{Error, Result};
pub use price::{FixedPrice, PriceSource};
pub use types::*;
