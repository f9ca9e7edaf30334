//! Observability infrastructure for OpenExchange
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics for the pay-later workflow and the price feed
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("openx", LogFormat::Pretty, "info")?;
//!
//! // Optional
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, FeedMetrics, WorkflowMetrics};
