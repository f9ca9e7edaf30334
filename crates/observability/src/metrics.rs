//! Prometheus metrics infrastructure
//!
//! Counters and gauges for the pay-later workflow and the synthetic price
//! feed. Without an installed recorder every call is a no-op, so libraries
//! and tests can record freely.

use metrics::{counter, gauge, Gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus metrics exporter
///
/// This starts an HTTP server on the specified port that exposes metrics
/// at the `/metrics` endpoint. Must be called from within a tokio runtime.
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // Metrics available at http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Pay-later workflow metrics
///
/// * `paylater_transitions_total{to}` - accepted step transitions
/// * `paylater_validation_rejections_total{reason}` - rejected advances and edits
/// * `paylater_resets_total` - workflow closes
/// * `paylater_clipboard_failures_total` - failed wallet address copies
#[derive(Clone, Default)]
pub struct WorkflowMetrics;

impl WorkflowMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_transition(&self, to: &'static str) {
        counter!("paylater_transitions_total", "to" => to).increment(1);
    }

    pub fn record_rejection(&self, reason: &'static str) {
        counter!("paylater_validation_rejections_total", "reason" => reason).increment(1);
    }

    pub fn record_reset(&self) {
        counter!("paylater_resets_total").increment(1);
    }

    pub fn record_clipboard_failure(&self) {
        counter!("paylater_clipboard_failures_total").increment(1);
    }
}

/// Synthetic price feed metrics
///
/// * `market_data_price_ticks_total{symbol}` - published ticks
/// * `market_data_last_price{symbol}` - most recent close
#[derive(Clone)]
pub struct FeedMetrics {
    last_price: Gauge,
    symbol: String,
}

impl FeedMetrics {
    pub fn new(symbol: &str) -> Self {
        let symbol = symbol.to_string();
        Self {
            last_price: gauge!("market_data_last_price", "symbol" => symbol.clone()),
            symbol,
        }
    }

    pub fn record_tick(&self, price: f64) {
        counter!("market_data_price_ticks_total", "symbol" => self.symbol.clone()).increment(1);
        self.last_price.set(price);
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder() {
        let workflow = WorkflowMetrics::new();
        workflow.record_transition("transfer_confirm");
        workflow.record_rejection("invalid_amount");
        workflow.record_reset();

        let feed = FeedMetrics::new("BTC/USDC");
        feed.record_tick(105_000.0);
        assert_eq!(feed.symbol(), "BTC/USDC");
    }
}
