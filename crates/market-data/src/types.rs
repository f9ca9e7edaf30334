//! Shared types for Market Data

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Price level in the synthetic order book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    /// Quantity of the base asset
    pub volume: f64,
    /// Notional value, `price * volume`
    pub amount: f64,
}

/// Order book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub instrument_id: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

impl OrderBookSnapshot {
    /// Keep only the first `rows` levels on each side
    pub fn truncated(&self, rows: usize) -> Self {
        Self {
            instrument_id: self.instrument_id.clone(),
            bids: self.bids.iter().take(rows).cloned().collect(),
            asks: self.asks.iter().take(rows).cloned().collect(),
            sequence: self.sequence,
            timestamp: self.timestamp,
        }
    }
}

/// Row of the recent trades table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub instrument_id: String,
    pub time: NaiveTime,
    pub price: f64,
    pub volume: f64,
    pub amount: f64,
}

/// One published sample of the live price
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceTick {
    pub price: f64,
    /// Open time of the candle whose close this is
    pub time: DateTime<Utc>,
    /// 0 for the initial sample, then one per tick
    pub sequence: u64,
}
