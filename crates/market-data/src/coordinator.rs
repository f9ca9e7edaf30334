use crate::candles::{Candle, CandleSeries};
use crate::error::MarketDataError;
use crate::feed::{PriceFeed, PriceFeedHandle};
use crate::order_book::OrderBookGenerator;
use crate::types::{OrderBookSnapshot, Trade};
use crate::Result;
use config::{MarketDataConfig, OrderBookConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Owns everything the trading view displays: the candle window fed by the
/// price feed, plus the synthetic order book and trades.
#[derive(Clone)]
pub struct MarketDataCoordinator {
    candles: Arc<RwLock<CandleSeries>>,
    pending_feed: Arc<RwLock<Option<PriceFeed>>>,
    order_book_generator: Arc<RwLock<OrderBookGenerator>>,
    order_book: Arc<RwLock<OrderBookSnapshot>>,
    trades: Arc<RwLock<Vec<Trade>>>,
}

impl MarketDataCoordinator {
    pub fn from_config(market_data: &MarketDataConfig, order_book: &OrderBookConfig) -> Result<Self> {
        let feed = PriceFeed::from_config(market_data)?;
        Ok(Self::new(feed, OrderBookGenerator::new(order_book.clone())))
    }

    pub fn new(feed: PriceFeed, mut order_book_generator: OrderBookGenerator) -> Self {
        let book = order_book_generator.generate_book();
        let trades = order_book_generator.generate_trades();

        Self {
            candles: feed.series(),
            pending_feed: Arc::new(RwLock::new(Some(feed))),
            order_book_generator: Arc::new(RwLock::new(order_book_generator)),
            order_book: Arc::new(RwLock::new(book)),
            trades: Arc::new(RwLock::new(trades)),
        }
    }

    /// Spawn the feed task under a child of `parent`
    ///
    /// Cancelling `parent` or calling `stop` on the handle ends the task.
    /// A feed can only be started once.
    pub async fn start_feed(&self, parent: &CancellationToken) -> Result<PriceFeedHandle> {
        let feed = self
            .pending_feed
            .write()
            .await
            .take()
            .ok_or(MarketDataError::FeedAlreadyStarted)?;

        Ok(feed.spawn(parent.child_token()))
    }

    pub async fn get_candles(&self, limit: usize) -> Vec<Candle> {
        let series = self.candles.read().await;
        series.get_candles(limit)
    }

    pub async fn latest_candle(&self) -> Option<Candle> {
        let series = self.candles.read().await;
        series.latest()
    }

    /// Top `rows` levels per side
    pub async fn order_book(&self, rows: usize) -> OrderBookSnapshot {
        let book = self.order_book.read().await;
        book.truncated(rows)
    }

    pub async fn recent_trades(&self, rows: usize) -> Vec<Trade> {
        let trades = self.trades.read().await;
        trades.iter().take(rows).cloned().collect()
    }

    pub async fn display_rows(&self) -> usize {
        self.order_book_generator.read().await.display_rows()
    }

    /// Draw a fresh book and trades table
    pub async fn refresh_order_book(&self) {
        let mut generator = self.order_book_generator.write().await;
        let book = generator.generate_book();
        let trades = generator.generate_trades();
        info!(
            instrument = generator.instrument_id(),
            sequence = book.sequence,
            "Order book regenerated"
        );

        *self.order_book.write().await = book;
        *self.trades.write().await = trades;
    }
}
