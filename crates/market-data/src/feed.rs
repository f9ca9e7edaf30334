//! Live price feed
//!
//! A background task extends the candle series on a fixed period and
//! publishes each new close through a `watch` channel. The channel is seeded
//! with the close of the last history candle, so a subscriber always has a
//! price to show before the first tick.
//!
//! The task runs until its `CancellationToken` is cancelled. Consumers that
//! only need the current value read it through [`common::PriceSource`].

use crate::candles::{Candle, CandleInterval, CandleSeries};
use crate::error::MarketDataError;
use crate::generator::CandleGenerator;
use crate::types::PriceTick;
use crate::Result;
use chrono::Utc;
use common::PriceSource;
use config::MarketDataConfig;
use observability::FeedMetrics;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A feed that has generated its history but not started ticking
pub struct PriceFeed {
    generator: CandleGenerator,
    series: Arc<RwLock<CandleSeries>>,
    last: Candle,
    tick_interval: Duration,
    tx: watch::Sender<PriceTick>,
    metrics: FeedMetrics,
}

impl PriceFeed {
    pub fn from_config(config: &MarketDataConfig) -> Result<Self> {
        let interval: CandleInterval = config.candle_interval.parse()?;
        let generator = CandleGenerator::new(config.generator.clone(), interval, config.seed);
        Self::new(
            generator,
            config.history_candles,
            Duration::from_millis(config.tick_interval_ms),
            &config.symbol,
        )
    }

    /// Generate `history_len` candles and seed the channel with the last close
    pub fn new(
        mut generator: CandleGenerator,
        history_len: usize,
        tick_interval: Duration,
        symbol: &str,
    ) -> Result<Self> {
        if history_len == 0 {
            return Err(MarketDataError::InvalidConfig(
                "history_candles must be at least 1".to_string(),
            ));
        }
        if tick_interval.is_zero() {
            return Err(MarketDataError::InvalidConfig(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        let history = generator.history(history_len, Utc::now());
        let series = CandleSeries::from_history(history, history_len);
        let last = series
            .latest()
            .ok_or_else(|| MarketDataError::DataNotAvailable("empty candle history".to_string()))?;

        let (tx, _rx) = watch::channel(PriceTick {
            price: last.close,
            time: last.open_time,
            sequence: 0,
        });

        let metrics = FeedMetrics::new(symbol);
        metrics.record_tick(last.close);

        info!(
            symbol,
            candles = history_len,
            interval = generator.interval().as_str(),
            initial_price = last.close,
            "Price feed history generated"
        );

        Ok(Self {
            generator,
            series: Arc::new(RwLock::new(series)),
            last,
            tick_interval,
            tx,
            metrics,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Shared handle on the candle window the feed appends to
    pub fn series(&self) -> Arc<RwLock<CandleSeries>> {
        Arc::clone(&self.series)
    }

    pub fn subscribe(&self) -> PriceSubscription {
        PriceSubscription::new(self.tx.subscribe())
    }

    /// Start ticking. The first tick fires one full period after the call.
    pub fn spawn(self, token: CancellationToken) -> PriceFeedHandle {
        let rx = self.tx.subscribe();
        let task_token = token.clone();
        let task = tokio::spawn(self.run(task_token));

        PriceFeedHandle { rx, token, task }
    }

    async fn run(mut self, token: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence = 0u64;

        info!(
            symbol = self.metrics.symbol(),
            period_ms = self.tick_interval.as_millis() as u64,
            "Price feed started"
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(symbol = self.metrics.symbol(), ticks = sequence, "Price feed stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let candle = self.generator.next_candle(&self.last);
                    self.series.write().await.push(candle);
                    self.last = candle;
                    sequence += 1;

                    self.tx.send_replace(PriceTick {
                        price: candle.close,
                        time: candle.open_time,
                        sequence,
                    });
                    self.metrics.record_tick(candle.close);
                    debug!(sequence, price = candle.close, "Price tick");
                }
            }
        }
    }
}

impl fmt::Debug for PriceFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceFeed")
            .field("symbol", &self.metrics.symbol())
            .field("interval", &self.generator.interval())
            .field("tick_interval", &self.tick_interval)
            .field("last_close", &self.last.close)
            .finish_non_exhaustive()
    }
}

/// Control handle for a running feed task
pub struct PriceFeedHandle {
    rx: watch::Receiver<PriceTick>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PriceFeedHandle {
    pub fn subscribe(&self) -> PriceSubscription {
        PriceSubscription::new(self.rx.clone())
    }

    /// A [`PriceSource`] reading the most recent tick
    pub fn source(&self) -> LatestPrice {
        LatestPrice::new(self.rx.clone())
    }

    pub fn latest(&self) -> PriceTick {
        *self.rx.borrow()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the task to exit. Call [`stop`](Self::stop) first.
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| MarketDataError::TaskFailed(e.to_string()))
    }
}

impl fmt::Debug for PriceFeedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceFeedHandle")
            .field("latest", &*self.rx.borrow())
            .field("stopped", &self.token.is_cancelled())
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

/// Stream of price ticks for one consumer
///
/// The first call to [`next_tick`](Self::next_tick) yields the current value
/// immediately; later calls wait for the next publication.
pub struct PriceSubscription {
    rx: watch::Receiver<PriceTick>,
    delivered_initial: bool,
}

impl PriceSubscription {
    fn new(rx: watch::Receiver<PriceTick>) -> Self {
        Self {
            rx,
            delivered_initial: false,
        }
    }

    /// `None` once the feed task has exited
    pub async fn next_tick(&mut self) -> Option<PriceTick> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(*self.rx.borrow_and_update());
        }
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn current(&self) -> PriceTick {
        *self.rx.borrow()
    }
}

impl PriceSource for PriceSubscription {
    fn latest_price(&self) -> Option<f64> {
        Some(self.rx.borrow().price)
    }
}

/// Read-only view on the newest tick
#[derive(Clone)]
pub struct LatestPrice {
    rx: watch::Receiver<PriceTick>,
}

impl LatestPrice {
    fn new(rx: watch::Receiver<PriceTick>) -> Self {
        Self { rx }
    }
}

impl PriceSource for LatestPrice {
    fn latest_price(&self) -> Option<f64> {
        let price = self.rx.borrow().price;
        price.is_finite().then_some(price)
    }
}
