//! Synthetic market data for OpenExchange
//!
//! Everything in this crate is generated locally; there is no upstream
//! venue. A fixed seed reproduces the same candles, book and trades.
//!
//! # Core Components
//!
//! - [`candles`] - candle intervals and the rolling candle window
//! - [`generator`] - random candle walk used for history and ticks
//! - [`feed`] - periodic price feed with watch-based subscriptions
//! - [`order_book`] - decorative depth ladder and recent trades
//! - [`coordinator`] - shared state behind the trading view
//!
//! # Key Invariants
//!
//! - Subscribers always see a price, seeded from the last history close
//! - The feed task stops when its cancellation token is cancelled
//! - Candle high/low always contain open and close

pub mod candles;
pub mod coordinator;
pub mod error;
pub mod feed;
pub mod generator;
pub mod order_book;
pub mod types;

pub use candles::{Candle, CandleInterval, CandleSeries};
pub use coordinator::MarketDataCoordinator;
pub use error::MarketDataError;
pub use feed::{LatestPrice, PriceFeed, PriceFeedHandle, PriceSubscription};
pub use generator::CandleGenerator;
pub use order_book::OrderBookGenerator;
pub use types::{OrderBookSnapshot, PriceLevel, PriceTick, Trade};

pub type Result<T> = std::result::Result<T, MarketDataError>;
