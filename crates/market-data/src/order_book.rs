use crate::types::{OrderBookSnapshot, PriceLevel, Trade};
use chrono::{NaiveTime, Utc};
use config::OrderBookConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds the decorative depth ladder and recent trades table.
///
/// Prices step linearly away from `base_price`; volumes are uniform random.
/// Nothing here reacts to the price feed.
#[derive(Debug, Clone)]
pub struct OrderBookGenerator {
    config: OrderBookConfig,
    rng: StdRng,
    sequence: u64,
}

impl OrderBookGenerator {
    pub fn new(config: OrderBookConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            sequence: 0,
        }
    }

    pub fn instrument_id(&self) -> &str {
        &self.config.base_asset
    }

    pub fn display_rows(&self) -> usize {
        self.config.display_rows
    }

    pub fn generate_book(&mut self) -> OrderBookSnapshot {
        let levels = self.config.levels;
        let base = self.config.base_price;
        let (bid_step, ask_step) = (self.config.bid_step, self.config.ask_step);

        let bids = (0..levels)
            .map(|i| self.level(base + bid_step * i as f64))
            .collect();
        let asks = (0..levels)
            .map(|i| self.level(base + ask_step * i as f64))
            .collect();

        self.sequence += 1;
        OrderBookSnapshot {
            instrument_id: self.config.base_asset.clone(),
            bids,
            asks,
            sequence: self.sequence,
            timestamp: Utc::now(),
        }
    }

    pub fn generate_trades(&mut self) -> Vec<Trade> {
        let base = self.config.base_price;
        let step = self.config.trade_step;

        (0..self.config.levels)
            .map(|i| {
                let minute = self.rng.random_range(0..60);
                let second = self.rng.random_range(0..60);
                let time = NaiveTime::from_hms_opt(12, minute, second).unwrap_or_default();
                let price = base + step * i as f64;
                let volume = round_to(self.rng.random_range(0.01..0.51), 3);
                Trade {
                    instrument_id: self.config.base_asset.clone(),
                    time,
                    price,
                    volume,
                    amount: price * volume,
                }
            })
            .collect()
    }

    fn level(&mut self, price: f64) -> PriceLevel {
        let volume = round_to(self.rng.random_range(0.05..0.55), 2);
        PriceLevel {
            price,
            volume,
            amount: price * volume,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn seeded(seed: u64) -> OrderBookGenerator {
        OrderBookGenerator::new(OrderBookConfig {
            seed: Some(seed),
            ..OrderBookConfig::default()
        })
    }

    #[test]
    fn test_price_ladder() {
        let book = seeded(1).generate_book();

        assert_eq!(book.bids.len(), 150);
        assert_eq!(book.asks.len(), 150);
        assert!((book.bids[0].price - 112_000.0).abs() < 1e-9);
        assert!((book.bids[3].price - 112_030.0).abs() < 1e-9);
        assert!((book.asks[3].price - 112_036.0).abs() < 1e-9);
        assert_eq!(book.instrument_id, "BTC");
    }

    #[test]
    fn test_level_volume_and_amount() {
        let book = seeded(2).generate_book();

        for level in book.bids.iter().chain(book.asks.iter()) {
            assert!(level.volume >= 0.05 && level.volume <= 0.55);
            assert!((level.volume * 100.0 - (level.volume * 100.0).round()).abs() < 1e-6);
            assert!((level.amount - level.price * level.volume).abs() < 1e-6);
        }
    }

    #[test]
    fn test_trades() {
        let trades = seeded(3).generate_trades();

        assert_eq!(trades.len(), 150);
        for (i, trade) in trades.iter().enumerate() {
            assert_eq!(trade.time.hour(), 12);
            assert!((trade.price - (112_000.0 + 7.0 * i as f64)).abs() < 1e-9);
            assert!(trade.volume >= 0.01 && trade.volume <= 0.51);
            assert!((trade.amount - trade.price * trade.volume).abs() < 1e-6);
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let volumes = |seed| {
            let mut gen = seeded(seed);
            gen.generate_book()
                .bids
                .iter()
                .map(|l| l.volume)
                .collect::<Vec<_>>()
        };

        assert_eq!(volumes(42), volumes(42));
        assert_ne!(volumes(42), volumes(43));
    }

    #[test]
    fn test_sequence_and_truncation() {
        let mut gen = seeded(4);
        let first = gen.generate_book();
        let second = gen.generate_book();
        assert_eq!(first.sequence + 1, second.sequence);

        let top = second.truncated(gen.display_rows());
        assert_eq!(top.bids.len(), 50);
        assert_eq!(top.asks.len(), 50);
        assert!((top.bids[0].price - second.bids[0].price).abs() < 1e-9);
    }
}
