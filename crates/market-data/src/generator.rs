//! Seedable random candle walk
//!
//! Produces the synthetic history shown on startup and one new candle per
//! feed tick. A fixed seed makes the whole sequence reproducible.

use crate::candles::{Candle, CandleInterval};
use chrono::{DateTime, Utc};
use config::CandleGeneratorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub struct CandleGenerator {
    rng: StdRng,
    params: CandleGeneratorConfig,
    interval: CandleInterval,
}

impl CandleGenerator {
    /// `seed = None` draws the seed from the operating system
    pub fn new(params: CandleGeneratorConfig, interval: CandleInterval, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                debug!(seed, "Seeding candle generator");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            params,
            interval,
        }
    }

    pub fn interval(&self) -> CandleInterval {
        self.interval
    }

    /// `count` independent candles ending at the bucket containing `now`
    pub fn history(&mut self, count: usize, now: DateTime<Utc>) -> Vec<Candle> {
        let last_open = self.interval.open_time_of(now);
        let step = self.interval.as_duration();
        let p = self.params.clone();

        (0..count)
            .map(|i| {
                let back = (count - 1 - i) as i32;
                let open_time = last_open - step * back;
                let base = p.history_base_price + self.unit() * p.history_base_range;
                let high = base + self.unit() * p.history_wick;
                let low = base - self.unit() * p.history_wick;
                let open = base + self.centered(p.history_body);
                let close = base + self.centered(p.history_body);
                Candle::new(open_time, self.interval, open, high, low, close)
            })
            .collect()
    }

    /// The candle that follows `last`, drifting from its close
    pub fn next_candle(&mut self, last: &Candle) -> Candle {
        let p = &self.params;
        let (drift, wick, body) = (p.tick_drift, p.tick_wick, p.tick_body);

        let base = last.close + self.centered(drift);
        let high = base + self.unit() * wick;
        let low = base - self.unit() * wick;
        let open = base + self.centered(body);
        let close = base + self.centered(body);
        Candle::new(last.next_open_time(), self.interval, open, high, low, close)
    }

    /// Uniform in [0, 1)
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform in [-width/2, width/2)
    fn centered(&mut self, width: f64) -> f64 {
        (self.unit() - 0.5) * width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> CandleGenerator {
        CandleGenerator::new(CandleGeneratorConfig::default(), CandleInterval::OneDay, Some(seed))
    }

    #[test]
    fn test_history_shape() {
        let now = Utc::now();
        let history = generator(1).history(150, now);

        assert_eq!(history.len(), 150);
        assert_eq!(history[149].open_time, CandleInterval::OneDay.open_time_of(now));
        for pair in history.windows(2) {
            assert_eq!(pair[1].open_time - pair[0].open_time, CandleInterval::OneDay.as_duration());
        }
    }

    #[test]
    fn test_history_bounds() {
        let history = generator(2).history(500, Utc::now());

        for candle in &history {
            assert!(candle.high >= candle.open.max(candle.close));
            assert!(candle.low <= candle.open.min(candle.close));
            // base in [105000, 115000), body within +-500, wick within 2000
            assert!(candle.low >= 105_000.0 - 2_000.0);
            assert!(candle.high < 115_000.0 + 2_000.0);
            assert!(candle.close >= 105_000.0 - 500.0 && candle.close < 115_000.0 + 500.0);
        }
    }

    #[test]
    fn test_next_candle_drifts_from_close() {
        let mut gen = generator(3);
        let history = gen.history(1, Utc::now());
        let last = history[0];

        let next = gen.next_candle(&last);

        assert_eq!(next.open_time, last.next_open_time());
        // drift within +-500 of close, body within +-250 of base
        assert!((next.close - last.close).abs() <= 750.0);
        assert!(next.high >= next.close && next.low <= next.close);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let now = Utc::now();
        let a = generator(42).history(10, now);
        let b = generator(42).history(10, now);
        let c = generator(43).history(10, now);

        let closes = |v: &[Candle]| v.iter().map(|c| c.close).collect::<Vec<_>>();
        assert_eq!(closes(&a), closes(&b));
        assert_ne!(closes(&a), closes(&c));
    }
}
