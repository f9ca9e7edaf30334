use crate::error::MarketDataError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    FourHours,
    OneDay,
}

impl CandleInterval {
    pub fn as_seconds(&self) -> i64 {
        match self {
            CandleInterval::OneMinute => 60,
            CandleInterval::FiveMinutes => 300,
            CandleInterval::FifteenMinutes => 900,
            CandleInterval::OneHour => 3600,
            CandleInterval::FourHours => 14400,
            CandleInterval::OneDay => 86400,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.as_seconds())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "1m",
            CandleInterval::FiveMinutes => "5m",
            CandleInterval::FifteenMinutes => "15m",
            CandleInterval::OneHour => "1h",
            CandleInterval::FourHours => "4h",
            CandleInterval::OneDay => "1d",
        }
    }

    /// Start of the interval bucket containing `timestamp`
    pub fn open_time_of(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let seconds = timestamp.timestamp();
        let interval_seconds = self.as_seconds();
        let open_seconds = seconds.div_euclid(interval_seconds) * interval_seconds;
        Utc.timestamp_opt(open_seconds, 0).single().unwrap_or(timestamp)
    }
}

impl FromStr for CandleInterval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(CandleInterval::OneMinute),
            "5m" => Ok(CandleInterval::FiveMinutes),
            "15m" => Ok(CandleInterval::FifteenMinutes),
            "1h" => Ok(CandleInterval::OneHour),
            "4h" => Ok(CandleInterval::FourHours),
            "1d" => Ok(CandleInterval::OneDay),
            other => Err(MarketDataError::InvalidInterval(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub open_time: DateTime<Utc>,
    pub interval: CandleInterval,
}

impl Candle {
    /// Build a candle, widening high/low so they contain open and close
    pub fn new(
        open_time: DateTime<Utc>,
        interval: CandleInterval,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            open,
            high: high.max(open).max(close),
            low: low.min(open).min(close),
            close,
            open_time,
            interval,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn next_open_time(&self) -> DateTime<Utc> {
        self.open_time + self.interval.as_duration()
    }

    pub fn is_closed(&self, current_time: DateTime<Utc>) -> bool {
        let elapsed = (current_time - self.open_time).num_seconds();
        elapsed >= self.interval.as_seconds()
    }
}

/// Rolling window of candles, oldest first
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: VecDeque<Candle>,
    max_len: usize,
}

impl CandleSeries {
    pub fn new(max_len: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(max_len.min(4096)),
            max_len: max_len.max(1),
        }
    }

    pub fn from_history(history: Vec<Candle>, max_len: usize) -> Self {
        let mut series = Self::new(max_len);
        for candle in history {
            series.push(candle);
        }
        series
    }

    /// Append a candle, evicting the oldest when the window is full
    pub fn push(&mut self, candle: Candle) {
        if self.candles.len() == self.max_len {
            self.candles.pop_front();
        }
        self.candles.push_back(candle);
    }

    pub fn latest(&self) -> Option<Candle> {
        self.candles.back().copied()
    }

    /// Most recent `limit` candles, oldest first; all of them when `limit` is 0
    pub fn get_candles(&self, limit: usize) -> Vec<Candle> {
        let skip = if limit > 0 && self.candles.len() > limit {
            self.candles.len() - limit
        } else {
            0
        };
        self.candles.iter().skip(skip).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle_at(day: i64, close: f64) -> Candle {
        let open_time = Utc.timestamp_opt(day * 86400, 0).unwrap();
        Candle::new(open_time, CandleInterval::OneDay, close, close, close, close)
    }

    #[test]
    fn test_candle_widens_wicks() {
        let time = Utc::now();
        let candle = Candle::new(time, CandleInterval::OneDay, 100.0, 99.0, 101.0, 102.0);

        assert!((candle.high - 102.0).abs() < 1e-9);
        assert!((candle.low - 100.0).abs() < 1e-9);
        assert!(candle.is_bullish());
    }

    #[test]
    fn test_next_open_time() {
        let candle = candle_at(10, 1.0);
        assert_eq!(candle.next_open_time(), candle_at(11, 1.0).open_time);
    }

    #[test]
    fn test_is_closed() {
        let candle = candle_at(10, 1.0);
        assert!(!candle.is_closed(candle.open_time + Duration::hours(23)));
        assert!(candle.is_closed(candle.open_time + Duration::hours(24)));
    }

    #[test]
    fn test_series_eviction() {
        let mut series = CandleSeries::new(3);
        for day in 0..5 {
            series.push(candle_at(day, day as f64));
        }

        assert_eq!(series.len(), 3);
        let closes: Vec<f64> = series.get_candles(0).iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_series_limit() {
        let series = CandleSeries::from_history((0..10).map(|d| candle_at(d, d as f64)).collect(), 100);

        let last = series.get_candles(4);
        assert_eq!(last.len(), 4);
        assert!((last[0].close - 6.0).abs() < 1e-9);
        assert!((series.latest().unwrap().close - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_time_alignment() {
        let ts = Utc.timestamp_opt(3 * 3600 + 125, 0).unwrap();
        let aligned = CandleInterval::OneHour.open_time_of(ts);
        assert_eq!(aligned.timestamp(), 3 * 3600);
    }

    #[test]
    fn test_candle_interval_str() {
        assert_eq!(CandleInterval::OneMinute.as_str(), "1m");
        assert_eq!(CandleInterval::OneHour.as_str(), "1h");
        assert_eq!("1d".parse::<CandleInterval>().unwrap(), CandleInterval::OneDay);
        assert!("2d".parse::<CandleInterval>().is_err());
    }
}
