//! Common types used across OpenExchange
//!
//! This module provides the fundamental domain types used throughout
//! the exchange system.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trade direction (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy the base asset
    Buy,
    /// Sell the base asset
    #[default]
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Returns true if this is a buy
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Returns true if this is a sell
    pub fn is_sell(&self) -> bool {
        matches!(self, Side::Sell)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            other => Err(Error::invalid_input(format!(
                "unknown direction '{}', expected buy or sell",
                other
            ))),
        }
    }
}

/// Asset symbol (e.g., "BTC", "USDC")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a new Symbol
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Separator between base and quote in a pair's display form
pub const PAIR_SEPARATOR: char = '/';

/// Trading pairs offered by the pay-later desk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradingPair {
    #[default]
    #[serde(rename = "BTC/USDC")]
    BtcUsdc,
    #[serde(rename = "ETH/USDC")]
    EthUsdc,
    #[serde(rename = "ETH/BTC")]
    EthBtc,
}

impl TradingPair {
    /// All supported pairs, in display order
    pub const ALL: [TradingPair; 3] = [
        TradingPair::BtcUsdc,
        TradingPair::EthUsdc,
        TradingPair::EthBtc,
    ];

    /// Display form, e.g. "BTC/USDC"
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingPair::BtcUsdc => "BTC/USDC",
            TradingPair::EthUsdc => "ETH/USDC",
            TradingPair::EthBtc => "ETH/BTC",
        }
    }

    /// Split the pair into `(base, quote)` on its separator
    pub fn split(&self) -> (Symbol, Symbol) {
        let mut parts = self.as_str().splitn(2, PAIR_SEPARATOR);
        let base = parts.next().unwrap_or_default();
        let quote = parts.next().unwrap_or_default();
        (Symbol::new(base), Symbol::new(quote))
    }

    /// Base asset (e.g., BTC in BTC/USDC)
    pub fn base(&self) -> Symbol {
        self.split().0
    }

    /// Quote asset (e.g., USDC in BTC/USDC)
    pub fn quote(&self) -> Symbol {
        self.split().1
    }
}

impl std::fmt::Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradingPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "/");
        TradingPair::ALL
            .into_iter()
            .find(|pair| pair.as_str() == normalized)
            .ok_or_else(|| Error::UnsupportedPair(s.to_string()))
    }
}

/// Repayment period offered for pay-later trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum PaymentPeriod {
    OneDay,
    TwoDays,
    SevenDays,
    #[default]
    FourteenDays,
    TwentyEightDays,
}

impl PaymentPeriod {
    /// All supported periods, shortest first
    pub const ALL: [PaymentPeriod; 5] = [
        PaymentPeriod::OneDay,
        PaymentPeriod::TwoDays,
        PaymentPeriod::SevenDays,
        PaymentPeriod::FourteenDays,
        PaymentPeriod::TwentyEightDays,
    ];

    /// Number of days until repayment
    pub fn days(&self) -> u32 {
        match self {
            PaymentPeriod::OneDay => 1,
            PaymentPeriod::TwoDays => 2,
            PaymentPeriod::SevenDays => 7,
            PaymentPeriod::FourteenDays => 14,
            PaymentPeriod::TwentyEightDays => 28,
        }
    }

    /// Look up a period by its day count
    pub fn from_days(days: u32) -> Option<Self> {
        PaymentPeriod::ALL.into_iter().find(|p| p.days() == days)
    }
}

impl std::fmt::Display for PaymentPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.days() {
            1 => write!(f, "1 day"),
            n => write!(f, "{} days", n),
        }
    }
}

impl FromStr for PaymentPeriod {
    type Err = Error;

    /// Accepts "14", "14d", "14 days" or "1 day"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        digits
            .parse::<u32>()
            .ok()
            .and_then(PaymentPeriod::from_days)
            .ok_or_else(|| Error::UnsupportedPeriod(s.to_string()))
    }
}

impl TryFrom<u32> for PaymentPeriod {
    type Error = Error;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        PaymentPeriod::from_days(days).ok_or_else(|| Error::UnsupportedPeriod(days.to_string()))
    }
}

impl From<PaymentPeriod> for u32 {
    fn from(period: PaymentPeriod) -> Self {
        period.days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert!(Side::Buy.is_buy());
        assert!(Side::Sell.is_sell());
        assert_eq!(Side::default(), Side::Sell);
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("BUY".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" sell ".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn test_symbol() {
        let sym = Symbol::new("btc");
        assert_eq!(sym.as_str(), "BTC");
    }

    #[test]
    fn test_trading_pair_split() {
        let (base, quote) = TradingPair::EthBtc.split();
        assert_eq!(base.as_str(), "ETH");
        assert_eq!(quote.as_str(), "BTC");
        assert_eq!(TradingPair::BtcUsdc.quote().as_str(), "USDC");
    }

    #[test]
    fn test_trading_pair_from_str() {
        assert_eq!("eth/usdc".parse::<TradingPair>().unwrap(), TradingPair::EthUsdc);
        assert_eq!("BTC-USDC".parse::<TradingPair>().unwrap(), TradingPair::BtcUsdc);
        assert!("SOL/USDC".parse::<TradingPair>().is_err());
    }

    #[test]
    fn test_trading_pair_serde() {
        let json = serde_json::to_string(&TradingPair::EthBtc).unwrap();
        assert_eq!(json, "\"ETH/BTC\"");
    }

    #[test]
    fn test_payment_period() {
        assert_eq!(PaymentPeriod::default().days(), 14);
        assert_eq!("28 days".parse::<PaymentPeriod>().unwrap(), PaymentPeriod::TwentyEightDays);
        assert_eq!("7d".parse::<PaymentPeriod>().unwrap(), PaymentPeriod::SevenDays);
        assert!("3".parse::<PaymentPeriod>().is_err());
        assert_eq!(PaymentPeriod::OneDay.to_string(), "1 day");
        assert_eq!(PaymentPeriod::TwoDays.to_string(), "2 days");
    }

    #[test]
    fn test_payment_period_serde() {
        let json = serde_json::to_string(&PaymentPeriod::SevenDays).unwrap();
        assert_eq!(json, "7");
        let parsed: PaymentPeriod = serde_json::from_str("28").unwrap();
        assert_eq!(parsed, PaymentPeriod::TwentyEightDays);
        assert!(serde_json::from_str::<PaymentPeriod>("5").is_err());
    }
}
