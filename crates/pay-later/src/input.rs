//! Decimal amount entry

use crate::schedule::AMOUNT_DECIMALS;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

fn amount_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(&format!(r"^\d*\.?\d{{0,{}}}$", AMOUNT_DECIMALS)).ok())
        .as_ref()
}

/// Text typed into an amount field
///
/// Only digits with at most one decimal point and at most 8 fractional
/// digits are accepted. The empty string is a valid, unset amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AmountInput(String);

impl AmountInput {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `None` when `text` would not be accepted as typed
    pub fn new(text: &str) -> Option<Self> {
        Self::is_acceptable(text).then(|| Self(text.to_string()))
    }

    pub fn is_acceptable(text: &str) -> bool {
        amount_pattern().is_some_and(|re| re.is_match(text))
    }

    /// Amount from a number, rounded to the input precision
    pub fn from_value(value: f64) -> Self {
        let text = format!("{:.*}", AMOUNT_DECIMALS as usize, value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        if text.is_empty() {
            Self("0".to_string())
        } else {
            Self(text.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `None` for the empty string and a lone "."
    pub fn parse(&self) -> Option<f64> {
        if self.0.is_empty() || self.0 == "." {
            return None;
        }
        self.0.parse::<f64>().ok()
    }

    /// Parsed and strictly greater than zero
    pub fn positive(&self) -> Option<f64> {
        self.parse().filter(|v| *v > 0.0)
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_text() {
        for text in ["", "0", "1", "1.", ".5", "1.5", "0.28872549", "12345678.12345678"] {
            assert!(AmountInput::new(text).is_some(), "{text} should be accepted");
        }
    }

    #[test]
    fn test_rejected_text() {
        for text in ["-1", "1.123456789", "1..2", "1.2.3", "abc", "1e5", " 1", "1,5"] {
            assert!(AmountInput::new(text).is_none(), "{text} should be rejected");
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(AmountInput::empty().parse(), None);
        assert_eq!(AmountInput::new(".").unwrap().parse(), None);
        assert_eq!(AmountInput::new("1.").unwrap().parse(), Some(1.0));
        assert_eq!(AmountInput::new(".5").unwrap().parse(), Some(0.5));
        assert_eq!(AmountInput::new("0").unwrap().positive(), None);
        assert_eq!(AmountInput::new("0.00000001").unwrap().positive(), Some(0.00000001));
    }

    #[test]
    fn test_from_value() {
        assert_eq!(AmountInput::from_value(0.28872549).as_str(), "0.28872549");
        assert_eq!(AmountInput::from_value(1.5).as_str(), "1.5");
        assert_eq!(AmountInput::from_value(2.0).as_str(), "2");
        assert_eq!(AmountInput::from_value(0.0).as_str(), "0");
    }
}
