use crate::*;
use common::{PaymentPeriod, Side, TradingPair};
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Exchange name is required")]
    MissingExchangeName,

    #[error("Exchange description is required")]
    MissingExchangeDescription,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("{field} must be strictly between 0 and 1, got: {value}")]
    InvalidRate { field: String, value: f64 },

    #[error("{field} must be a positive float")]
    InvalidPositiveFloat { field: String },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid amount '{value}' for {field}: digits with at most 8 decimal places expected")]
    InvalidAmount { field: String, value: String },

    #[error("Deposit wallet address is required")]
    MissingWalletAddress,

    #[error("Unsupported trading pair: {0}. Must be one of: BTC/USDC, ETH/USDC, ETH/BTC")]
    UnsupportedPair(String),

    #[error("Unsupported direction: {0}. Must be one of: buy, sell")]
    UnsupportedDirection(String),

    #[error("Unsupported payment period: {0} days. Must be one of: 1, 2, 7, 14, 28")]
    UnsupportedPeriod(u32),

    #[error("Invalid candle interval: {0}. Must be one of: 1m, 5m, 15m, 1h, 4h, 1d")]
    InvalidCandleInterval(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Metrics port must be non-zero")]
    InvalidMetricsPort,

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

const CANDLE_INTERVALS: [&str; 6] = ["1m", "5m", "15m", "1h", "4h", "1d"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_exchange(&config.exchange, &mut report);

    match &config.pay_later {
        Some(pay_later) => validate_pay_later(pay_later, &mut report),
        None => report.add_default("pay_later", "built-in pay-later rates and defaults"),
    }

    match &config.market_data {
        Some(market_data) => validate_market_data(market_data, &mut report),
        None => report.add_default("market_data", "synthetic feed, 5000 ms ticks, 150 daily candles"),
    }

    match &config.order_book {
        Some(book) => validate_order_book(book, &mut report),
        None => report.add_default("order_book", "150 levels, 50 displayed rows"),
    }

    match &config.logging {
        Some(logging) => validate_logging(logging, &mut report),
        None => report.add_default("logging.format", "pretty"),
    }

    if let Some(monitoring) = &config.monitoring {
        if monitoring.metrics_enabled && monitoring.metrics_port == 0 {
            report.add_error(ValidationError::InvalidMetricsPort);
        }
    }

    report
}

fn validate_exchange(exchange: &ExchangeConfig, report: &mut ValidationReport) {
    if exchange.name.is_empty() {
        report.add_error(ValidationError::MissingExchangeName);
    }

    if exchange.description.is_empty() {
        report.add_error(ValidationError::MissingExchangeDescription);
    }

    let version_ok = Regex::new(r"^\d+\.\d+\.\d+$")
        .map(|re| re.is_match(&exchange.version))
        .unwrap_or(false);
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(exchange.version.clone()));
    }
}

fn validate_pay_later(pay_later: &PayLaterConfig, report: &mut ValidationReport) {
    validate_rate("pay_later.deposit_rate", pay_later.deposit_rate, report);
    validate_rate("pay_later.weekly_fee_rate", pay_later.weekly_fee_rate, report);

    let fallback = &pay_later.amount_fallback;
    if !is_positive(fallback.setup_amount) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "pay_later.amount_fallback.setup_amount".to_string(),
        });
    }
    if !is_positive(fallback.trade_amount) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "pay_later.amount_fallback.trade_amount".to_string(),
        });
    }
    if fallback.policy == FallbackPolicy::Substitute {
        report.add_warning(
            "pay_later.amount_fallback.policy",
            "Placeholder amounts are shown while amount fields are empty",
        );
    }

    if !is_amount_text(&pay_later.initial_trade_amount) {
        report.add_error(ValidationError::InvalidAmount {
            field: "pay_later.initial_trade_amount".to_string(),
            value: pay_later.initial_trade_amount.clone(),
        });
    }

    if pay_later.wallet_address.trim().is_empty() {
        report.add_error(ValidationError::MissingWalletAddress);
    } else if has_unresolved_env_vars(&pay_later.wallet_address) {
        report.add_error(ValidationError::InvalidEnvVar {
            var: pay_later.wallet_address.clone(),
            message: "wallet address placeholder was not substituted".to_string(),
        });
    }

    match pay_later.fallback_live_price {
        Some(price) if !is_positive(price) => {
            report.add_error(ValidationError::InvalidPositiveFloat {
                field: "pay_later.fallback_live_price".to_string(),
            });
        }
        None => report.add_warning(
            "pay_later.fallback_live_price",
            "Trades cannot be confirmed until the feed publishes a price",
        ),
        _ => {}
    }

    let defaults = &pay_later.defaults;
    if defaults.trading_pair.parse::<TradingPair>().is_err() {
        report.add_error(ValidationError::UnsupportedPair(defaults.trading_pair.clone()));
    }
    if defaults.direction.parse::<Side>().is_err() {
        report.add_error(ValidationError::UnsupportedDirection(defaults.direction.clone()));
    }
    if PaymentPeriod::from_days(defaults.payment_period_days).is_none() {
        report.add_error(ValidationError::UnsupportedPeriod(defaults.payment_period_days));
    }
}

fn validate_market_data(market_data: &MarketDataConfig, report: &mut ValidationReport) {
    if market_data.tick_interval_ms == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "market_data.tick_interval_ms".to_string(),
        });
    } else if market_data.tick_interval_ms < 1000 {
        report.add_warning(
            "market_data.tick_interval_ms",
            "Ticks faster than one second make the terminal view hard to read",
        );
    }

    if market_data.history_candles == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "market_data.history_candles".to_string(),
        });
    }

    if !CANDLE_INTERVALS.contains(&market_data.candle_interval.as_str()) {
        report.add_error(ValidationError::InvalidCandleInterval(
            market_data.candle_interval.clone(),
        ));
    }

    let generator = &market_data.generator;
    let positive_fields = [
        ("market_data.generator.history_base_price", generator.history_base_price),
        ("market_data.generator.history_base_range", generator.history_base_range),
        ("market_data.generator.history_wick", generator.history_wick),
        ("market_data.generator.history_body", generator.history_body),
        ("market_data.generator.tick_drift", generator.tick_drift),
        ("market_data.generator.tick_wick", generator.tick_wick),
        ("market_data.generator.tick_body", generator.tick_body),
    ];
    for (field, value) in positive_fields {
        if !is_positive(value) {
            report.add_error(ValidationError::InvalidPositiveFloat {
                field: field.to_string(),
            });
        }
    }
}

fn validate_order_book(book: &OrderBookConfig, report: &mut ValidationReport) {
    if book.levels == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "order_book.levels".to_string(),
        });
    }

    if book.display_rows > book.levels {
        report.add_warning(
            "order_book.display_rows",
            "More rows requested than levels generated; all levels will be shown",
        );
    }

    for (field, value) in [
        ("order_book.base_price", book.base_price),
        ("order_book.bid_step", book.bid_step),
        ("order_book.ask_step", book.ask_step),
        ("order_book.trade_step", book.trade_step),
    ] {
        if !is_positive(value) {
            report.add_error(ValidationError::InvalidPositiveFloat {
                field: field.to_string(),
            });
        }
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_rate(field: &str, value: f64, report: &mut ValidationReport) {
    if !(value > 0.0 && value < 1.0) {
        report.add_error(ValidationError::InvalidRate {
            field: field.to_string(),
            value,
        });
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_amount_text(value: &str) -> bool {
    let shape_ok = Regex::new(r"^\d*\.?\d{0,8}$")
        .map(|re| re.is_match(value))
        .unwrap_or(false);
    shape_ok && value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> MasterConfig {
        generate_default_config()
    }

    #[test]
    fn test_defaults_are_reported_for_missing_sections() {
        let mut config = base_config();
        config.pay_later = None;
        config.market_data = None;

        let report = validate_config(&config);

        assert!(report.is_valid());
        assert!(report.defaults_applied.iter().any(|d| d.field == "pay_later"));
        assert!(report.defaults_applied.iter().any(|d| d.field == "market_data"));
    }

    #[test]
    fn test_invalid_rates() {
        let mut config = base_config();
        let mut pay_later = config.pay_later();
        pay_later.deposit_rate = 1.2;
        pay_later.weekly_fee_rate = 0.0;
        config.pay_later = Some(pay_later);

        let report = validate_config(&config);

        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| matches!(e, ValidationError::InvalidRate { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_defaults() {
        let mut config = base_config();
        let mut pay_later = config.pay_later();
        pay_later.defaults.trading_pair = "SOL/USDC".to_string();
        pay_later.defaults.direction = "hold".to_string();
        pay_later.defaults.payment_period_days = 3;
        config.pay_later = Some(pay_later);

        let report = validate_config(&config);

        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::UnsupportedPair(_))));
        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::UnsupportedDirection(_))));
        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::UnsupportedPeriod(3))));
    }

    #[test]
    fn test_invalid_initial_trade_amount() {
        let mut config = base_config();
        let mut pay_later = config.pay_later();
        pay_later.initial_trade_amount = "0.123456789".to_string();
        config.pay_later = Some(pay_later);

        let report = validate_config(&config);

        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::InvalidAmount { .. })));
    }

    #[test]
    fn test_unresolved_wallet_address() {
        let mut config = base_config();
        let mut pay_later = config.pay_later();
        pay_later.wallet_address = "${OPENX_WALLET}".to_string();
        config.pay_later = Some(pay_later);

        let report = validate_config(&config);

        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_market_data_errors() {
        let mut config = base_config();
        let mut market_data = config.market_data();
        market_data.tick_interval_ms = 0;
        market_data.candle_interval = "2d".to_string();
        market_data.generator.tick_body = -1.0;
        config.market_data = Some(market_data);

        let report = validate_config(&config);

        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_fast_ticks_warn() {
        let mut config = base_config();
        let mut market_data = config.market_data();
        market_data.tick_interval_ms = 250;
        config.market_data = Some(market_data);

        let report = validate_config(&config);

        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.field == "market_data.tick_interval_ms"));
    }

    #[test]
    fn test_exchange_section_raises_no_warnings() {
        let report = validate_config(&base_config());

        assert!(report.is_valid());
        assert!(!report.warnings.iter().any(|w| w.field.starts_with("exchange")));
    }

    #[test]
    fn test_bad_version_and_log_format() {
        let mut config = base_config();
        config.exchange.version = "v1".to_string();
        config.logging = Some(LoggingConfig {
            format: "xml".to_string(),
        });

        let report = validate_config(&config);

        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::InvalidVersionFormat(_))));
        assert!(report.errors.iter().any(|e| matches!(e, ValidationError::InvalidLogFormat(_))));
    }
}
