use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub pay_later: Option<PayLaterConfig>,
    #[serde(default)]
    pub market_data: Option<MarketDataConfig>,
    #[serde(default)]
    pub order_book: Option<OrderBookConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub monitoring: Option<MonitoringConfig>,
}

impl MasterConfig {
    /// Pay-later settings, falling back to built-in defaults when the section is absent
    pub fn pay_later(&self) -> PayLaterConfig {
        self.pay_later.clone().unwrap_or_default()
    }

    pub fn market_data(&self) -> MarketDataConfig {
        self.market_data.clone().unwrap_or_default()
    }

    pub fn order_book(&self) -> OrderBookConfig {
        self.order_book.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// What the workflow does when an amount field is empty or unparsable
/// while computing derived figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Substitute the configured placeholder amount
    #[default]
    Substitute,
    /// Surface the validation error instead of a figure
    Reject,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AmountFallbackConfig {
    #[serde(default)]
    pub policy: FallbackPolicy,
    /// Placeholder used for the transfer amount while setting up
    #[serde(default = "default_setup_fallback_amount")]
    pub setup_amount: f64,
    /// Placeholder used for the trade amount after the transfer is confirmed
    #[serde(default = "default_trade_fallback_amount")]
    pub trade_amount: f64,
}

impl Default for AmountFallbackConfig {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::default(),
            setup_amount: default_setup_fallback_amount(),
            trade_amount: default_trade_fallback_amount(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PayLaterConfig {
    /// Fraction of the total payment due upfront
    #[serde(default = "default_deposit_rate")]
    pub deposit_rate: f64,
    /// Fee charged per week on the financed part; the daily rate is this over 7
    #[serde(default = "default_weekly_fee_rate")]
    pub weekly_fee_rate: f64,
    #[serde(default)]
    pub amount_fallback: AmountFallbackConfig,
    /// Trade amount proposed once the transfer is confirmed (clamped to the transfer)
    #[serde(default = "default_initial_trade_amount")]
    pub initial_trade_amount: String,
    /// Deposit address shown to the user during setup
    #[serde(default = "default_wallet_address")]
    pub wallet_address: String,
    /// Live price assumed when the feed has not produced a sample yet
    #[serde(default = "default_fallback_live_price")]
    pub fallback_live_price: Option<f64>,
    #[serde(default)]
    pub defaults: WorkflowDefaults,
}

impl Default for PayLaterConfig {
    fn default() -> Self {
        Self {
            deposit_rate: default_deposit_rate(),
            weekly_fee_rate: default_weekly_fee_rate(),
            amount_fallback: AmountFallbackConfig::default(),
            initial_trade_amount: default_initial_trade_amount(),
            wallet_address: default_wallet_address(),
            fallback_live_price: default_fallback_live_price(),
            defaults: WorkflowDefaults::default(),
        }
    }
}

/// Field values a freshly opened workflow starts with
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowDefaults {
    #[serde(default = "default_trading_pair")]
    pub trading_pair: String,
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default = "default_payment_period_days")]
    pub payment_period_days: u32,
}

impl Default for WorkflowDefaults {
    fn default() -> Self {
        Self {
            trading_pair: default_trading_pair(),
            direction: default_direction(),
            payment_period_days: default_payment_period_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketDataConfig {
    /// Instrument label the synthetic feed publishes under
    #[serde(default = "default_feed_symbol")]
    pub symbol: String,
    #[serde(rename = "tick_interval_ms")]
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(rename = "history_candles")]
    #[serde(default = "default_history_candles")]
    pub history_candles: usize,
    #[serde(rename = "candle_interval")]
    #[serde(default = "default_candle_interval")]
    pub candle_interval: String,
    /// Fixed seed for reproducible runs; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub generator: CandleGeneratorConfig,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            symbol: default_feed_symbol(),
            tick_interval_ms: default_tick_interval_ms(),
            history_candles: default_history_candles(),
            candle_interval: default_candle_interval(),
            seed: None,
            generator: CandleGeneratorConfig::default(),
        }
    }
}

/// Shape parameters of the random candle walk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandleGeneratorConfig {
    #[serde(default = "default_history_base_price")]
    pub history_base_price: f64,
    #[serde(default = "default_history_base_range")]
    pub history_base_range: f64,
    #[serde(default = "default_history_wick")]
    pub history_wick: f64,
    #[serde(default = "default_history_body")]
    pub history_body: f64,
    #[serde(default = "default_tick_drift")]
    pub tick_drift: f64,
    #[serde(default = "default_tick_wick")]
    pub tick_wick: f64,
    #[serde(default = "default_tick_body")]
    pub tick_body: f64,
}

impl Default for CandleGeneratorConfig {
    fn default() -> Self {
        Self {
            history_base_price: default_history_base_price(),
            history_base_range: default_history_base_range(),
            history_wick: default_history_wick(),
            history_body: default_history_body(),
            tick_drift: default_tick_drift(),
            tick_wick: default_tick_wick(),
            tick_body: default_tick_body(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderBookConfig {
    #[serde(default = "default_base_asset")]
    pub base_asset: String,
    #[serde(default = "default_book_levels")]
    pub levels: usize,
    #[serde(rename = "display_rows")]
    #[serde(default = "default_display_rows")]
    pub display_rows: usize,
    #[serde(default = "default_book_base_price")]
    pub base_price: f64,
    #[serde(default = "default_bid_step")]
    pub bid_step: f64,
    #[serde(default = "default_ask_step")]
    pub ask_step: f64,
    #[serde(default = "default_trade_step")]
    pub trade_step: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            base_asset: default_base_asset(),
            levels: default_book_levels(),
            display_rows: default_display_rows(),
            base_price: default_book_base_price(),
            bid_step: default_bid_step(),
            ask_step: default_ask_step(),
            trade_step: default_trade_step(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub metrics_enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_master_config() {
        let yaml = include_str!("../../../master_config/master_config.yaml");

        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.exchange.name, "OpenExchange Pay Later");

        let pay_later = cfg.pay_later();
        assert!((pay_later.deposit_rate - 0.15).abs() < 1e-12);
        assert!((pay_later.weekly_fee_rate - 0.009).abs() < 1e-12);
        assert_eq!(pay_later.amount_fallback.policy, FallbackPolicy::Substitute);
        assert_eq!(pay_later.initial_trade_amount, "0.28872549");
        assert_eq!(pay_later.defaults.payment_period_days, 14);

        let market_data = cfg.market_data();
        assert_eq!(market_data.tick_interval_ms, 5000);
        assert_eq!(market_data.history_candles, 150);
        assert_eq!(market_data.candle_interval, "1d");

        let book = cfg.order_book();
        assert_eq!(book.levels, 150);
        assert_eq!(book.display_rows, 50);

        assert!(cfg.monitoring.is_some());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml = r#"
exchange:
  name: Mock
  description: Mock exchange
  version: 0.1.0
"#;
        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(cfg.pay_later.is_none());
        let pay_later = cfg.pay_later();
        assert_eq!(pay_later.wallet_address, "daDR23762309fDGhfjalf68dd983753FD2");
        assert_eq!(pay_later.fallback_live_price, Some(2856.42));
        assert_eq!(cfg.logging().format, "pretty");
    }

    #[test]
    fn test_legacy_exchange_keys_are_ignored() {
        let yaml = r#"
exchange:
  name: Mock
  description: Mock exchange
  version: 0.1.0
  mode: production
"#;
        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.exchange.name, "Mock");
        assert!(!serde_yaml::to_string(&cfg).unwrap().contains("mode"));
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let yaml = r#"
exchange:
  name: Mock
  description: Mock exchange
  version: 0.1.0
pay_later:
  amount_fallback:
    policy: reject
market_data:
  seed: 7
"#;
        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();

        let pay_later = cfg.pay_later();
        assert_eq!(pay_later.amount_fallback.policy, FallbackPolicy::Reject);
        assert!((pay_later.amount_fallback.setup_amount - 1.5).abs() < 1e-12);
        assert_eq!(cfg.market_data().seed, Some(7));
        assert_eq!(cfg.market_data().tick_interval_ms, 5000);
    }
}
