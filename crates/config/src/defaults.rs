pub fn default_deposit_rate() -> f64 {
    0.15
}

pub fn default_weekly_fee_rate() -> f64 {
    0.009
}

pub fn default_setup_fallback_amount() -> f64 {
    1.5
}

pub fn default_trade_fallback_amount() -> f64 {
    0.28872549
}

pub fn default_initial_trade_amount() -> String {
    "0.28872549".to_string()
}

pub fn default_wallet_address() -> String {
    "daDR23762309fDGhfjalf68dd983753FD2".to_string()
}

pub fn default_fallback_live_price() -> Option<f64> {
    Some(2856.42)
}

pub fn default_trading_pair() -> String {
    "BTC/USDC".to_string()
}

pub fn default_direction() -> String {
    "sell".to_string()
}

pub fn default_payment_period_days() -> u32 {
    14
}

pub fn default_feed_symbol() -> String {
    "BTC/USDC".to_string()
}

pub fn default_tick_interval_ms() -> u64 {
    5000
}

pub fn default_history_candles() -> usize {
    150
}

pub fn default_candle_interval() -> String {
    "1d".to_string()
}

pub fn default_history_base_price() -> f64 {
    105_000.0
}

pub fn default_history_base_range() -> f64 {
    10_000.0
}

pub fn default_history_wick() -> f64 {
    2_000.0
}

pub fn default_history_body() -> f64 {
    1_000.0
}

pub fn default_tick_drift() -> f64 {
    1_000.0
}

pub fn default_tick_wick() -> f64 {
    1_000.0
}

pub fn default_tick_body() -> f64 {
    500.0
}

pub fn default_base_asset() -> String {
    "BTC".to_string()
}

pub fn default_book_levels() -> usize {
    150
}

pub fn default_display_rows() -> usize {
    50
}

pub fn default_book_base_price() -> f64 {
    112_000.0
}

pub fn default_bid_step() -> f64 {
    10.0
}

pub fn default_ask_step() -> f64 {
    12.0
}

pub fn default_trade_step() -> f64 {
    7.0
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
