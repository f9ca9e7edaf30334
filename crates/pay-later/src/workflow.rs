//! Three-step pay-later workflow
//!
//! ```text
//! SETUP --advance--> TRANSFER_CONFIRM --advance--> TRADE_CONFIRMED
//!   ^                                                     |
//!   +------------------------- close --------------------+
//! ```
//!
//! SETUP collects the pair, direction, period and transfer amount.
//! TRANSFER_CONFIRM lets the user pick how much of the transfer to trade.
//! Entering TRADE_CONFIRMED freezes the settlement price from the live
//! feed; every figure shown afterwards uses that frozen price.
//!
//! Field edits that break a rule are ignored and reported through
//! [`EditOutcome::Ignored`]; they never change state.

use crate::clipboard::{Clipboard, Notification};
use crate::conversion::{convert, payment_currency, received_currency, Conversion};
use crate::error::PayLaterError;
use crate::input::AmountInput;
use crate::schedule::{FeeSchedule, PaymentSchedule};
use crate::Result;
use common::{PaymentPeriod, PriceSource, Side, Symbol, TradingPair};
use config::{AmountFallbackConfig, FallbackPolicy, PayLaterConfig};
use observability::WorkflowMetrics;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Setup,
    TransferConfirm,
    TradeConfirmed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Setup => "SETUP",
            Step::TransferConfirm => "TRANSFER_CONFIRM",
            Step::TradeConfirmed => "TRADE_CONFIRMED",
        }
    }

    /// Metric label value
    fn label(&self) -> &'static str {
        match self {
            Step::Setup => "setup",
            Step::TransferConfirm => "transfer_confirm",
            Step::TradeConfirmed => "trade_confirmed",
        }
    }

    /// 1-based position shown to the user
    pub fn number(&self) -> u8 {
        match self {
            Step::Setup => 1,
            Step::TransferConfirm => 2,
            Step::TradeConfirmed => 3,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editable fields of the workflow form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TradingPair,
    Direction,
    PaymentPeriod,
    TransferAmount,
    TradeAmount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TradingPair => "trading pair",
            Field::Direction => "direction",
            Field::PaymentPeriod => "payment period",
            Field::TransferAmount => "transfer amount",
            Field::TradeAmount => "trade amount",
        }
    }

    /// Whether `step` allows editing this field
    pub fn editable_in(&self, step: Step) -> bool {
        match step {
            Step::Setup => !matches!(self, Field::TradeAmount),
            Step::TransferConfirm => matches!(self, Field::PaymentPeriod | Field::TradeAmount),
            Step::TradeConfirmed => false,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The edit broke a rule and state is unchanged
    Ignored(String),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// What derived figures use when the relevant amount field is empty or zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountFallback {
    Substitute { setup: f64, trade: f64 },
    Reject,
}

impl Default for AmountFallback {
    fn default() -> Self {
        AmountFallback::from_config(&AmountFallbackConfig::default())
    }
}

impl AmountFallback {
    pub fn from_config(config: &AmountFallbackConfig) -> Self {
        match config.policy {
            FallbackPolicy::Substitute => AmountFallback::Substitute {
                setup: config.setup_amount,
                trade: config.trade_amount,
            },
            FallbackPolicy::Reject => AmountFallback::Reject,
        }
    }

    /// A substituted trade amount never exceeds `ceiling`, the transfer
    fn resolve(&self, input: &AmountInput, step: Step, ceiling: Option<f64>) -> Result<f64> {
        if let Some(value) = input.positive() {
            return Ok(value);
        }
        match (self, step) {
            (AmountFallback::Substitute { setup, .. }, Step::Setup) => Ok(*setup),
            (AmountFallback::Substitute { trade, .. }, _) => {
                Ok(ceiling.map_or(*trade, |max| trade.min(max)))
            }
            (AmountFallback::Reject, _) => Err(PayLaterError::InvalidAmount(format!(
                "'{}' is not a positive amount",
                input
            ))),
        }
    }
}

/// Static inputs of a workflow instance
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub schedule: FeeSchedule,
    pub fallback: AmountFallback,
    /// Proposed trade amount on entering TRANSFER_CONFIRM
    pub initial_trade_amount: AmountInput,
    pub wallet_address: String,
    /// Settlement price used when the feed has no sample
    pub fallback_live_price: Option<f64>,
    pub default_pair: TradingPair,
    pub default_direction: Side,
    pub default_period: PaymentPeriod,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        let config = PayLaterConfig::default();
        Self {
            schedule: FeeSchedule::default(),
            fallback: AmountFallback::default(),
            initial_trade_amount: AmountInput::new(&config.initial_trade_amount).unwrap_or_default(),
            wallet_address: config.wallet_address,
            fallback_live_price: config.fallback_live_price,
            default_pair: TradingPair::default(),
            default_direction: Side::default(),
            default_period: PaymentPeriod::default(),
        }
    }
}

impl WorkflowSettings {
    pub fn from_config(config: &PayLaterConfig) -> Result<Self> {
        let initial_trade_amount = AmountInput::new(&config.initial_trade_amount).ok_or_else(|| {
            PayLaterError::Config(format!(
                "initial_trade_amount '{}' is not a decimal with at most 8 places",
                config.initial_trade_amount
            ))
        })?;
        let default_period = PaymentPeriod::try_from(config.defaults.payment_period_days)?;

        Ok(Self {
            schedule: FeeSchedule::from_config(config)?,
            fallback: AmountFallback::from_config(&config.amount_fallback),
            initial_trade_amount,
            wallet_address: config.wallet_address.clone(),
            fallback_live_price: config.fallback_live_price,
            default_pair: config.defaults.trading_pair.parse()?,
            default_direction: config.defaults.direction.parse()?,
            default_period,
        })
    }
}

/// Form and progress of one workflow instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowState {
    pub step: Step,
    pub trading_pair: TradingPair,
    pub direction: Side,
    pub payment_period: PaymentPeriod,
    pub transfer_amount: AmountInput,
    pub trade_amount: AmountInput,
    /// Set once on entering TRADE_CONFIRMED
    pub settlement_price: Option<f64>,
}

impl WorkflowState {
    fn initial(settings: &WorkflowSettings) -> Self {
        Self {
            step: Step::Setup,
            trading_pair: settings.default_pair,
            direction: settings.default_direction,
            payment_period: settings.default_period,
            transfer_amount: AmountInput::empty(),
            trade_amount: AmountInput::empty(),
            settlement_price: None,
        }
    }
}

/// Figures shown live while the user fills in SETUP or TRANSFER_CONFIRM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub step: Step,
    pub trading_pair: TradingPair,
    pub direction: Side,
    pub payment_period: PaymentPeriod,
    /// Amount the schedule was computed from, after any fallback
    pub amount: f64,
    pub schedule: PaymentSchedule,
    pub payment_currency: Symbol,
    pub live_price: Option<f64>,
}

/// Summary shown once the trade is confirmed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub trading_pair: TradingPair,
    pub settlement_price: f64,
    pub direction: Side,
    pub payment_period: PaymentPeriod,
    pub deposit_amount: f64,
    pub transaction_fee: f64,
    pub total_payment: f64,
    pub remaining_payment: f64,
    pub asset_received: f64,
    pub payment_currency: Symbol,
    pub received_currency: Symbol,
}

pub struct PayLaterWorkflow {
    settings: WorkflowSettings,
    prices: Arc<dyn PriceSource>,
    clipboard: Arc<dyn Clipboard>,
    metrics: WorkflowMetrics,
    state: WorkflowState,
}

impl PayLaterWorkflow {
    pub fn new(
        settings: WorkflowSettings,
        prices: Arc<dyn PriceSource>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let state = WorkflowState::initial(&settings);
        Self {
            settings,
            prices,
            clipboard,
            metrics: WorkflowMetrics::new(),
            state,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn trading_pair(&self) -> TradingPair {
        self.state.trading_pair
    }

    pub fn direction(&self) -> Side {
        self.state.direction
    }

    pub fn payment_period(&self) -> PaymentPeriod {
        self.state.payment_period
    }

    pub fn transfer_amount(&self) -> &AmountInput {
        &self.state.transfer_amount
    }

    pub fn trade_amount(&self) -> &AmountInput {
        &self.state.trade_amount
    }

    pub fn settlement_price(&self) -> Option<f64> {
        self.state.settlement_price
    }

    pub fn wallet_address(&self) -> &str {
        &self.settings.wallet_address
    }

    pub fn payment_currency(&self) -> Symbol {
        payment_currency(self.state.direction, self.state.trading_pair)
    }

    pub fn received_currency(&self) -> Symbol {
        received_currency(self.state.direction, self.state.trading_pair)
    }

    /// Latest price from the feed; ignores non-positive samples
    pub fn live_price(&self) -> Option<f64> {
        self.prices
            .latest_price()
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    /// The confirmed transfer, shown as "total funds available"
    pub fn funds_available(&self) -> Option<f64> {
        match self.state.step {
            Step::Setup => None,
            _ => self.state.transfer_amount.positive(),
        }
    }

    pub fn set_trading_pair(&mut self, pair: TradingPair) -> EditOutcome {
        if let Some(ignored) = self.check_editable(Field::TradingPair) {
            return ignored;
        }
        self.state.trading_pair = pair;
        debug!(pair = %pair, "Trading pair changed");
        EditOutcome::Applied
    }

    pub fn set_direction(&mut self, direction: Side) -> EditOutcome {
        if let Some(ignored) = self.check_editable(Field::Direction) {
            return ignored;
        }
        self.state.direction = direction;
        debug!(direction = %direction, "Direction changed");
        EditOutcome::Applied
    }

    pub fn set_payment_period(&mut self, period: PaymentPeriod) -> EditOutcome {
        if let Some(ignored) = self.check_editable(Field::PaymentPeriod) {
            return ignored;
        }
        self.state.payment_period = period;
        debug!(days = period.days(), "Payment period changed");
        EditOutcome::Applied
    }

    pub fn set_transfer_amount(&mut self, text: &str) -> EditOutcome {
        if let Some(ignored) = self.check_editable(Field::TransferAmount) {
            return ignored;
        }
        match AmountInput::new(text) {
            Some(amount) => {
                self.state.transfer_amount = amount;
                EditOutcome::Applied
            }
            None => self.ignore("invalid_amount", format!("'{}' is not a valid amount", text)),
        }
    }

    /// Accepts empty text or a value in `[0, transfer amount]`
    pub fn set_trade_amount(&mut self, text: &str) -> EditOutcome {
        if let Some(ignored) = self.check_editable(Field::TradeAmount) {
            return ignored;
        }
        let Some(amount) = AmountInput::new(text) else {
            return self.ignore("invalid_amount", format!("'{}' is not a valid amount", text));
        };

        let value = amount.parse().unwrap_or(0.0);
        let max = self.state.transfer_amount.parse().unwrap_or(0.0);
        if !amount.is_empty() && !(0.0..=max).contains(&value) {
            return self.ignore(
                "trade_exceeds_transfer",
                format!("trade amount must be between 0 and {}", self.state.transfer_amount),
            );
        }

        self.state.trade_amount = amount;
        EditOutcome::Applied
    }

    /// Parse `value` for `field` and apply it
    pub fn edit(&mut self, field: Field, value: &str) -> EditOutcome {
        match field {
            Field::TransferAmount => self.set_transfer_amount(value),
            Field::TradeAmount => self.set_trade_amount(value),
            Field::TradingPair => match value.parse() {
                Ok(pair) => self.set_trading_pair(pair),
                Err(e) => self.ignore("unsupported_pair", e.to_string()),
            },
            Field::Direction => match value.parse() {
                Ok(direction) => self.set_direction(direction),
                Err(e) => self.ignore("unsupported_direction", e.to_string()),
            },
            Field::PaymentPeriod => match value.parse() {
                Ok(period) => self.set_payment_period(period),
                Err(e) => self.ignore("unsupported_period", e.to_string()),
            },
        }
    }

    /// Move to the next step, returning the step entered
    pub fn advance(&mut self) -> Result<Step> {
        match self.state.step {
            Step::Setup => {
                let Some(transfer) = self.state.transfer_amount.positive() else {
                    self.metrics.record_rejection("invalid_amount");
                    return Err(PayLaterError::InvalidAmount(format!(
                        "transfer amount '{}' must be greater than 0",
                        self.state.transfer_amount
                    )));
                };

                let initial = &self.settings.initial_trade_amount;
                self.state.trade_amount = match initial.parse() {
                    Some(value) if value > transfer => self.state.transfer_amount.clone(),
                    _ => initial.clone(),
                };
                self.enter(Step::TransferConfirm);
                info!(
                    pair = %self.state.trading_pair,
                    direction = %self.state.direction,
                    transfer,
                    "Transfer confirmed"
                );
            }
            Step::TransferConfirm => {
                self.current_amount()?;
                let price = match self.live_price() {
                    Some(price) => price,
                    None => match self.settings.fallback_live_price {
                        Some(price) => {
                            warn!(price, "No live price, settling at configured fallback");
                            price
                        }
                        None => {
                            self.metrics.record_rejection("price_unavailable");
                            return Err(PayLaterError::PriceUnavailable);
                        }
                    },
                };
                if !price.is_finite() || price <= 0.0 {
                    self.metrics.record_rejection("invalid_price");
                    return Err(PayLaterError::InvalidPrice(price));
                }

                self.state.settlement_price = Some(price);
                self.enter(Step::TradeConfirmed);
                info!(
                    pair = %self.state.trading_pair,
                    settlement_price = price,
                    "Trade confirmed, settlement price frozen"
                );
            }
            Step::TradeConfirmed => {
                self.metrics.record_rejection("already_confirmed");
                return Err(PayLaterError::AlreadyConfirmed);
            }
        }
        Ok(self.state.step)
    }

    /// Discard the instance and start over in SETUP
    pub fn close(&mut self) {
        let from = self.state.step;
        self.state = WorkflowState::initial(&self.settings);
        self.metrics.record_reset();
        info!(from = %from, "Workflow closed");
    }

    /// The amount figures are computed from in the current step
    pub fn current_amount(&self) -> Result<f64> {
        let (input, ceiling) = match self.state.step {
            Step::Setup => (&self.state.transfer_amount, None),
            Step::TransferConfirm | Step::TradeConfirmed => (
                &self.state.trade_amount,
                self.state.transfer_amount.positive(),
            ),
        };
        self.settings.fallback.resolve(input, self.state.step, ceiling)
    }

    pub fn schedule(&self) -> Result<PaymentSchedule> {
        let amount = self.current_amount()?;
        self.settings
            .schedule
            .compute(amount, self.state.payment_period.days())
    }

    pub fn preview(&self) -> Result<Preview> {
        let amount = self.current_amount()?;
        let schedule = self
            .settings
            .schedule
            .compute(amount, self.state.payment_period.days())?;

        Ok(Preview {
            step: self.state.step,
            trading_pair: self.state.trading_pair,
            direction: self.state.direction,
            payment_period: self.state.payment_period,
            amount,
            schedule,
            payment_currency: self.payment_currency(),
            live_price: self.live_price(),
        })
    }

    /// Summary at the frozen settlement price; only in TRADE_CONFIRMED
    pub fn confirmation(&self) -> Result<Confirmation> {
        if self.state.step != Step::TradeConfirmed {
            return Err(PayLaterError::WrongStep(self.state.step.as_str()));
        }
        let price = self
            .state
            .settlement_price
            .ok_or(PayLaterError::PriceUnavailable)?;

        let schedule = self.schedule()?;
        let Conversion {
            asset_amount,
            asset_currency,
        } = convert(
            schedule.total_payment,
            price,
            self.state.direction,
            self.state.trading_pair,
        )?;

        Ok(Confirmation {
            trading_pair: self.state.trading_pair,
            settlement_price: price,
            direction: self.state.direction,
            payment_period: self.state.payment_period,
            deposit_amount: schedule.deposit_amount,
            transaction_fee: schedule.transaction_fee,
            total_payment: schedule.total_payment,
            remaining_payment: schedule.remaining_payment(),
            asset_received: asset_amount,
            payment_currency: self.payment_currency(),
            received_currency: asset_currency,
        })
    }

    /// Copy the deposit wallet address; failures only produce a message
    pub fn copy_wallet_address(&self) -> Notification {
        match self.clipboard.copy_text(&self.settings.wallet_address) {
            Ok(()) => Notification::Success("Wallet address copied to clipboard".to_string()),
            Err(e) => {
                self.metrics.record_clipboard_failure();
                warn!(error = %e, "Clipboard write failed");
                Notification::Failure("Failed to copy. Please copy the address manually".to_string())
            }
        }
    }

    fn enter(&mut self, step: Step) {
        self.state.step = step;
        self.metrics.record_transition(step.label());
    }

    fn check_editable(&self, field: Field) -> Option<EditOutcome> {
        if field.editable_in(self.state.step) {
            return None;
        }
        self.metrics.record_rejection("read_only_field");
        Some(EditOutcome::Ignored(format!(
            "{} cannot be changed in step {}",
            field, self.state.step
        )))
    }

    fn ignore(&self, reason: &'static str, message: String) -> EditOutcome {
        self.metrics.record_rejection(reason);
        debug!(reason, %message, "Edit ignored");
        EditOutcome::Ignored(message)
    }
}
