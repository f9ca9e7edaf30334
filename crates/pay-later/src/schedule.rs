//! Deposit and fee schedule
//!
//! Given the amount a user transfers now and a payment period, the schedule
//! solves for the total position that amount can carry:
//!
//! ```text
//! total   = amount / (deposit_rate + daily_rate * days * (1 - deposit_rate))
//! deposit = deposit_rate * total
//! fee     = (total - deposit) * daily_rate * days
//! ```
//!
//! so that `deposit + fee == amount`. Results are rounded to 8 decimals.

use crate::error::PayLaterError;
use crate::Result;
use config::PayLaterConfig;
use serde::Serialize;

/// Share of the total paid up front
pub const DEPOSIT_RATE: f64 = 0.15;

/// Fee charged per week on the financed part
pub const WEEKLY_FEE_RATE: f64 = 0.009;

/// Decimal places kept on every monetary result
pub const AMOUNT_DECIMALS: u32 = 8;

/// Rates used by [`FeeSchedule::compute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    deposit_rate: f64,
    weekly_fee_rate: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            deposit_rate: DEPOSIT_RATE,
            weekly_fee_rate: WEEKLY_FEE_RATE,
        }
    }
}

impl FeeSchedule {
    /// Both rates must lie strictly between 0 and 1
    pub fn new(deposit_rate: f64, weekly_fee_rate: f64) -> Result<Self> {
        for (name, rate) in [("deposit_rate", deposit_rate), ("weekly_fee_rate", weekly_fee_rate)] {
            if !(rate > 0.0 && rate < 1.0) {
                return Err(PayLaterError::InvalidSchedule(format!(
                    "{} must be in (0, 1), got {}",
                    name, rate
                )));
            }
        }
        Ok(Self {
            deposit_rate,
            weekly_fee_rate,
        })
    }

    pub fn from_config(config: &PayLaterConfig) -> Result<Self> {
        Self::new(config.deposit_rate, config.weekly_fee_rate)
    }

    pub fn deposit_rate(&self) -> f64 {
        self.deposit_rate
    }

    pub fn weekly_fee_rate(&self) -> f64 {
        self.weekly_fee_rate
    }

    pub fn daily_rate(&self) -> f64 {
        self.weekly_fee_rate / 7.0
    }

    pub fn compute(&self, amount: f64, days: u32) -> Result<PaymentSchedule> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PayLaterError::InvalidAmount(amount.to_string()));
        }
        if days == 0 {
            return Err(PayLaterError::InvalidPeriod(days));
        }

        let dr = self.deposit_rate;
        let period_rate = self.daily_rate() * days as f64;

        let total = amount / (dr + period_rate * (1.0 - dr));
        let deposit = dr * total;
        let fee = (total - deposit) * period_rate;

        Ok(PaymentSchedule {
            total_payment: round_amount(total),
            deposit_amount: round_amount(deposit),
            transaction_fee: round_amount(fee),
        })
    }
}

/// Schedule under the default rates
pub fn compute_schedule(amount: f64, days: u32) -> Result<PaymentSchedule> {
    FeeSchedule::default().compute(amount, days)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSchedule {
    /// Size of the position the deposit buys into
    pub total_payment: f64,
    /// Paid now
    pub deposit_amount: f64,
    /// Charged on the financed part over the period
    pub transaction_fee: f64,
}

impl PaymentSchedule {
    /// Owed at the end of the period
    pub fn remaining_payment(&self) -> f64 {
        round_amount(self.total_payment - self.deposit_amount)
    }

    /// What the user transfers now
    pub fn upfront(&self) -> f64 {
        round_amount(self.deposit_amount + self.transaction_fee)
    }
}

pub fn round_amount(value: f64) -> f64 {
    round_to(value, AMOUNT_DECIMALS)
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const EPS: f64 = 1e-8;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS
    }

    #[test]
    fn test_reference_fourteen_days() {
        let s = compute_schedule(1.5, 14).unwrap();

        assert!(close(s.total_payment, 9.07441016));
        assert!(close(s.deposit_amount, 1.36116152));
        assert!(close(s.transaction_fee, 0.13883848));
        assert!(close(s.remaining_payment(), 7.71324864));
    }

    #[test]
    fn test_other_periods() {
        let one = compute_schedule(1.5, 1).unwrap();
        assert!(close(one.total_payment, 9.92766983));
        assert!(close(one.deposit_amount, 1.48915048));
        assert!(close(one.transaction_fee, 0.01084952));

        let four_weeks = compute_schedule(1.5, 28).unwrap();
        assert!(close(four_weeks.total_payment, 8.30564784));
        assert!(close(four_weeks.deposit_amount, 1.24584718));
        assert!(close(four_weeks.transaction_fee, 0.25415282));

        let week = compute_schedule(1.0, 7).unwrap();
        assert!(close(week.total_payment, 6.34316524));
        assert!(close(week.deposit_amount, 0.95147479));
        assert!(close(week.transaction_fee, 0.04852521));
    }

    #[test]
    fn test_trade_amount_reference() {
        let s = compute_schedule(0.28872549, 14).unwrap();
        assert!(close(s.total_payment, 1.74667568));
        assert!(close(s.deposit_amount, 0.26200135));
        assert!(close(s.transaction_fee, 0.02672414));
    }

    #[test]
    fn test_schedule_identities() {
        for amount in [0.00000001, 0.5, 1.5, 42.0, 12_345.678] {
            for days in [1, 2, 7, 14, 28] {
                let s = compute_schedule(amount, days).unwrap();

                assert!(close(s.total_payment, s.deposit_amount + s.remaining_payment()));
                assert!((s.deposit_amount - 0.15 * s.total_payment).abs() <= 1e-8 * s.total_payment.max(1.0));
                // two rounded terms, so allow two ulps of the 8th decimal
                assert!((s.upfront() - amount).abs() <= 2e-8 * amount.max(1.0));
            }
        }
    }

    #[test]
    fn test_fee_increases_with_period() {
        let fees: Vec<f64> = [1, 2, 7, 14, 28]
            .iter()
            .map(|&d| compute_schedule(1.5, d).unwrap().transaction_fee)
            .collect();

        assert!(fees.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_matches!(compute_schedule(0.0, 14), Err(PayLaterError::InvalidAmount(_)));
        assert_matches!(compute_schedule(-1.0, 14), Err(PayLaterError::InvalidAmount(_)));
        assert_matches!(compute_schedule(f64::NAN, 14), Err(PayLaterError::InvalidAmount(_)));
        assert_matches!(compute_schedule(f64::INFINITY, 14), Err(PayLaterError::InvalidAmount(_)));
        assert_matches!(compute_schedule(1.5, 0), Err(PayLaterError::InvalidPeriod(0)));
    }

    #[test]
    fn test_custom_rates() {
        let schedule = FeeSchedule::new(0.2, 0.014).unwrap();
        let s = schedule.compute(2.0, 7).unwrap();

        assert!(close(s.deposit_amount, round_amount(0.2 * s.total_payment)));
        assert!((s.upfront() - 2.0).abs() <= 2e-8);
        assert!((schedule.daily_rate() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_rate_bounds() {
        assert_matches!(FeeSchedule::new(0.0, 0.009), Err(PayLaterError::InvalidSchedule(_)));
        assert_matches!(FeeSchedule::new(0.15, 1.0), Err(PayLaterError::InvalidSchedule(_)));
        assert_matches!(FeeSchedule::new(f64::NAN, 0.009), Err(PayLaterError::InvalidSchedule(_)));
        assert_eq!(FeeSchedule::from_config(&PayLaterConfig::default()).unwrap(), FeeSchedule::default());
    }
}
