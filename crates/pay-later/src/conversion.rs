//! Settlement conversion
//!
//! A SELL pays in the base asset and receives the quote asset; a BUY pays in
//! the quote asset and receives the base asset.

use crate::error::PayLaterError;
use crate::schedule::round_amount;
use crate::Result;
use common::{Side, Symbol, TradingPair};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub asset_amount: f64,
    pub asset_currency: Symbol,
}

/// Asset the user pays the deposit and fee in
pub fn payment_currency(direction: Side, pair: TradingPair) -> Symbol {
    match direction {
        Side::Sell => pair.base(),
        Side::Buy => pair.quote(),
    }
}

/// Asset the user ends up holding
pub fn received_currency(direction: Side, pair: TradingPair) -> Symbol {
    match direction {
        Side::Sell => pair.quote(),
        Side::Buy => pair.base(),
    }
}

/// Convert `total_payment` at `settlement_price` into the received asset
pub fn convert(
    total_payment: f64,
    settlement_price: f64,
    direction: Side,
    pair: TradingPair,
) -> Result<Conversion> {
    if !settlement_price.is_finite() || settlement_price <= 0.0 {
        return Err(PayLaterError::InvalidPrice(settlement_price));
    }
    if !total_payment.is_finite() || total_payment < 0.0 {
        return Err(PayLaterError::InvalidAmount(total_payment.to_string()));
    }

    let asset_amount = match direction {
        Side::Buy => total_payment / settlement_price,
        Side::Sell => total_payment * settlement_price,
    };

    Ok(Conversion {
        asset_amount: round_amount(asset_amount),
        asset_currency: received_currency(direction, pair),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sell_receives_quote() {
        let c = convert(9.07441016, 2856.42, Side::Sell, TradingPair::BtcUsdc).unwrap();

        assert!((c.asset_amount - 25_920.32666923).abs() < 1e-6);
        assert_eq!(c.asset_currency.as_str(), "USDC");
    }

    #[test]
    fn test_buy_receives_base() {
        let c = convert(9.07441016, 2856.42, Side::Buy, TradingPair::BtcUsdc).unwrap();

        assert!((c.asset_amount - 0.00317685).abs() < 1e-8);
        assert_eq!(c.asset_currency.as_str(), "BTC");
    }

    #[test]
    fn test_currencies() {
        assert_eq!(payment_currency(Side::Sell, TradingPair::EthBtc).as_str(), "ETH");
        assert_eq!(payment_currency(Side::Buy, TradingPair::EthBtc).as_str(), "BTC");
        assert_eq!(received_currency(Side::Sell, TradingPair::EthUsdc).as_str(), "USDC");
        assert_eq!(received_currency(Side::Buy, TradingPair::EthUsdc).as_str(), "ETH");
    }

    #[test]
    fn test_rejects_bad_price() {
        assert_matches!(
            convert(1.0, 0.0, Side::Buy, TradingPair::BtcUsdc),
            Err(PayLaterError::InvalidPrice(_))
        );
        assert_matches!(
            convert(1.0, -5.0, Side::Sell, TradingPair::BtcUsdc),
            Err(PayLaterError::InvalidPrice(_))
        );
        assert_matches!(
            convert(1.0, f64::NAN, Side::Sell, TradingPair::BtcUsdc),
            Err(PayLaterError::InvalidPrice(_))
        );
    }
}
