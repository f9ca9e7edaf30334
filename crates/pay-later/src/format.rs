//! Display formatting for amounts and prices
//!
//! Formatting is presentation only; callers keep the full-precision value.

use crate::schedule::AMOUNT_DECIMALS;

/// Fixed `decimals` places with thousands separators, `9,074.41016334`
pub fn format_amount(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Two decimal places, for prices
pub fn format_price(value: f64) -> String {
    format_amount(value, 2)
}

/// Up to 8 decimal places with trailing zeros dropped, for balances
pub fn format_available(value: f64) -> String {
    let full = format_amount(value, AMOUNT_DECIMALS as usize);
    if !full.contains('.') {
        return full;
    }
    full.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(9074.41016334, 8), "9,074.41016334");
        assert_eq!(format_amount(0.13883848, 8), "0.13883848");
        assert_eq!(format_amount(1_234_567.5, 2), "1,234,567.50");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(-1500.25, 2), "-1,500.25");
        assert_eq!(format_amount(-0.000000001, 8), "0.00000000");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(2856.42), "2,856.42");
        assert_eq!(format_price(112_000.0), "112,000.00");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn test_format_available() {
        assert_eq!(format_available(25_920.32666923), "25,920.32666923");
        assert_eq!(format_available(1.5), "1.5");
        assert_eq!(format_available(100.0), "100");
        assert_eq!(format_available(0.0), "0");
    }
}
