//! Currency arithmetic and display.
//!
//! Amounts are `rust_decimal::Decimal` so that `2.005` really is two and
//! five thousandths, and half-way cases round away from zero the way a till
//! receipt does.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::BillingConfig;

/// Format an amount with the default configuration (`"0.00 €"`).
///
/// A missing amount renders as zero.
pub fn format_currency(amount: Option<Decimal>) -> String {
    format_amount(amount, &BillingConfig::default())
}

/// Format an amount: fixed decimal places, no thousands separator, then a
/// space and the currency symbol.
pub fn format_amount(amount: Option<Decimal>, config: &BillingConfig) -> String {
    let places = config.decimal_places;
    let mut rounded = amount
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    if config.currency_symbol.is_empty() {
        rounded.to_string()
    } else {
        format!("{} {}", rounded, config.currency_symbol)
    }
}

/// `quantity × unit_price`, exact, or `None` if it does not fit a `Decimal`.
pub fn line_total(quantity: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// Parse a decimal carried as text (`"12.50"`, `"1e2"`).
///
/// Returns `None` for anything that is not a number.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_and_missing_render_as_zero() {
        assert_eq!(format_currency(Some(Decimal::ZERO)), "0.00 €");
        assert_eq!(format_currency(None), "0.00 €");
    }

    #[test]
    fn half_way_rounds_away_from_zero() {
        assert_eq!(format_currency(Some(dec!(2.005))), "2.01 €");
        assert_eq!(format_currency(Some(dec!(2.004))), "2.00 €");
        assert_eq!(format_currency(Some(dec!(-2.005))), "-2.01 €");
    }

    #[test]
    fn pads_to_fixed_places_without_grouping() {
        assert_eq!(format_currency(Some(dec!(3))), "3.00 €");
        assert_eq!(format_currency(Some(dec!(1234567.5))), "1234567.50 €");
    }

    #[test]
    fn tiny_negative_amounts_do_not_print_minus_zero() {
        assert_eq!(format_currency(Some(dec!(-0.001))), "0.00 €");
    }

    #[test]
    fn honours_config() {
        let config = BillingConfig {
            currency_symbol: String::new(),
            decimal_places: 0,
        };
        assert_eq!(format_amount(Some(dec!(2.5)), &config), "3");
    }

    #[test]
    fn line_total_is_exact() {
        assert_eq!(line_total(3, dec!(0.1)), Some(dec!(0.3)));
        assert_eq!(line_total(0, dec!(9.99)), Some(Decimal::ZERO));
    }

    #[test]
    fn line_total_overflow_is_none() {
        assert_eq!(line_total(2, Decimal::MAX), None);
        assert_eq!(line_total(1, Decimal::MAX), Some(Decimal::MAX));
    }

    #[test]
    fn parses_plain_and_scientific_text() {
        assert_eq!(parse_decimal(" 12.50 "), Some(dec!(12.50)));
        assert_eq!(parse_decimal("1e2"), Some(dec!(100)));
        assert_eq!(parse_decimal("twelve"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
