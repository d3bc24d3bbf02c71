//! Billing display configuration.

use serde::{Deserialize, Serialize};

pub const CURRENCY_SYMBOL_ENV: &str = "WEBPOS_CURRENCY_SYMBOL";
pub const CURRENCY_DECIMALS_ENV: &str = "WEBPOS_CURRENCY_DECIMALS";

/// Upper bound accepted by `rust_decimal` for a scale.
const MAX_DECIMAL_PLACES: u32 = 28;

/// How amounts are rendered on the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Suffix appended after a space, e.g. `"3.00 €"`.
    pub currency_symbol: String,
    /// Fixed number of decimal places.
    pub decimal_places: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_string(),
            decimal_places: 2,
        }
    }
}

impl BillingConfig {
    /// Build from `WEBPOS_CURRENCY_SYMBOL` / `WEBPOS_CURRENCY_DECIMALS`.
    ///
    /// Missing variables keep the defaults; malformed ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_ENV) {
            config.currency_symbol = symbol.trim().to_string();
        }

        if let Some(raw) = lookup(CURRENCY_DECIMALS_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(places) if places <= MAX_DECIMAL_PLACES => config.decimal_places = places,
                _ => tracing::warn!(
                    value = %raw,
                    "{CURRENCY_DECIMALS_ENV} is not a valid number of decimal places; using {}",
                    config.decimal_places
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_two_decimal_euros() {
        let config = BillingConfig::from_lookup(|_| None);
        assert_eq!(config, BillingConfig::default());
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.decimal_places, 2);
    }

    #[test]
    fn reads_overrides() {
        let config = BillingConfig::from_lookup(|key| match key {
            CURRENCY_SYMBOL_ENV => Some(" CHF ".to_string()),
            CURRENCY_DECIMALS_ENV => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.currency_symbol, "CHF");
        assert_eq!(config.decimal_places, 3);
    }

    #[test]
    fn malformed_decimals_fall_back() {
        let config = BillingConfig::from_lookup(|key| match key {
            CURRENCY_DECIMALS_ENV => Some("ninety".to_string()),
            _ => None,
        });
        assert_eq!(config.decimal_places, 2);

        let config = BillingConfig::from_lookup(|key| match key {
            CURRENCY_DECIMALS_ENV => Some("40".to_string()),
            _ => None,
        });
        assert_eq!(config.decimal_places, 2);
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: BillingConfig = serde_json::from_str(r#"{"currency_symbol":"$"}"#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.decimal_places, 2);
    }
}
