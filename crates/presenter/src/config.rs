//! Presenter configuration.

use serde::{Deserialize, Serialize};

use webpos_billing::BillingConfig;

pub const MIN_CUSTOMER_NAME_ENV: &str = "WEBPOS_MIN_CUSTOMER_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Shortest customer name (in characters) that enables printing.
    pub min_customer_name_len: usize,
    pub billing: BillingConfig,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            min_customer_name_len: 3,
            billing: BillingConfig::default(),
        }
    }
}

impl PresenterConfig {
    pub fn from_env() -> Self {
        let mut config = Self {
            billing: BillingConfig::from_env(),
            ..Self::default()
        };

        if let Ok(raw) = std::env::var(MIN_CUSTOMER_NAME_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(len) => config.min_customer_name_len = len,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "{MIN_CUSTOMER_NAME_ENV} is not a number; using {}",
                    config.min_customer_name_len
                ),
            }
        }

        config
    }

    pub fn accepts_customer_name(&self, name: &str) -> bool {
        name.chars().count() >= self.min_customer_name_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_longer_than_two_chars_enable_printing() {
        let config = PresenterConfig::default();
        assert!(!config.accepts_customer_name(""));
        assert!(!config.accepts_customer_name("Al"));
        assert!(config.accepts_customer_name("Ada"));
        // Characters, not bytes.
        assert!(!config.accepts_customer_name("Çé"));
    }

    #[test]
    fn deserializes_with_nested_billing_defaults() {
        let config: PresenterConfig =
            serde_json::from_str(r#"{"min_customer_name_len": 1}"#).unwrap();
        assert_eq!(config.min_customer_name_len, 1);
        assert_eq!(config.billing, BillingConfig::default());
    }
}
