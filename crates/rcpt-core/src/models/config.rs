//! Configuration structures for receipt parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RcptError, Result};
use super::receipt::{DEFAULT_CURRENCY, UNKNOWN_STORE};

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// How to read numeric `A/B/YYYY` dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// Day first when the year has four digits and starts with 19/20,
    /// month first otherwise.
    #[default]
    Auto,
    /// Always day/month/year.
    DayFirst,
    /// Always month/day/year.
    MonthFirst,
}

/// Receipt field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines searched for store information.
    pub store_scan_lines: usize,

    /// Number of trailing lines searched for totals and tax.
    pub totals_scan_lines: usize,

    /// Maximum number of address lines collected after the store name.
    pub max_address_lines: usize,

    /// Currency code used when no currency symbol is found.
    pub default_currency: String,

    /// Store name used when no header line qualifies.
    pub unknown_store_name: String,

    /// Prefix of generated receipt numbers.
    pub receipt_number_prefix: String,

    /// Ordering hint for ambiguous numeric dates.
    pub date_order: DateOrder,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            store_scan_lines: 10,
            totals_scan_lines: 15,
            max_address_lines: 3,
            default_currency: DEFAULT_CURRENCY.to_string(),
            unknown_store_name: UNKNOWN_STORE.to_string(),
            receipt_number_prefix: "RCPT".to_string(),
            date_order: DateOrder::Auto,
        }
    }
}

/// Output configuration for front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Keep the raw OCR text in serialized receipts.
    pub include_raw_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            include_raw_text: true,
        }
    }
}

/// Three uppercase ASCII letters, the shape of an ISO 4217 code.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the parser cannot work with.
    pub fn check(&self) -> Result<()> {
        let currency = &self.extraction.default_currency;
        if !is_currency_code(currency) {
            return Err(RcptError::Config(format!(
                "default_currency must be a 3-letter ISO 4217 code, got {:?}",
                currency
            )));
        }

        if self.extraction.store_scan_lines == 0 || self.extraction.totals_scan_lines == 0 {
            return Err(RcptError::Config(
                "store_scan_lines and totals_scan_lines must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RcptConfig::default();
        assert_eq!(config.extraction.store_scan_lines, 10);
        assert_eq!(config.extraction.totals_scan_lines, 15);
        assert_eq!(config.extraction.default_currency, "USD");
        assert_eq!(config.extraction.date_order, DateOrder::Auto);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{"extraction": {"date_order": "day_first"}}"#).unwrap();
        assert_eq!(config.extraction.date_order, DateOrder::DayFirst);
        assert_eq!(config.extraction.max_address_lines, 3);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RcptConfig::default();
        config.extraction.default_currency = "EUR".to_string();
        config.output.pretty = true;
        config.save(&path).unwrap();

        assert_eq!(RcptConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_currency_code_shape() {
        assert!(is_currency_code("EUR"));
        assert!(!is_currency_code("eur"));
        assert!(!is_currency_code("EURO"));
        assert!(!is_currency_code("€"));
    }

    #[test]
    fn test_rejects_bad_currency() {
        let mut config = RcptConfig::default();
        config.extraction.default_currency = "dollars".to_string();
        assert!(matches!(config.check(), Err(RcptError::Config(_))));
    }
}
