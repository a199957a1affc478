//! Currency inference from symbols.

use super::FieldExtractor;

/// Currency symbols in priority order, with their ISO 4217 codes.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("₹", "INR"),
    ("¥", "JPY"),
    ("₱", "PHP"),
];

/// Currency extractor.
///
/// Returns `None` when no symbol is present; the caller decides the
/// default, so "not found" stays distinct from "explicitly USD".
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = &'static str;

    fn extract(&self, text: &str) -> Option<&'static str> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<&'static str> {
        CURRENCY_SYMBOLS
            .iter()
            .filter(|(symbol, _)| text.contains(symbol))
            .map(|(_, code)| *code)
            .collect()
    }
}
