//! Receipt/invoice number extraction.

use super::patterns::RECEIPT_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Receipt number extractor.
///
/// Accepts the token after a `Receipt No:`, `Invoice #`, `Order ID` style
/// label. Tokens without a digit are skipped so that words following a bare
/// label ("Invoice Date") are not taken for numbers.
pub struct ReceiptNumberExtractor;

impl ReceiptNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReceiptNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReceiptNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        RECEIPT_NUMBER
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(1)?;
                if !token.as_str().chars().any(|c| c.is_ascii_digit()) {
                    return None;
                }
                Some(
                    ExtractionMatch::new(token.as_str().to_string(), token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        ReceiptNumberExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_labeled_numbers() {
        assert_eq!(extract("Receipt No: RCP-2024-001").as_deref(), Some("RCP-2024-001"));
        assert_eq!(extract("Invoice # 88213").as_deref(), Some("88213"));
        assert_eq!(extract("ORDER ID: A12-9").as_deref(), Some("A12-9"));
        assert_eq!(extract("Txn Number 0042").as_deref(), Some("0042"));
    }

    #[test]
    fn test_words_after_label_skipped() {
        let text = "Invoice Date: 15/01/2024\nBill No. 7781";
        assert_eq!(extract(text).as_deref(), Some("7781"));
    }

    #[test]
    fn test_label_inside_word_ignored() {
        assert_eq!(extract("Billing 12345"), None);
    }

    #[test]
    fn test_no_number() {
        assert_eq!(extract("Thank you for your order"), None);
        assert_eq!(extract(""), None);
    }
}
