//! Payment method detection.

use super::patterns::MASKED_CARD;
use super::FieldExtractor;

/// Payment methods in priority order.
const PAYMENT_METHODS: &[&str] = &[
    "visa",
    "mastercard",
    "amex",
    "rupay",
    "upi",
    "cash",
    "debit",
    "credit",
    "card",
];

/// Payment method extractor.
///
/// Produces the uppercase method name, followed by the masked card number
/// when one appears anywhere in the text (`VISA ****1234`).
pub struct PaymentExtractor;

impl PaymentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PaymentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PaymentExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next()
    }

    /// Every mentioned method, in priority order.
    fn extract_all(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let card = MASKED_CARD.find(text).map(|m| m.as_str());

        PAYMENT_METHODS
            .iter()
            .filter(|method| lower.contains(*method))
            .map(|method| match card {
                Some(card) => format!("{} {}", method.to_uppercase(), card),
                None => method.to_uppercase(),
            })
            .collect()
    }
}
