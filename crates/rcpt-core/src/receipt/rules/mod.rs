//! Rule-based field extractors for receipts.
//!
//! Each module owns one field family. Extractors that read the whole text
//! implement [`FieldExtractor`]; the ones that depend on line position
//! (header, footer, items region) implement [`LineExtractor`].

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod items;
pub mod patterns;
pub mod payment;
pub mod receipt_number;
pub mod store;

pub use amounts::{parse_amount, AmountExtractor, TotalsExtractor, TotalsCandidates};
pub use currency::CurrencyExtractor;
pub use dates::{DateExtractor, DateRule};
pub use items::ItemExtractor;
pub use payment::PaymentExtractor;
pub use receipt_number::ReceiptNumberExtractor;
pub use store::{StoreExtractor, StoreInfo};

/// Trait for field extractors working on raw text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Trait for extractors working on normalized lines.
pub trait LineExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract from normalized lines in document order.
    fn extract_lines(&self, lines: &[String]) -> Self::Output;
}

/// A matched value together with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
