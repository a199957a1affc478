//! Heuristic receipt parser combining the field rules.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::{DateOrder, ExtractionConfig};
use crate::models::ocr::OcrDocument;
use crate::models::receipt::{LineItem, ParsedReceipt};

use super::rules::{
    CurrencyExtractor, DateExtractor, FieldExtractor, ItemExtractor, LineExtractor,
    PaymentExtractor, ReceiptNumberExtractor, StoreExtractor, TotalsExtractor,
};
use super::text::RawText;

/// Fields as detected, before defaults are applied.
///
/// `None` means "not found", which is different from a found zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_website: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub receipt_number: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
    pub items: Vec<LineItem>,
}

impl ExtractedFields {
    /// Names of the fields that will be filled with defaults.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("store_name", self.store_name.is_none()),
            ("purchase_date", self.purchase_date.is_none()),
            ("total_amount", self.total_amount.is_none()),
            ("tax_amount", self.tax_amount.is_none()),
            ("receipt_number", self.receipt_number.is_none()),
            ("payment_method", self.payment_method.is_none()),
            ("currency", self.currency.is_none()),
            ("items", self.items.is_empty()),
        ];
        checks
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name)
            .collect()
    }

    /// Overall confidence (0.0 - 1.0) from which core fields were found.
    pub fn confidence(&self) -> f32 {
        let mut confidence = 1.0f32;
        if self.store_name.is_none() {
            confidence -= 0.15;
        }
        if self.purchase_date.is_none() {
            confidence -= 0.15;
        }
        if self.total_amount.is_none() {
            confidence -= 0.3;
        }
        if self.items.is_empty() {
            confidence -= 0.2;
        }
        if self.receipt_number.is_none() {
            confidence -= 0.1;
        }
        confidence.max(0.0)
    }
}

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Fully populated receipt.
    pub receipt: ParsedReceipt,
    /// Fields as detected, without defaults.
    pub fields: ExtractedFields,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Fields that were filled with defaults.
    pub missing_fields: Vec<String>,
    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt from OCR text. Never fails; undetected fields get
    /// their defaults.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse the text of an OCR service document.
    ///
    /// Fails only when the OCR run produced no text at all.
    fn parse_document(&self, document: &OcrDocument) -> Result<ExtractionResult> {
        let text = document.receipt_text()?;
        Ok(self.parse(&text))
    }
}

/// Rule-based receipt parser.
#[derive(Debug, Clone)]
pub struct HeuristicReceiptParser {
    config: ExtractionConfig,
}

impl HeuristicReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(ExtractionConfig::default())
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Set how ambiguous numeric dates are read.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.config.date_order = order;
        self
    }

    /// Set the currency used when no symbol is found.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.config.default_currency = currency.into();
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run every rule over the text without applying defaults.
    pub fn extract_fields(&self, text: &str) -> ExtractedFields {
        let raw = RawText::from_text(text);

        let store = StoreExtractor::new()
            .with_scan_lines(self.config.store_scan_lines)
            .with_max_address_lines(self.config.max_address_lines)
            .extract_lines(raw.head(self.config.store_scan_lines));
        debug!("Store: {:?}", store.name);

        let purchase_date = DateExtractor::new()
            .with_order(self.config.date_order)
            .extract(text)
            .map(|m| m.value);
        debug!("Purchase date: {:?}", purchase_date);

        let totals = TotalsExtractor::new()
            .with_scan_lines(self.config.totals_scan_lines)
            .extract_lines(raw.tail(self.config.totals_scan_lines));
        debug!("Totals candidates: {:?}, tax: {:?}", totals.totals, totals.tax);

        let payment_method = PaymentExtractor::new().extract(text);
        let currency = CurrencyExtractor::new().extract(text).map(str::to_string);
        debug!("Payment: {:?}, currency: {:?}", payment_method, currency);

        let receipt_number = ReceiptNumberExtractor::new().extract(text).map(|m| m.value);

        let items = ItemExtractor::new().extract_lines(raw.lines());
        debug!("Extracted {} line items", items.len());

        ExtractedFields {
            store_name: store.name,
            store_address: store.address,
            store_website: store.website,
            purchase_date,
            total_amount: totals.total(),
            tax_amount: totals.tax,
            receipt_number,
            payment_method,
            currency,
            items,
        }
    }

    /// Parse with an explicit clock; the result depends only on `text` and
    /// `now`.
    pub fn parse_at(&self, text: &str, now: NaiveDateTime) -> ExtractionResult {
        // `Instant::now` traps on wasm32-unknown-unknown; front-ends there
        // time the call themselves.
        #[cfg(not(target_arch = "wasm32"))]
        let start = Some(std::time::Instant::now());
        #[cfg(target_arch = "wasm32")]
        let start: Option<std::time::Instant> = None;

        info!("Parsing receipt from {} characters of text", text.len());

        let fields = self.extract_fields(text);
        let missing: Vec<String> = fields
            .missing_fields()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut warnings = Vec::new();
        for field in ["store_name", "purchase_date", "total_amount", "items"] {
            if missing.iter().any(|m| m == field) {
                warnings.push(format!("Could not extract {}", field.replace('_', " ")));
            }
        }

        let receipt = self.apply_defaults(fields.clone(), text, now);
        warnings.extend(receipt.validate().into_iter().filter(|issue| {
            // Already reported above.
            !issue.starts_with("Missing store name") && !issue.starts_with("Total amount is zero")
        }));

        let confidence = fields.confidence();

        debug!(
            "Parsed receipt: store={}, total={}, items={}, receipt_number={}, confidence={:.2}",
            receipt.store_name,
            receipt.total_amount,
            receipt.items.len(),
            receipt.receipt_number,
            confidence
        );

        ExtractionResult {
            receipt,
            fields,
            warnings,
            missing_fields: missing,
            confidence,
            processing_time_ms: start.map_or(0, |s| s.elapsed().as_millis() as u64),
        }
    }

    fn apply_defaults(
        &self,
        fields: ExtractedFields,
        text: &str,
        now: NaiveDateTime,
    ) -> ParsedReceipt {
        let receipt_number = fields
            .receipt_number
            .unwrap_or_else(|| self.placeholder_number(now));
        let mut receipt =
            ParsedReceipt::empty(fields.purchase_date.unwrap_or(now.date()), receipt_number);

        receipt.store_name = fields
            .store_name
            .unwrap_or_else(|| self.config.unknown_store_name.clone());
        receipt.store_address = fields.store_address;
        receipt.store_website = fields.store_website;
        receipt.total_amount = fields.total_amount.unwrap_or(Decimal::ZERO);
        receipt.tax_amount = fields.tax_amount.unwrap_or(Decimal::ZERO);
        receipt.payment_method = fields.payment_method;
        receipt.currency = fields
            .currency
            .unwrap_or_else(|| self.config.default_currency.clone());
        receipt.items = fields.items;
        receipt.raw_text = text.to_string();
        receipt
    }

    fn placeholder_number(&self, now: NaiveDateTime) -> String {
        format!("{}-{}", self.config.receipt_number_prefix, now.format("%Y%m%d%H%M%S"))
    }
}

impl Default for HeuristicReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for HeuristicReceiptParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        self.parse_at(text, Local::now().naive_local())
    }
}
