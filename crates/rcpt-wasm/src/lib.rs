//! WASM bindings for receipt OCR text parsing.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use chrono::{NaiveDate, NaiveDateTime};
use wasm_bindgen::prelude::*;

use rcpt_core::models::ocr::{OcrLine, OcrPage};
use rcpt_core::{
    is_currency_code, DateOrder, ExtractionResult, HeuristicReceiptParser, OcrDocument,
    ParsedReceipt,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Current local time from the JS clock.
fn js_now() -> NaiveDateTime {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .and_then(|d| d.and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds()))
        .unwrap_or_default()
}

/// Parse with the JS clock, timing the call with `Date.now()`.
fn parse_timed(parser: &HeuristicReceiptParser, text: &str) -> ExtractionResult {
    let start = js_sys::Date::now();
    let mut result = parser.parse_at(text, js_now());
    result.processing_time_ms = (js_sys::Date::now() - start).max(0.0) as u64;
    result
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse receipt text (from OCR) into structured receipt data.
#[wasm_bindgen]
pub fn parse_receipt_text(text: &str) -> Result<JsValue, JsValue> {
    let result = parse_timed(&HeuristicReceiptParser::new(), text);
    to_js(&result.receipt)
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    parser: HeuristicReceiptParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: HeuristicReceiptParser::new(),
        }
    }

    /// Set the currency code used when the text has no currency symbol.
    /// Must be an ISO 4217 code such as "EUR".
    #[wasm_bindgen]
    pub fn set_default_currency(&mut self, currency: &str) -> Result<(), JsValue> {
        if !is_currency_code(currency) {
            return Err(JsValue::from_str(&format!(
                "default currency must be a 3-letter ISO 4217 code, got {:?}",
                currency
            )));
        }
        self.parser = self.parser.clone().with_default_currency(currency);
        Ok(())
    }

    /// Set how ambiguous numeric dates are read: "auto", "day_first" or
    /// "month_first".
    #[wasm_bindgen]
    pub fn set_date_order(&mut self, order: &str) -> Result<(), JsValue> {
        let order = match order {
            "auto" => DateOrder::Auto,
            "day_first" => DateOrder::DayFirst,
            "month_first" => DateOrder::MonthFirst,
            other => return Err(JsValue::from_str(&format!("unknown date order: {}", other))),
        };
        self.parser = self.parser.clone().with_date_order(order);
        Ok(())
    }

    /// Extract receipt from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.run(text).receipt)
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.run(text);

        #[derive(serde::Serialize)]
        struct ExtractResult {
            receipt: ParsedReceipt,
            warnings: Vec<String>,
            missing_fields: Vec<String>,
            confidence: f32,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            receipt: result.receipt,
            warnings: result.warnings,
            missing_fields: result.missing_fields,
            confidence: result.confidence,
            processing_time_ms: result.processing_time_ms,
        };

        to_js(&output)
    }

    fn run(&self, text: &str) -> ExtractionResult {
        let result = parse_timed(&self.parser, text);
        for warning in &result.warnings {
            web_sys::console::warn_1(&JsValue::from_str(warning));
        }
        result
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR text assembled from browser-side recognition.
#[wasm_bindgen]
pub struct OcrTextJs {
    lines: Vec<String>,
    text: String,
}

#[wasm_bindgen]
impl OcrTextJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            text: String::new(),
        }
    }

    /// Add a recognized line, in reading order.
    #[wasm_bindgen]
    pub fn add_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Set the full text.
    #[wasm_bindgen]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Get the text handed to the parser; empty when nothing was recognized.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.document().receipt_text().unwrap_or_default()
    }

    /// Extract receipt from this OCR result. Fails when no text was
    /// recognized.
    #[wasm_bindgen]
    pub fn extract_receipt(&self) -> Result<JsValue, JsValue> {
        let text = self
            .document()
            .receipt_text()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        parse_receipt_text(&text)
    }

    fn document(&self) -> OcrDocument {
        OcrDocument {
            text: self.text.clone(),
            pages: vec![OcrPage {
                page: 1,
                lines: self
                    .lines
                    .iter()
                    .map(|text| OcrLine { text: text.clone() })
                    .collect(),
            }],
            ..OcrDocument::default()
        }
    }
}

impl Default for OcrTextJs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_ocr_text_prefers_full_text() {
        let mut ocr = OcrTextJs::new();
        ocr.add_line("BIG MART");
        ocr.add_line("Total 10.00");
        assert_eq!(ocr.get_text(), "BIG MART\nTotal 10.00");

        ocr.set_text("CORNER STORE");
        assert_eq!(ocr.get_text(), "CORNER STORE");
    }

    #[wasm_bindgen_test]
    fn test_empty_ocr_text_fails() {
        assert!(OcrTextJs::new().extract_receipt().is_err());
    }

    #[wasm_bindgen_test]
    fn test_js_now_is_valid() {
        assert!(js_now().date() > NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[wasm_bindgen_test]
    fn test_parse_receipt_text() {
        assert!(parse_receipt_text("BIG MART\nTotal 10.00").is_ok());
        assert!(parse_receipt_text("").is_ok());
    }

    #[wasm_bindgen_test]
    fn test_ocr_text_extracts_receipt() {
        let mut ocr = OcrTextJs::new();
        ocr.add_line("BIG MART");
        ocr.add_line("Total 10.00");
        assert!(ocr.extract_receipt().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_extract_uses_defaults() {
        let mut extractor = ReceiptExtractor::new();
        assert!(extractor.set_default_currency("EUR").is_ok());
        assert!(extractor.set_date_order("sideways").is_err());

        let result = parse_timed(&extractor.parser, "Total 10.00");
        assert_eq!(result.receipt.currency, "EUR");
        assert!(extractor.extract("Total 10.00").is_ok());
        assert!(extractor.extract_with_metadata("Total 10.00").is_ok());
    }

    #[wasm_bindgen_test]
    fn test_rejects_bad_default_currency() {
        let mut extractor = ReceiptExtractor::new();
        assert!(extractor.set_default_currency("euro").is_err());
        assert!(extractor.set_default_currency("").is_err());

        let result = parse_timed(&extractor.parser, "Total 10.00");
        assert_eq!(result.receipt.currency, "USD");
    }
}
