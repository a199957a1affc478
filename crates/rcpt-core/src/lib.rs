//! Core library for receipt OCR text parsing.
//!
//! This crate provides:
//! - Line segmentation of raw OCR text
//! - Rule-based field extraction (store, date, totals, tax, payment, currency, items)
//! - Receipt data models and configuration
//! - OCR service JSON input handling

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{InputError, RcptError, Result};
pub use models::config::{is_currency_code, DateOrder, ExtractionConfig, RcptConfig};
pub use models::ocr::OcrDocument;
pub use models::receipt::{LineItem, ParsedReceipt};
pub use receipt::{
    ExtractedFields, ExtractionResult, HeuristicReceiptParser, RawText, ReceiptParser,
};
