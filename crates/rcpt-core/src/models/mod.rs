//! Data models for receipts, OCR input and configuration.

pub mod config;
pub mod ocr;
pub mod receipt;
