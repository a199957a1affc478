//! Error types for the rcpt-core library.
//!
//! The parser itself never fails; these cover the edges around it
//! (reading input documents and configuration).

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Input document could not be turned into receipt text.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the OCR text handed to the parser.
#[derive(Error, Debug)]
pub enum InputError {
    /// The OCR step produced no usable text.
    #[error("failed to extract text: OCR output contains no text")]
    NoText,

    /// The input file type is not supported.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
