//! Receipt field extraction module.

mod parser;
pub mod rules;
mod text;

pub use parser::{ExtractedFields, ExtractionResult, HeuristicReceiptParser, ReceiptParser};
pub use text::RawText;
