//! OCR service output consumed as parser input.
//!
//! The OCR pipeline emits JSON with the full text plus per-page lines and
//! confidence statistics. Only the text matters to the parser; the rest is
//! kept so front-ends can report it.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Output of an OCR run over one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrDocument {
    /// Full recognized text.
    pub text: String,

    /// Recognized lines grouped by page.
    pub pages: Vec<OcrPage>,

    /// Mean word confidence across the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f32>,

    /// Median word confidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_confidence: Option<f32>,

    /// Number of pages processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    /// Detection model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,

    /// Recognition model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,

    /// Inference time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inference_ms: Option<f64>,
}

/// One OCR page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPage {
    /// 1-based page number.
    pub page: u32,

    /// Lines in reading order.
    pub lines: Vec<OcrLine>,
}

/// One recognized line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrLine {
    /// Line text.
    pub text: String,
}

impl OcrDocument {
    /// Wrap plain text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Text to hand to the parser.
    ///
    /// Prefers the full `text`; falls back to page lines joined with
    /// newlines. A document without any text is a failed OCR run and must
    /// not be parsed.
    pub fn receipt_text(&self) -> Result<String, InputError> {
        if !self.text.trim().is_empty() {
            return Ok(self.text.clone());
        }

        let joined = self
            .pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if joined.trim().is_empty() {
            Err(InputError::NoText)
        } else {
            Ok(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_full_text() {
        let doc: OcrDocument = serde_json::from_str(
            r#"{"text": "BIG MART\nTotal 10.00", "pages": [{"page": 1, "lines": [{"text": "ignored"}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.receipt_text().unwrap(), "BIG MART\nTotal 10.00");
    }

    #[test]
    fn test_falls_back_to_page_lines() {
        let doc: OcrDocument = serde_json::from_str(
            r#"{
                "pages": [
                    {"page": 1, "lines": [{"text": "BIG MART", "words": []}, {"text": ""}]},
                    {"page": 2, "lines": [{"text": "Total 10.00"}]}
                ],
                "average_confidence": 0.95,
                "page_count": 2
            }"#,
        )
        .unwrap();
        assert_eq!(doc.receipt_text().unwrap(), "BIG MART\n\nTotal 10.00");
        assert_eq!(doc.page_count, Some(2));
    }

    #[test]
    fn test_no_text_is_an_error() {
        let doc = OcrDocument::from_text("   \n ");
        assert!(matches!(doc.receipt_text(), Err(InputError::NoText)));
    }
}
