//! Line segmentation of raw OCR text.

/// OCR text split into non-empty, trimmed lines in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText {
    lines: Vec<String>,
}

impl RawText {
    /// Split on line breaks, trim each line and drop the empty ones.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The first `n` lines (fewer if the text is shorter).
    pub fn head(&self, n: usize) -> &[String] {
        &self.lines[..n.min(self.lines.len())]
    }

    /// The last `n` lines (fewer if the text is shorter).
    pub fn tail(&self, n: usize) -> &[String] {
        &self.lines[self.lines.len().saturating_sub(n)..]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
