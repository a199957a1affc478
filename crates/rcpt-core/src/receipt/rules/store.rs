//! Store name, address and website from the receipt header.

use super::patterns::WEBSITE;
use super::LineExtractor;

/// Words that mark a line as a store name.
const STORE_KEYWORDS: &[&str] = &[
    "store",
    "mart",
    "shop",
    "supermarket",
    "electronics",
    "retail",
    "market",
];

/// Header information found at the top of a receipt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

/// Store-info extractor over the first lines of the receipt.
pub struct StoreExtractor {
    scan_lines: usize,
    max_address_lines: usize,
}

impl StoreExtractor {
    pub fn new() -> Self {
        Self {
            scan_lines: 10,
            max_address_lines: 3,
        }
    }

    /// Set how many leading lines are inspected.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    /// Set how many lines after the name form the address.
    pub fn with_max_address_lines(mut self, max_address_lines: usize) -> Self {
        self.max_address_lines = max_address_lines;
        self
    }
}

impl Default for StoreExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for StoreExtractor {
    type Output = StoreInfo;

    fn extract_lines(&self, lines: &[String]) -> StoreInfo {
        let mut info = StoreInfo::default();
        let mut address_parts: Vec<&str> = Vec::new();

        for line in lines.iter().take(self.scan_lines) {
            if WEBSITE.is_match(line) {
                if info.website.is_none() {
                    info.website = Some(line.clone());
                }
                continue;
            }

            if info.name.is_none() {
                if looks_like_store_name(line) {
                    info.name = Some(line.clone());
                }
            } else if address_parts.len() < self.max_address_lines {
                address_parts.push(line);
            }
        }

        if !address_parts.is_empty() {
            info.address = Some(address_parts.join(", "));
        }

        info
    }
}

/// Mostly-uppercase lines and lines naming a kind of shop qualify.
fn looks_like_store_name(line: &str) -> bool {
    uppercase_ratio(line) > 0.5 || has_store_keyword(line)
}

fn uppercase_ratio(line: &str) -> f64 {
    let len = line.chars().count();
    if len == 0 {
        return 0.0;
    }
    let upper = line.chars().filter(|c| c.is_ascii_uppercase()).count();
    upper as f64 / len as f64
}

fn has_store_keyword(line: &str) -> bool {
    let lower = line.to_lowercase();
    STORE_KEYWORDS.iter().any(|k| lower.contains(k))
}
