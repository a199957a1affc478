//! Line item extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::models::receipt::LineItem;

use super::amounts::parse_amount;
use super::patterns::{COLUMN_GAP, MONEY_COLUMN, QUANTITY_COLUMN, TRAILING_MONEY};
use super::LineExtractor;

/// Keywords that end the items region.
const SUMMARY_KEYWORDS: &[&str] = &["subtotal", "total", "grand", "tax", "vat", "gst"];

/// Line item extractor.
///
/// Items are the lines ending with a price, above the first summary line.
pub struct ItemExtractor;

impl ItemExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Index of the first summary line, or the line count.
    pub fn items_end(&self, lines: &[String]) -> usize {
        lines
            .iter()
            .position(|line| {
                let lower = line.to_lowercase();
                SUMMARY_KEYWORDS.iter().any(|k| lower.contains(k))
            })
            .unwrap_or(lines.len())
    }

    /// Parse one line; `None` when it does not end with a price.
    pub fn parse_line(&self, line: &str, serial_no: u32) -> Option<LineItem> {
        let price = TRAILING_MONEY.captures(line)?.get(1)?;
        let Some(total_price) = parse_amount(price.as_str()) else {
            debug!("Skipping item line, price out of range: {:?}", line);
            return None;
        };

        let mut columns: Vec<&str> = COLUMN_GAP.split(line).filter(|c| !c.is_empty()).collect();
        if columns.len() < 2 {
            columns = line.split_whitespace().collect();
        }

        // A lone column is the price itself, possibly glued to a name.
        let description = if columns.len() < 2 {
            line[..price.start()]
                .trim()
                .trim_end_matches(['$', '€', '£', '₹', '¥', '₱'])
                .trim()
                .to_string()
        } else {
            columns[0].to_string()
        };

        let mut quantity = Decimal::ONE;
        let mut unit_price = None;

        for column in columns.iter().skip(1) {
            if let Some(caps) = QUANTITY_COLUMN.captures(column) {
                if let Ok(q) = Decimal::from_str(&caps[1]) {
                    quantity = q;
                }
            } else if let Some(caps) = MONEY_COLUMN.captures(column) {
                let value = parse_amount(&caps[1]);
                if unit_price.is_none() && value.is_some_and(|v| v != total_price) {
                    unit_price = value;
                }
            }
        }

        if unit_price.is_none() && quantity > Decimal::ZERO {
            unit_price = total_price.checked_div(quantity);
        }

        let mut item = LineItem::new(description, total_price, serial_no);
        item.quantity = quantity;
        item.unit_price = unit_price;
        Some(item)
    }
}

impl Default for ItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for ItemExtractor {
    type Output = Vec<LineItem>;

    fn extract_lines(&self, lines: &[String]) -> Vec<LineItem> {
        let end = self.items_end(lines);
        let mut items = Vec::new();

        for line in &lines[..end] {
            let serial_no = items.len() as u32 + 1;
            if let Some(item) = self.parse_line(line, serial_no) {
                items.push(item);
            }
        }

        items
    }
}
