//! Structured receipt produced by the parser.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store name used when no header line qualifies.
pub const UNKNOWN_STORE: &str = "Unknown Store";

/// Currency used when no currency symbol is found.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A fully populated receipt record.
///
/// Every field carries either an extracted value or its documented default,
/// so consumers never have to deal with a half-built receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Merchant name, or the "unknown store" placeholder.
    pub store_name: String,

    /// Up to three header lines following the store name, joined by ", ".
    pub store_address: Option<String>,

    /// First URL-like header line.
    pub store_website: Option<String>,

    /// Purchase date; today's date when none was found.
    pub purchase_date: NaiveDate,

    /// Grand total.
    pub total_amount: Decimal,

    /// Tax/VAT/GST amount.
    pub tax_amount: Decimal,

    /// Receipt/invoice number, or a generated placeholder.
    pub receipt_number: String,

    /// Payment method, e.g. `VISA ****1234` or `CASH`.
    pub payment_method: Option<String>,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Purchased items in document order.
    pub items: Vec<LineItem>,

    /// The unparsed OCR text.
    pub raw_text: String,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name as printed (may be empty).
    pub description: String,

    /// Quantity, 1 unless a quantity column was found.
    pub quantity: Decimal,

    /// Price per unit, observed or derived from the line total.
    pub unit_price: Option<Decimal>,

    /// Line total (the trailing price on the line).
    pub total_price: Decimal,

    /// 1-based position among emitted items.
    pub serial_no: u32,
}

impl LineItem {
    /// Create an item with quantity 1 and the unit price equal to the total.
    pub fn new(description: impl Into<String>, total_price: Decimal, serial_no: u32) -> Self {
        Self {
            description: description.into(),
            quantity: Decimal::ONE,
            unit_price: Some(total_price),
            total_price,
            serial_no,
        }
    }
}

impl ParsedReceipt {
    /// An empty receipt for the given date, with every field at its default.
    pub fn empty(purchase_date: NaiveDate, receipt_number: impl Into<String>) -> Self {
        Self {
            store_name: UNKNOWN_STORE.to_string(),
            store_address: None,
            store_website: None,
            purchase_date,
            total_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            receipt_number: receipt_number.into(),
            payment_method: None,
            currency: DEFAULT_CURRENCY.to_string(),
            items: Vec::new(),
            raw_text: String::new(),
        }
    }

    /// Sum of all item totals.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Validate the receipt data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.store_name == UNKNOWN_STORE {
            issues.push("Missing store name".to_string());
        }

        if self.total_amount.is_zero() {
            issues.push("Total amount is zero".to_string());
        }

        if self.tax_amount > self.total_amount {
            issues.push(format!(
                "Tax amount ({}) exceeds total amount ({})",
                self.tax_amount, self.total_amount
            ));
        }

        if !self.items.is_empty() && !self.total_amount.is_zero() {
            let items_total = self.items_total();
            // Totals usually include tax, so accept either form.
            let matches_total = (items_total - self.total_amount).abs() <= Decimal::new(1, 2);
            let matches_net = (items_total + self.tax_amount - self.total_amount).abs()
                <= Decimal::new(1, 2);

            if !matches_total && !matches_net {
                issues.push(format!(
                    "Line item total ({}) differs from receipt total ({})",
                    items_total, self.total_amount
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> ParsedReceipt {
        let mut receipt =
            ParsedReceipt::empty(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), "RCP-1");
        receipt.store_name = "BIG MART".to_string();
        receipt.items = vec![
            LineItem::new("MILK", dec("50.00"), 1),
            LineItem::new("BREAD", dec("15.00"), 2),
        ];
        receipt.tax_amount = dec("6.50");
        receipt.total_amount = dec("71.50");
        receipt
    }

    #[test]
    fn test_empty_receipt_defaults() {
        let receipt = ParsedReceipt::empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "X");
        assert_eq!(receipt.store_name, UNKNOWN_STORE);
        assert_eq!(receipt.currency, DEFAULT_CURRENCY);
        assert_eq!(receipt.total_amount, Decimal::ZERO);
        assert!(receipt.items.is_empty());
    }

    #[test]
    fn test_validate_consistent_receipt() {
        assert!(sample().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut receipt = sample();
        receipt.total_amount = dec("5.00");

        let issues = receipt.validate();
        assert!(issues.iter().any(|i| i.starts_with("Tax amount")));
        assert!(issues.iter().any(|i| i.starts_with("Line item total")));
    }

    #[test]
    fn test_serializes_iso_date() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["purchase_date"], "2024-01-15");
        assert_eq!(json["items"][1]["serial_no"], 2);
    }
}
