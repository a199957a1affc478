//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric dates: D/M/Y or M/D/Y (ambiguous), 2-4 digit year
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})\b"
    ).unwrap();

    // ISO-like dates: YYYY-MM-DD or YYYY/MM/DD
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})\b"
    ).unwrap();

    // "15 Jan 2024", "3 September 24"
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*)\s+(\d{2,4})\b"
    ).unwrap();

    // Money token anywhere on a line: 1,234.56 (exactly two decimals)
    pub static ref MONEY: Regex = Regex::new(
        r"(\d[\d,]*\.\d{2})(?:\D|$)"
    ).unwrap();

    // Money token ending a line
    pub static ref TRAILING_MONEY: Regex = Regex::new(
        r"(\d[\d,]*\.\d{2})$"
    ).unwrap();

    // A whole column holding a money value, optionally prefixed by a symbol
    pub static ref MONEY_COLUMN: Regex = Regex::new(
        r"^[$€£₹¥₱]?(\d[\d,]*\.\d{2})$"
    ).unwrap();

    // A whole column holding a quantity: "2", "2x", "3X"
    pub static ref QUANTITY_COLUMN: Regex = Regex::new(
        r"^(\d+)[xX]?$"
    ).unwrap();

    // Column separator: two or more whitespace characters
    pub static ref COLUMN_GAP: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    // Website lines in the receipt header
    pub static ref WEBSITE: Regex = Regex::new(
        r"(?i)www\.|\.com|\.org|\.net|https?://"
    ).unwrap();

    // Masked card number: ****1234
    pub static ref MASKED_CARD: Regex = Regex::new(
        r"\*{4,}\d{4}"
    ).unwrap();

    // Receipt/invoice number following a label
    pub static ref RECEIPT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:receipt|invoice|bill|txn|trans|order)\b\s*(?:no\.?|num(?:ber)?|id)?\s*[:#\-]?\s*([A-Z0-9][A-Z0-9\-]+)\b"
    ).unwrap();
}
