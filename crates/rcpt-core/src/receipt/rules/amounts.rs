//! Money amounts, totals and tax.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::MONEY;
use super::{ExtractionMatch, FieldExtractor, LineExtractor};

/// Money token extractor (`1,234.56`, exactly two decimals).
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(1)?;
                let amount = parse_amount(token.as_str())?;
                Some(
                    ExtractionMatch::new(amount, token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
            .collect()
    }
}

/// Parse a receipt amount with optional comma thousands separators.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(cleaned.trim()).ok()
}

/// Where the last money token of a footer line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Tax,
    Total,
}

type LineRule = (fn(&str) -> bool, Slot);

/// Footer line rules, evaluated in order; the first matching rule
/// classifies the line.
const LINE_RULES: &[LineRule] = &[
    (is_tax_line, Slot::Tax),
    (is_total_line, Slot::Total),
    (is_grand_or_amount_line, Slot::Total),
];

fn is_tax_line(lower: &str) -> bool {
    ["tax", "vat", "gst"].iter().any(|k| lower.contains(k))
}

fn is_total_line(lower: &str) -> bool {
    lower.contains("total") && !lower.contains("sub")
}

fn is_grand_or_amount_line(lower: &str) -> bool {
    lower.contains("grand") || lower.contains("amount")
}

/// Candidates collected from the receipt footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsCandidates {
    /// Last tax candidate seen.
    pub tax: Option<Decimal>,
    /// Every total-like value, in document order.
    pub totals: Vec<Decimal>,
}

impl TotalsCandidates {
    /// The grand total: the largest total candidate.
    ///
    /// Grand totals are never smaller than partial ones on a well-formed
    /// receipt. A larger non-total figure on a "total" line (e.g. savings)
    /// wins as well.
    pub fn total(&self) -> Option<Decimal> {
        self.totals.iter().copied().max()
    }
}

/// Totals/tax extractor over the last lines of the receipt.
pub struct TotalsExtractor {
    scan_lines: usize,
    amounts: AmountExtractor,
}

impl TotalsExtractor {
    pub fn new() -> Self {
        Self {
            scan_lines: 15,
            amounts: AmountExtractor::new(),
        }
    }

    /// Set how many trailing lines are inspected.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }
}

impl Default for TotalsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for TotalsExtractor {
    type Output = TotalsCandidates;

    fn extract_lines(&self, lines: &[String]) -> TotalsCandidates {
        let mut result = TotalsCandidates::default();
        let start = lines.len().saturating_sub(self.scan_lines);

        for line in &lines[start..] {
            let lower = line.to_lowercase();
            let Some(slot) = LINE_RULES
                .iter()
                .find(|(matches, _)| matches(&lower))
                .map(|(_, slot)| *slot)
            else {
                continue;
            };

            // Trailing tokens hold the final column values.
            let Some(last) = self.amounts.extract_all(line).pop() else {
                continue;
            };

            match slot {
                Slot::Tax => result.tax = Some(last.value),
                Slot::Total => result.totals.push(last.value),
            }
        }

        result
    }
}
