//! Purchase date extraction.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::debug;

use crate::models::config::DateOrder;

use super::patterns::{DATE_MONTH_NAME, DATE_NUMERIC, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// One date pattern and how to build a date from its captures.
pub struct DateRule {
    /// Rule name, for logging.
    pub name: &'static str,
    pattern: &'static Regex,
    build: fn(&Captures, DateOrder) -> Option<NaiveDate>,
}

impl DateRule {
    /// Build a date from the first match of this rule.
    fn first(&self, text: &str, order: DateOrder) -> Option<ExtractionMatch<NaiveDate>> {
        let caps = self.pattern.captures(text)?;
        to_match(&caps, (self.build)(&caps, order)?)
    }

    /// Build dates from every match of this rule, skipping invalid ones.
    fn all(&self, text: &str, order: DateOrder) -> Vec<ExtractionMatch<NaiveDate>> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| to_match(&caps, (self.build)(&caps, order)?))
            .collect()
    }
}

fn to_match(caps: &Captures, date: NaiveDate) -> Option<ExtractionMatch<NaiveDate>> {
    let full = caps.get(0)?;
    Some(ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()))
}

/// Date rules in priority order.
fn rules() -> [DateRule; 3] {
    [
        DateRule {
            name: "numeric",
            pattern: &DATE_NUMERIC,
            build: build_numeric,
        },
        DateRule {
            name: "year_first",
            pattern: &DATE_YMD,
            build: build_year_first,
        },
        DateRule {
            name: "month_name",
            pattern: &DATE_MONTH_NAME,
            build: build_month_name,
        },
    ]
}

/// Date field extractor.
pub struct DateExtractor {
    order: DateOrder,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            order: DateOrder::Auto,
        }
    }

    /// Set how ambiguous numeric dates are read.
    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    /// Only the first match of each rule is considered; an invalid date
    /// falls through to the next rule.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        rules().iter().find_map(|rule| {
            let found = rule.first(text, self.order)?;
            debug!("Date {:?} matched by {} rule", found.source, rule.name);
            Some(found)
        })
    }

    /// Every constructible date, in rule priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for rule in rules().iter() {
            for found in rule.all(text, self.order) {
                // Skip if already found
                if results.iter().any(|r| r.value == found.value) {
                    continue;
                }
                results.push(found);
            }
        }

        results
    }
}

fn build_numeric(caps: &Captures, order: DateOrder) -> Option<NaiveDate> {
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year_token = &caps[3];
    let year = parse_year(year_token)?;

    let day_first = match order {
        DateOrder::DayFirst => true,
        DateOrder::MonthFirst => false,
        DateOrder::Auto => {
            year_token.len() == 4 && (year_token.starts_with("20") || year_token.starts_with("19"))
        }
    };

    if day_first {
        NaiveDate::from_ymd_opt(year, second, first)
    } else {
        NaiveDate::from_ymd_opt(year, first, second)
    }
}

fn build_year_first(caps: &Captures, _order: DateOrder) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn build_month_name(caps: &Captures, _order: DateOrder) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let year = parse_year(&caps[3])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    // Two-digit year: assume 2000s
    Some(if year < 100 { year + 2000 } else { year })
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn extract(text: &str) -> Option<NaiveDate> {
        DateExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_four_digit_year_is_day_first() {
        assert_eq!(extract("Date: 15/01/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract("03-04-2023"), Some(ymd(2023, 4, 3)));
    }

    #[test]
    fn test_two_digit_year_is_month_first() {
        assert_eq!(extract("01/15/24"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract("03/04/23"), Some(ymd(2023, 3, 4)));
    }

    #[test]
    fn test_order_hint() {
        let text = "03/04/23";
        let day_first = DateExtractor::new().with_order(DateOrder::DayFirst);
        let month_first = DateExtractor::new().with_order(DateOrder::MonthFirst);

        assert_eq!(day_first.extract(text).unwrap().value, ymd(2023, 4, 3));
        assert!(month_first.extract("15/01/2024").is_none());
        assert_eq!(month_first.extract(text).unwrap().value, ymd(2023, 3, 4));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(extract("2024-01-15 10:30"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract("2023/12/31"), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(extract("15 Jan 2024 10:30 AM"), Some(ymd(2024, 1, 15)));
        assert_eq!(extract("3 SEPTEMBER 23"), Some(ymd(2023, 9, 3)));
    }

    #[test]
    fn test_invalid_numeric_falls_through() {
        // 25/13/24 is invalid either way; the ISO date wins instead.
        let text = "Ref 25/13/24\nPrinted 2024-02-29";
        assert_eq!(extract(text), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn test_only_first_match_per_rule() {
        // The first numeric match is invalid; a later valid numeric date is
        // not consulted, and no other rule matches.
        assert_eq!(extract("31/02/2024 then 01/02/2024"), None);
    }

    #[test]
    fn test_extract_all_collects_every_rule() {
        let text = "31/02/2024 then 01/02/2024, due 2024-03-01, paid 5 Mar 2024";
        let values: Vec<NaiveDate> = DateExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec![ymd(2024, 2, 1), ymd(2024, 3, 1), ymd(2024, 3, 5)]);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("Thank you for shopping"), None);
    }

    #[test]
    fn test_month_from_name() {
        assert_eq!(month_from_name("Dec"), Some(12));
        assert_eq!(month_from_name("june"), Some(6));
        assert_eq!(month_from_name("xyz"), None);
    }
}
