//! Calendar month keys and local-date helpers
//!
//! A month key is the `YYYY-MM` string that groups expenses and identifies
//! an income record. Dates are user-local calendar days and are never
//! converted to UTC.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month (e.g. "2025-01")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(MonthParseError::OutOfRange(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::from_date(today_local())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months since year 0, used for carry-free arithmetic
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }

    /// Shift by `step` months, carrying across year boundaries; `step` may be negative
    pub fn shift(&self, step: i32) -> Self {
        Self::from_ordinal(self.ordinal() + step as i64)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    /// The `n` months ending at (and including) `self`, oldest first
    pub fn range_back(&self, n: usize) -> Vec<MonthKey> {
        (0..n)
            .map(|i| self.shift(-((n - 1 - i) as i32)))
            .collect()
    }

    /// The `n` months strictly before `self`, most recent first
    pub fn preceding(&self, n: usize) -> Vec<MonthKey> {
        (1..=n).map(|i| self.shift(-(i as i32))).collect()
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Today's date in local time
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` calendar date
///
/// The text must have exactly that shape and name a real day; `2025-02-30`
/// and `2025-2-3` are both rejected.
pub fn parse_date_local(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    let year = raw[0..4].parse().ok()?;
    let month = raw[5..7].parse().ok()?;
    let day = raw[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Month key of a `YYYY-MM-DD` date
pub fn to_month_key(date: NaiveDate) -> MonthKey {
    MonthKey::from_date(date)
}

/// The `n` month keys ending at `end`, oldest first
pub fn month_range_back(n: usize, end: MonthKey) -> Vec<MonthKey> {
    end.range_back(n)
}

/// Month arithmetic with carry; `step` may be negative
pub fn next_month_key(month: MonthKey, step: i32) -> MonthKey {
    month.shift(step)
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .filter(|(y, m)| {
                y.len() == 4
                    && m.len() == 2
                    && y.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit())
            })
            .ok_or_else(|| MonthParseError::InvalidFormat(s.to_string()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Error type for month key parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid month '{}' (expected YYYY-MM)", s),
            Self::OutOfRange(s) => write!(f, "Month out of range: {}", s),
        }
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let m = key("2025-01");
        assert_eq!(m.year(), 2025);
        assert_eq!(m.month(), 1);
        assert_eq!(m.to_string(), "2025-01");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("2025-00".parse::<MonthKey>().is_err());
        assert!("2025-1".parse::<MonthKey>().is_err());
        assert!("202501".parse::<MonthKey>().is_err());
        assert!("2025-01-15".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_shift_crosses_year_boundaries() {
        assert_eq!(key("2025-12").next(), key("2026-01"));
        assert_eq!(key("2025-01").prev(), key("2024-12"));
        assert_eq!(next_month_key(key("2025-03"), -15), key("2023-12"));
        assert_eq!(next_month_key(key("2025-03"), 22), key("2027-01"));
        assert_eq!(key("2025-03").shift(0), key("2025-03"));
    }

    #[test]
    fn test_range_back() {
        let months = month_range_back(4, key("2025-02"));
        let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert!(month_range_back(0, key("2025-02")).is_empty());
    }

    #[test]
    fn test_preceding() {
        let months = key("2025-02").preceding(3);
        assert_eq!(months, vec![key("2025-01"), key("2024-12"), key("2024-11")]);
    }

    #[test]
    fn test_to_month_key_and_contains() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        let m = to_month_key(date);
        assert_eq!(m, key("2026-02"));
        assert!(m.contains(date));
        assert!(!m.next().contains(date));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&key("2025-07")).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let parsed: MonthKey = serde_json::from_str("\"2024-12\"").unwrap();
        assert_eq!(parsed, key("2024-12"));
        assert!(serde_json::from_str::<MonthKey>("\"2024-13\"").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(key("2024-12") < key("2025-01"));
    }

    #[test]
    fn test_parse_date_local() {
        assert_eq!(
            parse_date_local("2025-02-28"),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert!(parse_date_local("2025-02-30").is_none());
        assert!(parse_date_local("2025-2-3").is_none());
        assert!(parse_date_local("2025/02/03").is_none());
        assert!(parse_date_local(" 2025-02-03").is_none());
        assert!(parse_date_local("").is_none());
    }

    #[test]
    fn test_signed_year_rejected() {
        assert!("+202-01".parse::<MonthKey>().is_err());
    }
}
