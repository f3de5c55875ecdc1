//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations, formatting, and the parsing
//! rules used for user-entered amounts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::LazyLock;

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("valid amount pattern"));

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use expense_tracker::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_decimal_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Fixed-point text with exactly two decimals and no grouping ("12.34")
    ///
    /// This is the interchange format used by CSV export; it never depends on
    /// the locale.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }

    /// Amount as a decimal number rounded to the nearest cent
    ///
    /// Used for spreadsheet cells where the amount must stay numeric.
    pub fn to_number(&self) -> f64 {
        ((self.0 as f64 / 100.0) * 100.0).round() / 100.0
    }

    /// Format with a currency symbol and thousands separators ("€1,234.56")
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let digits = self.units().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, grouped, self.cents_part())
    }

    /// Parse a user-entered amount into a strictly positive Money value
    ///
    /// Surrounding and internal whitespace is removed and a comma is accepted
    /// as the decimal separator. The remaining text must be digits with an
    /// optional fraction of one or two digits.
    pub fn parse(raw: &str) -> Result<Self, MoneyParseError> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .replacen(',', ".", 1);

        if normalized.is_empty() {
            return Err(MoneyParseError::Required);
        }
        if !AMOUNT_PATTERN.is_match(&normalized) {
            return Err(MoneyParseError::InvalidFormat);
        }

        let (whole, fraction) = normalized.split_once('.').unwrap_or((normalized.as_str(), ""));
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyParseError::InvalidFormat)? * 10,
            _ => fraction.parse::<i64>().map_err(|_| MoneyParseError::InvalidFormat)?,
        };
        let cents = whole
            .parse::<i64>()
            .ok()
            .and_then(|w| w.checked_mul(100))
            .and_then(|w| w.checked_add(fraction_cents))
            .ok_or(MoneyParseError::InvalidFormat)?;

        if cents <= 0 {
            return Err(MoneyParseError::NotPositive);
        }
        Ok(Self(cents))
    }

    /// Parse a decimal number leniently into cents
    ///
    /// Accepts anything `f64` parsing accepts after a comma-to-dot swap and
    /// rounds to the nearest cent. Returns `None` when the value is not finite.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let value: f64 = raw.trim().replacen(',', ".", 1).parse().ok()?;
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }
}

/// Parse a user-entered amount into cents
///
/// Thin wrapper over [`Money::parse`] for callers that only need the integer.
pub fn parse_money_to_cents(raw: &str) -> Result<i64, MoneyParseError> {
    Money::parse(raw).map(|m| m.cents())
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("€"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
///
/// The display text is shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyParseError {
    Required,
    InvalidFormat,
    NotPositive,
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Required => write!(f, "Amount is required."),
            MoneyParseError::InvalidFormat => write!(f, "Use a valid amount (e.g. 12.34)."),
            MoneyParseError::NotPositive => write!(f, "Amount must be greater than 0."),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "€10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "€0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-€10.50");
        assert_eq!(format!("{}", Money::from_cents(123456789)), "€1,234,567.89");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(1234).to_decimal_string(), "12.34");
        assert_eq!(Money::from_cents(500).to_decimal_string(), "5.00");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-250).to_decimal_string(), "-2.50");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Money::from_cents(1234).to_number(), 12.34);
        assert_eq!(Money::from_cents(199).to_number(), 1.99);
        assert_eq!(Money::from_cents(100000).to_number(), 1000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse_accepts_valid_shapes() {
        assert_eq!(parse_money_to_cents("12.34"), Ok(1234));
        assert_eq!(parse_money_to_cents("12,34"), Ok(1234));
        assert_eq!(parse_money_to_cents(" 1 234,5 "), Ok(123450));
        assert_eq!(parse_money_to_cents("7"), Ok(700));
        assert_eq!(parse_money_to_cents("0.01"), Ok(1));
        assert_eq!(parse_money_to_cents("0.1"), Ok(10));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(parse_money_to_cents(""), Err(MoneyParseError::Required));
        assert_eq!(parse_money_to_cents("   "), Err(MoneyParseError::Required));
        assert_eq!(parse_money_to_cents("abc"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(parse_money_to_cents("1.2.3"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(parse_money_to_cents("1.234"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(parse_money_to_cents("-5"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(parse_money_to_cents("0"), Err(MoneyParseError::NotPositive));
        assert_eq!(parse_money_to_cents("0.00"), Err(MoneyParseError::NotPositive));
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(MoneyParseError::Required.to_string(), "Amount is required.");
        assert_eq!(
            MoneyParseError::InvalidFormat.to_string(),
            "Use a valid amount (e.g. 12.34)."
        );
        assert_eq!(
            MoneyParseError::NotPositive.to_string(),
            "Amount must be greater than 0."
        );
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Money::parse_lenient("12,5").map(|m| m.cents()), Some(1250));
        assert_eq!(Money::parse_lenient("1e3").map(|m| m.cents()), Some(100000));
        assert_eq!(Money::parse_lenient("0.125").map(|m| m.cents()), Some(13));
        assert_eq!(Money::parse_lenient("abc"), None);
        assert_eq!(Money::parse_lenient("inf"), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }

    #[test]
    fn test_only_ascii_digits_accepted() {
        assert_eq!(Money::parse("١٢"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(Money::parse("１２.５０"), Err(MoneyParseError::InvalidFormat));
        assert!(!AMOUNT_PATTERN.is_match("٣.٥"));
        assert!(AMOUNT_PATTERN.is_match("3.50"));
    }
}
