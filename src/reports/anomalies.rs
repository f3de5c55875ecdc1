//! Spend-spike detection
//!
//! A category is flagged for a month when its spend clearly exceeds its own
//! trailing average: by a relative margin AND by an absolute amount. The
//! averages are computed with integer arithmetic so no threshold is missed
//! or crossed through float rounding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, ExpenseEntry, Money, MonthKey};

/// Thresholds for flagging a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    /// Months strictly before the target month that form the average
    pub trailing_months: usize,
    /// Minimum increase over the average, in percent
    pub min_increase_pct: u32,
    /// Minimum increase over the average, in cents
    pub min_increase_cents: i64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            trailing_months: 6,
            min_increase_pct: 40,
            min_increase_cents: 5000,
        }
    }
}

/// A flagged category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub category: Category,
    pub current_cents: Money,
    /// Trailing average, rounded to the nearest cent
    pub avg_cents: Money,
    /// `current - average`, rounded to the nearest cent
    pub increase_cents: Money,
}

/// Sum of cents per (month, category)
pub fn aggregate_by_month_category(entries: &[ExpenseEntry]) -> HashMap<(MonthKey, Category), i64> {
    let mut totals = HashMap::new();
    for entry in entries {
        *totals
            .entry((entry.month_key(), entry.category))
            .or_insert(0) += entry.amount_cents.cents();
    }
    totals
}

/// Round `numerator / denominator` half up; `denominator` must be positive
pub(crate) fn div_round(numerator: i128, denominator: i128) -> i128 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// Flag categories whose spend in `month` spikes above their trailing average
///
/// Only categories in `categories` are considered. A category with no spend
/// in the trailing window is never flagged. Results are ordered by largest
/// increase first; ties keep the order of `categories`.
pub fn calc_category_anomalies(
    entries: &[ExpenseEntry],
    month: MonthKey,
    categories: &[Category],
    thresholds: &AnomalyThresholds,
) -> Vec<Anomaly> {
    let n = thresholds.trailing_months as i128;
    if n == 0 {
        return Vec::new();
    }

    let totals = aggregate_by_month_category(entries);
    let trailing = month.preceding(thresholds.trailing_months);
    let pct = 100 + thresholds.min_increase_pct as i128;

    let mut flagged: Vec<(i128, Anomaly)> = categories
        .iter()
        .filter_map(|&category| {
            let current = *totals.get(&(month, category)).unwrap_or(&0) as i128;
            let sum: i128 = trailing
                .iter()
                .map(|m| *totals.get(&(*m, category)).unwrap_or(&0) as i128)
                .sum();

            // n * (current - avg), kept exact
            let scaled_increase = n * current - sum;

            let passes = sum > 0
                && 100 * n * current > sum * pct
                && scaled_increase >= n * thresholds.min_increase_cents as i128;
            if !passes {
                return None;
            }

            Some((
                scaled_increase,
                Anomaly {
                    category,
                    current_cents: Money::from_cents(current as i64),
                    avg_cents: Money::from_cents(div_round(sum, n) as i64),
                    increase_cents: Money::from_cents(div_round(scaled_increase, n) as i64),
                },
            ))
        })
        .collect();

    flagged.sort_by(|a, b| b.0.cmp(&a.0));
    flagged.into_iter().map(|(_, anomaly)| anomaly).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentSource;
    use chrono::NaiveDate;

    fn entry(month: &str, category: Category, cents: i64) -> ExpenseEntry {
        let m: MonthKey = month.parse().unwrap();
        ExpenseEntry::new(
            NaiveDate::from_ymd_opt(m.year(), m.month(), 10).unwrap(),
            category,
            Money::from_cents(cents),
            PaymentSource::CreditCard,
            None,
        )
    }

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn six_months_of(category: Category, cents: i64, end: &str) -> Vec<ExpenseEntry> {
        key(end)
            .preceding(6)
            .iter()
            .map(|m| entry(&m.to_string(), category, cents))
            .collect()
    }

    #[test]
    fn test_flags_clear_spike() {
        let mut entries = six_months_of(Category::FoodShopping, 10000, "2025-07");
        entries.push(entry("2025-07", Category::FoodShopping, 25000));

        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-07"),
            Category::ALL,
            &AnomalyThresholds::default(),
        );

        assert_eq!(anomalies.len(), 1);
        let a = anomalies[0];
        assert_eq!(a.category, Category::FoodShopping);
        assert_eq!(a.current_cents.cents(), 25000);
        assert_eq!(a.avg_cents.cents(), 10000);
        assert_eq!(a.increase_cents.cents(), 15000);
    }

    #[test]
    fn test_no_history_never_flagged() {
        let entries = vec![entry("2025-07", Category::Holiday, 500000)];
        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-07"),
            Category::ALL,
            &AnomalyThresholds::default(),
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_both_gates_required() {
        // +50% but only 5.00 more in absolute terms
        let mut small = six_months_of(Category::Lunch, 1000, "2025-07");
        small.push(entry("2025-07", Category::Lunch, 1500));
        assert!(calc_category_anomalies(
            &small,
            key("2025-07"),
            &[Category::Lunch],
            &AnomalyThresholds::default()
        )
        .is_empty());

        // +100.00 but only +10%
        let mut large = six_months_of(Category::Mortgage, 100000, "2025-07");
        large.push(entry("2025-07", Category::Mortgage, 110000));
        assert!(calc_category_anomalies(
            &large,
            key("2025-07"),
            &[Category::Mortgage],
            &AnomalyThresholds::default()
        )
        .is_empty());
    }

    #[test]
    fn test_exact_forty_percent_is_not_flagged() {
        // average 12500, current exactly 1.4x = 17500
        let mut entries = six_months_of(Category::Gas, 12500, "2025-07");
        entries.push(entry("2025-07", Category::Gas, 17500));
        assert!(calc_category_anomalies(
            &entries,
            key("2025-07"),
            &[Category::Gas],
            &AnomalyThresholds::default()
        )
        .is_empty());
    }

    #[test]
    fn test_trailing_window_crosses_year_boundary() {
        // history lives in 2024-08 .. 2025-01
        let mut entries = six_months_of(Category::Petrol, 6000, "2025-02");
        entries.push(entry("2025-02", Category::Petrol, 20000));
        // outside the window, must not count
        entries.push(entry("2024-07", Category::Petrol, 900000));

        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-02"),
            &[Category::Petrol],
            &AnomalyThresholds::default(),
        );
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].avg_cents.cents(), 6000);
    }

    #[test]
    fn test_partial_history_averages_missing_months_as_zero() {
        // one prior month of 60000 averages to 10000 over six months
        let entries = vec![
            entry("2025-06", Category::Clothes, 60000),
            entry("2025-07", Category::Clothes, 20000),
        ];
        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-07"),
            &[Category::Clothes],
            &AnomalyThresholds::default(),
        );
        assert_eq!(anomalies[0].avg_cents.cents(), 10000);
        assert_eq!(anomalies[0].increase_cents.cents(), 10000);
    }

    #[test]
    fn test_sorted_by_increase_and_rounded() {
        let mut entries = six_months_of(Category::Home, 10001, "2025-07");
        entries.push(entry("2025-07", Category::Home, 30000));
        entries.extend(six_months_of(Category::Car, 10000, "2025-07"));
        entries.push(entry("2025-07", Category::Car, 90000));

        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-07"),
            Category::ALL,
            &AnomalyThresholds::default(),
        );

        assert_eq!(anomalies[0].category, Category::Car);
        assert_eq!(anomalies[1].category, Category::Home);
        assert_eq!(anomalies[1].avg_cents.cents(), 10001);
        assert_eq!(anomalies[1].increase_cents.cents(), 19999);
    }

    #[test]
    fn test_only_requested_categories() {
        let mut entries = six_months_of(Category::Beauty, 10000, "2025-07");
        entries.push(entry("2025-07", Category::Beauty, 50000));
        let anomalies = calc_category_anomalies(
            &entries,
            key("2025-07"),
            &[Category::Gifts],
            &AnomalyThresholds::default(),
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(5, 2), 3);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(-5, 2), -2);
    }

    #[test]
    fn test_thresholds_deserialize_partially() {
        let t: AnomalyThresholds = serde_json::from_str(r#"{"trailing_months": 3}"#).unwrap();
        assert_eq!(t.trailing_months, 3);
        assert_eq!(t.min_increase_pct, 40);
    }
}
