//! Monthly spend trend with a trailing moving average

use serde::Serialize;

use crate::models::{month_range_back, Category, ExpenseEntry, Money, MonthKey};

use super::anomalies::div_round;

/// Trailing moving average
///
/// The output has the same length as `values`. The first `window - 1`
/// positions are `None`; every other position is the mean of that value and
/// the `window - 1` before it, rounded half up. A zero window yields all `None`.
pub fn moving_average(values: &[i64], window: usize) -> Vec<Option<i64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return None;
            }
            let sum: i128 = values[i + 1 - window..=i].iter().map(|v| *v as i128).sum();
            Some(div_round(sum, window as i128) as i64)
        })
        .collect()
}

/// One month of the trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: MonthKey,
    pub spend: Money,
    /// `None` until enough months of history exist
    pub moving_average: Option<Money>,
    /// Spend of the filtered category, when a filter is set
    pub category_spend: Option<Money>,
}

/// Spend per month over a fixed window ending at a given month
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub end_month: MonthKey,
    pub window: usize,
    pub category: Option<Category>,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    /// Bucket `entries` into the `months` months ending at `end_month`
    pub fn generate(
        entries: &[ExpenseEntry],
        end_month: MonthKey,
        months: usize,
        window: usize,
        category: Option<Category>,
    ) -> Self {
        let range = month_range_back(months, end_month);

        let month_total = |month: MonthKey, only: Option<Category>| -> i64 {
            entries
                .iter()
                .filter(|e| e.month_key() == month)
                .filter(|e| only.map_or(true, |c| e.category == c))
                .map(|e| e.amount_cents.cents())
                .sum()
        };

        let totals: Vec<i64> = range.iter().map(|m| month_total(*m, None)).collect();
        let averages = moving_average(&totals, window);

        let points = range
            .iter()
            .zip(totals.iter().zip(averages))
            .map(|(month, (total, avg))| TrendPoint {
                month: *month,
                spend: Money::from_cents(*total),
                moving_average: avg.map(Money::from_cents),
                category_spend: category.map(|c| Money::from_cents(month_total(*month, Some(c)))),
            })
            .collect();

        Self {
            end_month,
            window,
            category,
            points,
        }
    }

    /// Largest monthly figure, used to scale terminal bars
    pub fn peak(&self) -> Money {
        self.points
            .iter()
            .flat_map(|p| [Some(p.spend), p.moving_average, p.category_spend])
            .flatten()
            .max()
            .unwrap_or_default()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        const BAR_WIDTH: i64 = 30;

        let mut output = String::new();
        output.push_str(&format!(
            "Spend trend: {} months to {}",
            self.points.len(),
            self.end_month
        ));
        if let Some(category) = self.category {
            output.push_str(&format!(" ({})", category));
        }
        output.push('\n');
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>12}\n",
            "Month",
            "Spend",
            format!("{}-mo avg", self.window),
            "Category"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        let peak = self.peak().cents().max(1);
        for point in &self.points {
            let bar_len = (point.spend.cents() * BAR_WIDTH / peak) as usize;
            let fmt = |m: Option<Money>| {
                m.map(|m| m.format_with_symbol(currency))
                    .unwrap_or_else(|| "-".to_string())
            };
            output.push_str(&format!(
                "{:<8} {:>12} {:>12} {:>12}  {}\n",
                point.month.to_string(),
                point.spend.format_with_symbol(currency),
                fmt(point.moving_average),
                fmt(point.category_spend),
                "#".repeat(bar_len)
            ));
        }

        output
    }
}
