//! Month report
//!
//! Totals, income, net result, category and payment-source breakdowns and
//! spend spikes for one calendar month.

use serde::Serialize;

use crate::error::TrackerResult;
use crate::models::{Category, ExpenseEntry, IncomeMonth, Money, MonthKey, PaymentSource};
use crate::storage::{ExpenseStore, IncomeStore, Storage};

use super::anomalies::{calc_category_anomalies, div_round, Anomaly, AnomalyThresholds};

/// Spend of one category within the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: Category,
    pub total: Money,
    pub count: usize,
    /// Whole-number share of the month's spend
    pub percent: i64,
}

/// Spend per payment source within the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSpend {
    pub payment_source: PaymentSource,
    pub total: Money,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    pub month: MonthKey,
    pub total_spend: Money,
    pub total_income: Money,
    /// Income minus spend; negative when overspent
    pub net: Money,
    pub income: Option<IncomeMonth>,
    /// Largest category first
    pub by_category: Vec<CategorySpend>,
    pub by_payment: Vec<PaymentSpend>,
    pub anomalies: Vec<Anomaly>,
    pub entry_count: usize,
}

/// Rounded whole percentage of `part` in `total`; 0 when `total` is 0
pub fn percent_of(part: Money, total: Money) -> i64 {
    if total.is_zero() {
        return 0;
    }
    div_round(100 * part.cents() as i128, total.cents() as i128) as i64
}

impl MonthReport {
    /// Build the report from stored data
    pub fn generate(
        storage: &Storage,
        month: MonthKey,
        categories: &[Category],
        thresholds: &AnomalyThresholds,
    ) -> TrackerResult<Self> {
        let entries = storage.expenses.all()?;
        let income = storage.incomes.get(month)?;
        Ok(Self::from_entries(
            &entries, income, month, categories, thresholds,
        ))
    }

    /// Build the report from a snapshot of all entries
    ///
    /// `entries` may span any range; history outside the month only feeds the
    /// anomaly averages.
    pub fn from_entries(
        entries: &[ExpenseEntry],
        income: Option<IncomeMonth>,
        month: MonthKey,
        categories: &[Category],
        thresholds: &AnomalyThresholds,
    ) -> Self {
        let in_month: Vec<&ExpenseEntry> =
            entries.iter().filter(|e| e.month_key() == month).collect();

        let total_spend: Money = in_month.iter().map(|e| e.amount_cents).sum();
        let total_income = income.as_ref().map(IncomeMonth::total).unwrap_or_default();

        let mut by_category: Vec<CategorySpend> = Category::ALL
            .iter()
            .filter_map(|&category| {
                let matching: Vec<_> = in_month.iter().filter(|e| e.category == category).collect();
                if matching.is_empty() {
                    return None;
                }
                let total: Money = matching.iter().map(|e| e.amount_cents).sum();
                Some(CategorySpend {
                    category,
                    total,
                    count: matching.len(),
                    percent: percent_of(total, total_spend),
                })
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total));

        let by_payment = PaymentSource::ALL
            .iter()
            .map(|&payment_source| {
                let matching: Vec<_> = in_month
                    .iter()
                    .filter(|e| e.payment_source == payment_source)
                    .collect();
                PaymentSpend {
                    payment_source,
                    total: matching.iter().map(|e| e.amount_cents).sum(),
                    count: matching.len(),
                }
            })
            .collect();

        Self {
            month,
            total_spend,
            total_income,
            net: total_income - total_spend,
            income,
            by_category,
            by_payment,
            anomalies: calc_category_anomalies(entries, month, categories, thresholds),
            entry_count: in_month.len(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Month Report: {}\n", self.month));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Total spend:  {:>14}\n",
            self.total_spend.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Total income: {:>14}\n",
            self.total_income.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Net:          {:>14}\n",
            self.net.format_with_symbol(currency)
        ));
        output.push_str(&format!("Entries:      {:>14}\n\n", self.entry_count));

        if !self.by_category.is_empty() {
            output.push_str(&format!("{:<24} {:>14} {:>6} {:>5}\n", "Category", "Amount", "Count", "%"));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in &self.by_category {
                output.push_str(&format!(
                    "{:<24} {:>14} {:>6} {:>4}%\n",
                    row.category.label(),
                    row.total.format_with_symbol(currency),
                    row.count,
                    row.percent
                ));
            }
            output.push('\n');
        }

        for row in &self.by_payment {
            output.push_str(&format!(
                "{:<24} {:>14} {:>6}\n",
                row.payment_source.display_name(),
                row.total.format_with_symbol(currency),
                row.count
            ));
        }

        if !self.anomalies.is_empty() {
            output.push_str("\nSpending spikes\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for a in &self.anomalies {
                output.push_str(&format!(
                    "{:<24} {} vs avg {} (+{})\n",
                    a.category.label(),
                    a.current_cents.format_with_symbol(currency),
                    a.avg_cents.format_with_symbol(currency),
                    a.increase_cents.format_with_symbol(currency)
                ));
            }
        }

        output
    }
}
