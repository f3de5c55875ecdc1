//! CSV export
//!
//! The expense and income CSV layouts are the interchange format with
//! spreadsheet tools: fixed headers, fixed column order, amounts as
//! two-decimal fixed point, rows joined by `\n` without a trailing newline.

use crate::models::{ExpenseEntry, IncomeMonth, Money};

/// Header row of the expenses CSV
pub const EXPENSES_HEADER: [&str; 5] = [
    "dateLocal",
    "category",
    "amountEur",
    "paymentSource",
    "extraDetail",
];

/// Header row of the income CSV
pub const INCOME_HEADER: [&str; 4] = [
    "monthKey",
    "incomeMaxEur",
    "incomeLiisuEur",
    "incomeTotalEur",
];

/// Quote a field if it contains a comma, a double quote or a line break
///
/// Internal double quotes are doubled. Other fields pass through unchanged.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Cents as fixed-point euros with exactly two decimals ("12.34")
pub fn format_eur_from_cents(amount: Money) -> String {
    amount.to_decimal_string()
}

/// Build the expenses CSV in the given entry order
pub fn build_expenses_csv(entries: &[ExpenseEntry]) -> String {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(EXPENSES_HEADER.join(","));

    for entry in entries {
        rows.push(
            [
                entry.date_local.to_string(),
                csv_escape(entry.category.label()),
                format_eur_from_cents(entry.amount_cents),
                entry.payment_source.as_str().to_string(),
                csv_escape(entry.detail()),
            ]
            .join(","),
        );
    }

    rows.join("\n")
}

/// Build the income CSV in the given month order
pub fn build_income_csv(incomes: &[IncomeMonth]) -> String {
    let mut rows = Vec::with_capacity(incomes.len() + 1);
    rows.push(INCOME_HEADER.join(","));

    for income in incomes {
        rows.push(
            [
                income.month_key.to_string(),
                format_eur_from_cents(income.income_max_cents),
                format_eur_from_cents(income.income_liisu_cents),
                format_eur_from_cents(income.total()),
            ]
            .join(","),
        );
    }

    rows.join("\n")
}

/// Expenses CSV, a blank line, then the income CSV
pub fn build_combined_csv(entries: &[ExpenseEntry], incomes: &[IncomeMonth]) -> String {
    format!(
        "{}\n\n{}",
        build_expenses_csv(entries),
        build_income_csv(incomes)
    )
}
