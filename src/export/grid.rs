//! Spreadsheet grid representation
//!
//! Same headers and column order as the CSV export, but amounts stay numeric
//! so a spreadsheet can compute with them.

use crate::models::{ExpenseEntry, IncomeMonth, Money};

use super::csv::{EXPENSES_HEADER, INCOME_HEADER};

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Text length of the cell as a spreadsheet would display it
    ///
    /// Numbers use their shortest round-trip form: `1000.0` counts as "1000".
    pub fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
        }
    }
}

/// Rows of one sheet, header first
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    fn with_header(header: &[&str]) -> Self {
        Self {
            rows: vec![header.iter().map(|h| Cell::text(*h)).collect()],
        }
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Display width per column: the longest cell, at least 8, plus 2, at most 50
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.column_count())
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .fold(MIN_COLUMN_WIDTH, usize::max);
                (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// Cents as a number rounded to two decimals (`1234` → `12.34`)
pub fn cents_to_eur_number(amount: Money) -> f64 {
    amount.to_number()
}

pub fn build_expenses_sheet_data(entries: &[ExpenseEntry]) -> SheetData {
    let mut sheet = SheetData::with_header(&EXPENSES_HEADER);
    sheet.rows.extend(entries.iter().map(|entry| {
        vec![
            Cell::text(entry.date_local.to_string()),
            Cell::text(entry.category.label()),
            Cell::Number(cents_to_eur_number(entry.amount_cents)),
            Cell::text(entry.payment_source.as_str()),
            Cell::text(entry.detail()),
        ]
    }));
    sheet
}

pub fn build_income_sheet_data(incomes: &[IncomeMonth]) -> SheetData {
    let mut sheet = SheetData::with_header(&INCOME_HEADER);
    sheet.rows.extend(incomes.iter().map(|income| {
        vec![
            Cell::text(income.month_key.to_string()),
            Cell::Number(cents_to_eur_number(income.income_max_cents)),
            Cell::Number(cents_to_eur_number(income.income_liisu_cents)),
            Cell::Number(cents_to_eur_number(income.total())),
        ]
    }));
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PaymentSource};
    use chrono::NaiveDate;

    #[test]
    fn test_cents_to_eur_number() {
        assert_eq!(cents_to_eur_number(Money::from_cents(1234)), 12.34);
        assert_eq!(cents_to_eur_number(Money::from_cents(199)), 1.99);
        assert_eq!(cents_to_eur_number(Money::from_cents(100000)), 1000.0);
    }

    #[test]
    fn test_expenses_sheet() {
        let entry = ExpenseEntry::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::FoodShopping,
            Money::from_cents(1234),
            PaymentSource::CreditCard,
            None,
        );
        let sheet = build_expenses_sheet_data(&[entry]);

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][2], Cell::Text("amountEur".into()));
        assert_eq!(sheet.rows[1][2], Cell::Number(12.34));
        assert_eq!(sheet.rows[1][4], Cell::Text(String::new()));
    }

    #[test]
    fn test_income_sheet() {
        let income = IncomeMonth::new(
            "2025-03".parse().unwrap(),
            Money::from_cents(100000),
            Money::from_cents(50),
        );
        let sheet = build_income_sheet_data(&[income]);
        assert_eq!(sheet.rows[1][3], Cell::Number(1000.5));
    }

    #[test]
    fn test_column_widths() {
        let entry = ExpenseEntry::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::InternetPhoneTv,
            Money::from_cents(100000),
            PaymentSource::JointAccount,
            Some("x".repeat(80)),
        );
        let sheet = build_expenses_sheet_data(&[entry]);

        // dateLocal (9) vs 2025-01-15 (10); "Internet, phone, TV" (19);
        // amountEur (9) vs 1000; joint_account (13); detail capped
        assert_eq!(sheet.column_widths(), vec![12, 21, 11, 15, 50]);
    }

    #[test]
    fn test_short_columns_get_minimum_width() {
        let sheet = SheetData {
            rows: vec![vec![Cell::text("a")], vec![Cell::Number(1.5)]],
        };
        assert_eq!(sheet.column_widths(), vec![10]);
    }
}
