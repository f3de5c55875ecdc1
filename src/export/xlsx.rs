//! XLSX workbook export

use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{ExpenseEntry, IncomeMonth};

use super::grid::{build_expenses_sheet_data, build_income_sheet_data, Cell, SheetData};

pub const EXPENSES_SHEET: &str = "Expenses";
pub const INCOME_SHEET: &str = "Income";

fn build_worksheet(name: &str, data: &SheetData) -> TrackerResult<Worksheet> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;

    for (r, row) in data.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => worksheet.write_string(r as u32, c as u16, s)?,
                Cell::Number(n) => worksheet.write_number(r as u32, c as u16, *n)?,
            };
        }
    }

    for (c, width) in data.column_widths().into_iter().enumerate() {
        worksheet.set_column_width(c as u16, width as f64)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(worksheet)
}

/// Build an XLSX workbook and return its bytes
///
/// A sheet is added only for a non-empty collection; with nothing to write
/// the export fails.
pub fn build_export_workbook(
    expenses: &[ExpenseEntry],
    incomes: &[IncomeMonth],
) -> TrackerResult<Vec<u8>> {
    if expenses.is_empty() && incomes.is_empty() {
        return Err(TrackerError::Export("No data to export".into()));
    }

    let mut workbook = Workbook::new();

    if !expenses.is_empty() {
        let sheet = build_worksheet(EXPENSES_SHEET, &build_expenses_sheet_data(expenses))?;
        workbook.push_worksheet(sheet);
    }
    if !incomes.is_empty() {
        let sheet = build_worksheet(INCOME_SHEET, &build_income_sheet_data(incomes))?;
        workbook.push_worksheet(sheet);
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(bytes = bytes.len(), "built workbook");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, PaymentSource};
    use chrono::NaiveDate;

    #[test]
    fn test_empty_export_fails() {
        let err = build_export_workbook(&[], &[]).unwrap_err();
        assert_eq!(err.to_string(), "Export error: No data to export");
    }

    #[test]
    fn test_builds_zip_container() {
        let entry = ExpenseEntry::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Category::Lunch,
            Money::from_cents(1234),
            PaymentSource::CreditCard,
            Some("soup".into()),
        );
        let bytes = build_export_workbook(&[entry], &[]).unwrap();

        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }
}
