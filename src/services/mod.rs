//! Service layer for the expense tracker
//!
//! Business logic on top of the storage layer: input validation, audit
//! logging, and the CSV/JSON import pipeline.

pub mod expense;
pub mod import;
pub mod income;

pub use expense::{AddExpenseInput, ExpenseFilter, ExpenseService, RECENT_LIMIT, TOP_CATEGORIES};
pub use import::{
    is_canonical_header, parse_csv_rows, CsvMapping, CsvRows, ImportReport, ImportService,
    JsonImportReport,
};
pub use income::{parse_income_amount, IncomeService};
