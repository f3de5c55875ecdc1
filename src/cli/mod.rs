//! CLI command handlers
//!
//! This module bridges the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod import;
pub mod income;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};

use crate::error::{TrackerError, TrackerResult};
use crate::models::MonthKey;

/// Parse an optional `YYYY-MM` argument, defaulting to the current month
pub(crate) fn parse_month_arg(month: Option<&str>) -> TrackerResult<MonthKey> {
    match month.map(str::trim) {
        None | Some("") | Some("current") => Ok(MonthKey::current()),
        Some("last") => Ok(MonthKey::current().prev()),
        Some(raw) => raw
            .parse()
            .map_err(|e: crate::models::MonthParseError| TrackerError::Validation(e.to_string())),
    }
}

/// Read a whole input file as UTF-8 text
pub(crate) fn read_input_file(path: &std::path::Path) -> TrackerResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| TrackerError::Import(format!("Failed to read {}: {}", path.display(), e)))
}
