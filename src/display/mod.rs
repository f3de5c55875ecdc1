//! Display formatting for terminal output
//!
//! Tables for expense and income listings, and the audit trail view.

pub mod audit;
pub mod expense;
pub mod income;

pub use audit::format_audit_log;
pub use expense::{format_expense_details, format_expense_table, format_top_categories};
pub use income::format_income_table;

/// Truncate a string to at most `max_len` characters, marking the cut
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
