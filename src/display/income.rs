//! Income display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::IncomeMonth;

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Liisu")]
    liisu: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format income months as a table
pub fn format_income_table(incomes: &[IncomeMonth], currency: &str) -> String {
    if incomes.is_empty() {
        return "No income recorded.\n".to_string();
    }

    let rows = incomes.iter().map(|i| IncomeRow {
        month: i.month_key.to_string(),
        max: i.income_max_cents.format_with_symbol(currency),
        liisu: i.income_liisu_cents.format_with_symbol(currency),
        total: i.total().format_with_symbol(currency),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!("{}\n", table)
}
