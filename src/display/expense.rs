//! Expense display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{Category, ExpenseEntry, Money};

use super::truncate;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid with")]
    payment: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Format expenses as a table with a total line
pub fn format_expense_table(entries: &[ExpenseEntry], currency: &str) -> String {
    if entries.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = entries.iter().map(|e| ExpenseRow {
        id: e.id.short().to_string(),
        date: e.date_local.to_string(),
        category: e.category.label().to_string(),
        amount: e.amount_cents.format_with_symbol(currency),
        payment: e.payment_source.display_name().to_string(),
        detail: truncate(e.detail(), 30),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));

    let total: Money = entries.iter().map(|e| e.amount_cents).sum();
    format!(
        "{}\n\n{} expense(s), total {}\n",
        table,
        entries.len(),
        total.format_with_symbol(currency)
    )
}

/// Format a single expense
pub fn format_expense_details(entry: &ExpenseEntry, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:   {}\n", entry.id));
    output.push_str(&format!("Date:      {}\n", entry.date_local));
    output.push_str(&format!("Category:  {}\n", entry.category));
    output.push_str(&format!(
        "Amount:    {}\n",
        entry.amount_cents.format_with_symbol(currency)
    ));
    output.push_str(&format!("Paid with: {}\n", entry.payment_source.display_name()));
    if let Some(detail) = &entry.extra_detail {
        output.push_str(&format!("Detail:    {}\n", detail));
    }

    output
}

/// Format the most used categories as a ranked list
pub fn format_top_categories(top: &[(Category, usize)]) -> String {
    let mut output = String::new();
    for (rank, (category, count)) in top.iter().enumerate() {
        output.push_str(&format!("{:>2}. {:<22} {:>4}\n", rank + 1, category.label(), count));
    }
    output
}
