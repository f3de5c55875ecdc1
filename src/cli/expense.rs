//! Expense CLI commands
//!
//! Adding, duplicating, deleting and listing expenses.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date_local, today_local, Category, PaymentSource, UnknownValue};
use crate::display::{format_expense_details, format_expense_table, format_top_categories};
use crate::services::{
    AddExpenseInput, ExpenseFilter, ExpenseService, RECENT_LIMIT, TOP_CATEGORIES,
};
use crate::storage::Storage;

use super::parse_month_arg;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g. "12.50" or "12,50")
        amount: String,

        /// Category label (e.g. "Food shopping")
        #[arg(short, long)]
        category: String,

        /// Payment source: credit_card or joint_account
        #[arg(short, long, default_value = "credit_card")]
        payment: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short = 'n', long)]
        detail: Option<String>,
    },

    /// Copy an existing expense onto another date
    Duplicate {
        /// Expense ID or unique prefix
        id: String,

        /// Date for the copy (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID or unique prefix
        id: String,
    },

    /// Show a single expense
    Show {
        /// Expense ID or unique prefix
        id: String,
    },

    /// List expenses
    List {
        /// Month (YYYY-MM, "current" or "last"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// List every month
        #[arg(long, conflicts_with = "month")]
        all: bool,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only this payment source
        #[arg(short, long)]
        payment: Option<String>,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the most recently entered expenses
    Recent {
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// Show the most used categories
    Top {
        #[arg(short = 'n', long, default_value_t = TOP_CATEGORIES)]
        count: usize,
    },

    /// List every category label
    Categories,
}

fn parse_date_arg(date: Option<&str>) -> TrackerResult<chrono::NaiveDate> {
    match date {
        None => Ok(today_local()),
        Some(raw) => parse_date_local(raw.trim()).ok_or_else(|| {
            TrackerError::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD)", raw))
        }),
    }
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            payment,
            date,
            detail,
        } => {
            let date = match date {
                Some(d) => d,
                None => today_local().to_string(),
            };
            let entry = service.add(AddExpenseInput {
                date,
                category,
                amount,
                payment_source: payment,
                extra_detail: detail,
            })?;

            println!(
                "Added {} {} on {} ({})",
                entry.category,
                entry.amount_cents.format_with_symbol(currency),
                entry.date_local,
                entry.id.short()
            );
        }

        ExpenseCommands::Duplicate { id, date } => {
            let date = parse_date_arg(date.as_deref())?;
            let entry = service.duplicate(&id, date)?;

            println!(
                "Duplicated as {} on {} ({})",
                entry.category,
                entry.date_local,
                entry.id.short()
            );
        }

        ExpenseCommands::Delete { id } => {
            let removed = service.delete(&id)?;
            println!(
                "Deleted {} {} from {}",
                removed.category,
                removed.amount_cents.format_with_symbol(currency),
                removed.date_local
            );
        }

        ExpenseCommands::Show { id } => {
            let entry = service.find(&id)?;
            print!("{}", format_expense_details(&entry, currency));
        }

        ExpenseCommands::List {
            month,
            all,
            category,
            payment,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            if !all {
                filter = filter.month(parse_month_arg(month.as_deref())?);
            }
            if let Some(category) = category {
                let category: Category = category
                    .parse()
                    .map_err(|e: UnknownValue| TrackerError::Validation(e.to_string()))?;
                filter = filter.category(category);
            }
            if let Some(payment) = payment {
                let source: PaymentSource = payment
                    .parse()
                    .map_err(|e: UnknownValue| TrackerError::Validation(e.to_string()))?;
                filter = filter.payment_source(source);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let entries = service.list(&filter)?;
            print!("{}", format_expense_table(&entries, currency));
        }

        ExpenseCommands::Recent { limit } => {
            let entries = service.recent(limit)?;
            print!("{}", format_expense_table(&entries, currency));
        }

        ExpenseCommands::Top { count } => {
            let top = service.top_categories(count)?;
            print!("{}", format_top_categories(&top));
        }

        ExpenseCommands::Categories => {
            for category in Category::ALL {
                println!("{}", category.label());
            }
        }
    }

    Ok(())
}
