//! Income CLI commands
//!
//! Per-month income for the two household streams.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_income_table;
use crate::error::{TrackerError, TrackerResult};
use crate::services::{parse_income_amount, IncomeService};
use crate::storage::Storage;

use super::parse_month_arg;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Set the income figures for a month
    ///
    /// An omitted stream keeps the month's current figure, or last month's
    /// when the month has no record yet.
    Set {
        /// Month (YYYY-MM, "current" or "last"); defaults to the current month
        month: Option<String>,

        /// Max's income (e.g. "3500" or "3500,00")
        #[arg(long)]
        max: Option<String>,

        /// Liisu's income
        #[arg(long)]
        liisu: Option<String>,
    },

    /// Show the income for a month
    Show {
        month: Option<String>,
    },

    /// Delete the income record of a month
    Delete {
        month: String,
    },

    /// List every recorded month
    List,
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> TrackerResult<()> {
    let service = IncomeService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::Set { month, max, liisu } => {
            let month = parse_month_arg(month.as_deref())?;
            if max.is_none() && liisu.is_none() {
                return Err(TrackerError::Validation(
                    "Provide --max and/or --liisu".to_string(),
                ));
            }

            let (prefill_max, prefill_liisu) = service.prefill(month)?;
            let income_max = max.as_deref().map(parse_income_amount).unwrap_or(prefill_max);
            let income_liisu = liisu
                .as_deref()
                .map(parse_income_amount)
                .unwrap_or(prefill_liisu);

            let income = service.set_month(month, income_max, income_liisu)?;
            println!(
                "Income for {}: {} (Max {}, Liisu {})",
                income.month_key,
                income.total().format_with_symbol(currency),
                income.income_max_cents.format_with_symbol(currency),
                income.income_liisu_cents.format_with_symbol(currency)
            );
        }

        IncomeCommands::Show { month } => {
            let month = parse_month_arg(month.as_deref())?;
            match service.get_month(month)? {
                Some(income) => print!("{}", format_income_table(&[income], currency)),
                None => println!("No income recorded for {}.", month),
            }
        }

        IncomeCommands::Delete { month } => {
            let month = parse_month_arg(Some(&month))?;
            let removed = service.delete_month(month)?;
            println!("Deleted income for {}", removed.month_key);
        }

        IncomeCommands::List => {
            let incomes = service.list()?;
            print!("{}", format_income_table(&incomes, currency));
        }
    }

    Ok(())
}
