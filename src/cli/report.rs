//! Report CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, UnknownValue};
use crate::reports::{MonthReport, TrendReport};
use crate::storage::{ExpenseStore, Storage};

use super::parse_month_arg;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Month summary: totals, spend by category and payment source, spikes
    Month {
        /// Month (YYYY-MM, "current" or "last"); defaults to the current month
        month: Option<String>,
    },

    /// Monthly spend over time with a moving average
    Trend {
        /// Last month of the chart; defaults to the current month
        #[arg(short, long)]
        end: Option<String>,

        /// Number of months shown
        #[arg(short, long)]
        months: Option<usize>,

        /// Moving-average window in months
        #[arg(short, long)]
        window: Option<usize>,

        /// Also chart this category
        #[arg(short, long)]
        category: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TrackerResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Month { month } => {
            let month = parse_month_arg(month.as_deref())?;
            let report = MonthReport::generate(storage, month, Category::ALL, &settings.anomaly)?;
            print!("{}", report.format_terminal(currency));
        }

        ReportCommands::Trend {
            end,
            months,
            window,
            category,
        } => {
            let end = parse_month_arg(end.as_deref())?;
            let category = category
                .map(|c| {
                    c.parse::<Category>()
                        .map_err(|e: UnknownValue| TrackerError::Validation(e.to_string()))
                })
                .transpose()?;

            let entries = storage.expenses.all()?;
            let report = TrendReport::generate(
                &entries,
                end,
                months.unwrap_or(settings.trend_months),
                window.unwrap_or(settings.trend_window),
                category,
            );
            print!("{}", report.format_terminal(currency));
        }
    }

    Ok(())
}
