//! CLI commands for data export
//!
//! Without `--output` a file lands in the export directory (or goes to the
//! configured share command, for the share and xlsx commands).

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::config::paths::TrackerPaths;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::export::{
    build_combined_csv, build_export_workbook, export_json_string, share_batch, share_or_download,
    CommandShareSurface, DirectorySurface, ExportFile, ExportScope, ShareError, ShareOutcome,
    ShareStatus, ShareSurface,
    CSV_BACKUP_FILENAME, JSON_BACKUP_FILENAME,
};
use crate::storage::{write_bytes_atomic, ExpenseStore, IncomeStore, Storage};

use super::parse_month_arg;

const XLSX_FILENAME: &str = "expenses-data.xlsx";

/// Which records a share covers
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// Expenses and income of one month
    Month,
    /// Every expense and income month
    All,
    /// Income months only
    Income,
    /// Expenses only
    Expenses,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Combined CSV: expenses, a blank line, then income
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Full JSON backup
    Json {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spreadsheet workbook with Expenses and Income sheets
    Xlsx {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Share CSV files through the share command, or save them
    Share {
        #[arg(short, long, value_enum, default_value = "month")]
        scope: ScopeArg,

        /// Month for the month scope; defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    paths: &TrackerPaths,
    cmd: ExportCommands,
) -> TrackerResult<()> {
    let export_dir = settings.resolve_export_dir(paths);

    match cmd {
        ExportCommands::Csv { output } => {
            let expenses = storage.expenses.all()?;
            let incomes = storage.incomes.all()?;
            let csv = build_combined_csv(&expenses, &incomes);
            let file = ExportFile::csv(CSV_BACKUP_FILENAME, csv);
            save(&file, output, &DirectorySurface::new(export_dir))
        }

        ExportCommands::Json { output } => {
            let file = ExportFile::json(JSON_BACKUP_FILENAME, export_json_string(storage)?);
            save(&file, output, &DirectorySurface::new(export_dir))
        }

        ExportCommands::Xlsx { output } => {
            let bytes = build_export_workbook(&storage.expenses.all()?, &storage.incomes.all()?)?;
            let file = ExportFile::xlsx(XLSX_FILENAME, bytes);
            let surface = CommandShareSurface::new(settings.share_command.clone(), export_dir);
            save(&file, output, &surface)
        }

        ExportCommands::Share { scope, month } => {
            let scope = match scope {
                ScopeArg::Month => ExportScope::Month(parse_month_arg(month.as_deref())?),
                ScopeArg::All => ExportScope::AllData,
                ScopeArg::Income => ExportScope::IncomeOnly,
                ScopeArg::Expenses => ExportScope::ExpensesOnly,
            };

            let files = scope.files(&storage.expenses.all()?, &storage.incomes.all()?);
            let surface = CommandShareSurface::new(settings.share_command.clone(), export_dir);
            let status = share_batch(&surface, scope.title(), &files);

            println!("{}", status);
            match status {
                ShareStatus::Failed(reason) => Err(TrackerError::Share(reason)),
                _ => Ok(()),
            }
        }
    }
}

/// Write to an explicit path, otherwise hand the file to the surface
fn save(
    file: &ExportFile,
    output: Option<PathBuf>,
    surface: &dyn ShareSurface,
) -> TrackerResult<()> {
    if let Some(path) = output {
        write_bytes_atomic(&path, &file.bytes)?;
        println!("Exported {} to: {}", file.name, path.display());
        return Ok(());
    }

    match share_or_download(surface, file) {
        Ok(ShareOutcome::Shared) => println!("{} shared", file.name),
        Ok(ShareOutcome::Downloaded(path)) => {
            println!("Exported {} to: {}", file.name, path.display())
        }
        Err(ShareError::Cancelled) => println!("Share cancelled"),
        Err(ShareError::Failed(reason)) => return Err(TrackerError::Share(reason)),
    }
    Ok(())
}
