//! CLI commands for CSV and JSON import
//!
//! A CSV whose header row carries the canonical field names imports as is.
//! Otherwise the column mapping comes from the flags, falling back to the
//! mapping saved by the last mapped import; flags given are saved for next
//! time.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tracing::debug;

use crate::config::paths::TrackerPaths;
use crate::config::settings::Settings;
use crate::error::TrackerResult;
use crate::services::{is_canonical_header, parse_csv_rows, CsvMapping, ImportService};
use crate::storage::Storage;

use super::read_input_file;

/// Header names to read each expense field from
#[derive(Args, Debug, Default)]
pub struct MappingArgs {
    /// Header of the date column
    #[arg(long)]
    pub date_col: Option<String>,

    /// Header of the category column
    #[arg(long)]
    pub category_col: Option<String>,

    /// Header of the amount column
    #[arg(long)]
    pub amount_col: Option<String>,

    /// Header of the payment source column
    #[arg(long)]
    pub payment_col: Option<String>,

    /// Header of the detail column
    #[arg(long)]
    pub detail_col: Option<String>,
}

impl MappingArgs {
    fn is_empty(&self) -> bool {
        self.date_col.is_none()
            && self.category_col.is_none()
            && self.amount_col.is_none()
            && self.payment_col.is_none()
            && self.detail_col.is_none()
    }

    /// Overlay the given flags on a base mapping
    fn apply(self, mut mapping: CsvMapping) -> CsvMapping {
        if let Some(v) = self.date_col {
            mapping.date_local = v;
        }
        if let Some(v) = self.category_col {
            mapping.category = v;
        }
        if let Some(v) = self.amount_col {
            mapping.amount = v;
        }
        if let Some(v) = self.payment_col {
            mapping.payment_source = v;
        }
        if let Some(v) = self.detail_col {
            mapping.extra_detail = v;
        }
        mapping
    }
}

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Import expenses from a CSV file
    Csv {
        file: PathBuf,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Restore a JSON backup (upserts by id and month)
    Json { file: PathBuf },
}

/// Handle import commands
pub fn handle_import_command(
    storage: &Storage,
    settings: &mut Settings,
    paths: &TrackerPaths,
    cmd: ImportCommands,
) -> TrackerResult<()> {
    let service = ImportService::new(storage);

    match cmd {
        ImportCommands::Csv { file, mapping } => {
            let text = read_input_file(&file)?;
            let source = file.display().to_string();

            let canonical = is_canonical_header(&parse_csv_rows(&text)?.headers);
            let chosen = if canonical && mapping.is_empty() {
                None
            } else if mapping.is_empty() {
                Some(settings.csv_mapping.clone())
            } else {
                let chosen = mapping.apply(settings.csv_mapping.clone());
                settings.csv_mapping = chosen.clone();
                settings.save(paths)?;
                debug!(?chosen, "saved CSV column mapping");
                Some(chosen)
            };

            let report = service.import_csv(&source, &text, chosen.as_ref())?;
            println!("{}", report.summary());
            for reason in report.reasons.iter().skip(5) {
                println!("  {}", reason);
            }
        }

        ImportCommands::Json { file } => {
            let text = read_input_file(&file)?;
            let report = service.import_json(&file.display().to_string(), &text)?;
            println!("{}", report.summary());
        }
    }

    Ok(())
}
