//! Share-or-download side effects for exported files
//!
//! Building export bytes is pure; handing them to the user is not. The
//! `ShareSurface` trait is the seam: a surface may offer a native share action,
//! and always offers a plain download. Cancelling a share is an outcome, not a
//! failure.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{ExpenseEntry, IncomeMonth, MonthKey};
use crate::storage::write_bytes_atomic;

use super::csv::{build_expenses_csv, build_income_csv};

pub const MIME_CSV: &str = "text/csv;charset=utf-8";
pub const MIME_JSON: &str = "application/json";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Exit status conventionally reported by a process interrupted with Ctrl-C
const EXIT_CANCELLED: i32 = 130;

/// A named, typed blob ready to be shared or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(name: impl Into<String>, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    pub fn csv(name: impl Into<String>, text: String) -> Self {
        Self::new(name, MIME_CSV, text.into_bytes())
    }

    pub fn json(name: impl Into<String>, text: String) -> Self {
        Self::new(name, MIME_JSON, text.into_bytes())
    }

    pub fn xlsx(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, MIME_XLSX, bytes)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShareError {
    /// The user dismissed the share action
    #[error("share cancelled")]
    Cancelled,

    #[error("share failed: {0}")]
    Failed(String),
}

/// What happened to a file handed to `share_or_download`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Downloaded(PathBuf),
}

/// Host capability for getting a file to the user
pub trait ShareSurface {
    /// Whether a native share action can take this file
    fn can_share_file(&self, file: &ExportFile) -> bool;

    fn share(&self, file: &ExportFile) -> Result<(), ShareError>;

    /// Save the file locally, returning where it landed
    fn download(&self, file: &ExportFile) -> Result<PathBuf, ShareError>;
}

/// Share the file when the surface supports it, otherwise download it
pub fn share_or_download(
    surface: &dyn ShareSurface,
    file: &ExportFile,
) -> Result<ShareOutcome, ShareError> {
    if surface.can_share_file(file) {
        surface.share(file)?;
        info!(file = %file.name, "shared export");
        Ok(ShareOutcome::Shared)
    } else {
        let path = surface.download(file)?;
        info!(file = %file.name, path = %path.display(), "downloaded export");
        Ok(ShareOutcome::Downloaded(path))
    }
}

/// Which records a CSV share covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Month(MonthKey),
    AllData,
    IncomeOnly,
    ExpensesOnly,
}

impl ExportScope {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Month(_) => "Monthly CSV",
            Self::AllData => "All-data CSV",
            Self::IncomeOnly => "Income CSV",
            Self::ExpensesOnly => "Expenses CSV",
        }
    }

    /// Build the CSV files for this scope; empty collections produce no file
    pub fn files(&self, expenses: &[ExpenseEntry], incomes: &[IncomeMonth]) -> Vec<ExportFile> {
        let (expenses, incomes, suffix): (Vec<ExpenseEntry>, Vec<IncomeMonth>, String) = match self {
            Self::Month(month) => (
                expenses.iter().filter(|e| e.month_key() == *month).cloned().collect(),
                incomes.iter().filter(|i| i.month_key == *month).cloned().collect(),
                month.to_string(),
            ),
            Self::AllData => (expenses.to_vec(), incomes.to_vec(), "all".into()),
            Self::IncomeOnly => (Vec::new(), incomes.to_vec(), "all".into()),
            Self::ExpensesOnly => (expenses.to_vec(), Vec::new(), "all".into()),
        };

        let mut files = Vec::new();
        if !expenses.is_empty() {
            files.push(ExportFile::csv(
                format!("expenses-{}.csv", suffix),
                build_expenses_csv(&expenses),
            ));
        }
        if !incomes.is_empty() {
            files.push(ExportFile::csv(
                format!("income-{}.csv", suffix),
                build_income_csv(&incomes),
            ));
        }
        files
    }
}

/// User-facing result of sharing a batch of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    NoData,
    Downloaded(Vec<PathBuf>),
    Shared(String),
    Cancelled,
    Failed(String),
}

impl ShareStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str("No data to export"),
            Self::Downloaded(_) => f.write_str("CSV downloaded"),
            Self::Shared(title) => write!(f, "{} shared", title),
            Self::Cancelled => f.write_str("Share cancelled"),
            Self::Failed(_) => f.write_str("Share failed"),
        }
    }
}

/// Hand every file to the surface, stopping at the first cancel or failure
///
/// Any file that fell back to a download makes the whole batch report as
/// downloaded.
pub fn share_batch(surface: &dyn ShareSurface, title: &str, files: &[ExportFile]) -> ShareStatus {
    if files.is_empty() {
        return ShareStatus::NoData;
    }

    let mut downloaded = Vec::new();
    for file in files {
        match share_or_download(surface, file) {
            Ok(ShareOutcome::Shared) => {}
            Ok(ShareOutcome::Downloaded(path)) => downloaded.push(path),
            Err(ShareError::Cancelled) => {
                info!(file = %file.name, "share cancelled by user");
                return ShareStatus::Cancelled;
            }
            Err(ShareError::Failed(reason)) => {
                warn!(file = %file.name, %reason, "share failed");
                return ShareStatus::Failed(reason);
            }
        }
    }

    if downloaded.is_empty() {
        ShareStatus::Shared(title.to_string())
    } else {
        ShareStatus::Downloaded(downloaded)
    }
}

/// Saves files into a directory; never offers a share action
#[derive(Debug, Clone)]
pub struct DirectorySurface {
    dir: PathBuf,
}

impl DirectorySurface {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl ShareSurface for DirectorySurface {
    fn can_share_file(&self, _file: &ExportFile) -> bool {
        false
    }

    fn share(&self, _file: &ExportFile) -> Result<(), ShareError> {
        Err(ShareError::Failed("sharing is not supported here".into()))
    }

    fn download(&self, file: &ExportFile) -> Result<PathBuf, ShareError> {
        let path = self.dir.join(&file.name);
        write_bytes_atomic(&path, &file.bytes).map_err(|e| ShareError::Failed(e.to_string()))?;
        Ok(path)
    }
}

/// Shares by running an external command with the saved file path appended
///
/// Without a configured command this behaves like its `DirectorySurface`.
#[derive(Debug, Clone)]
pub struct CommandShareSurface {
    command: Option<String>,
    directory: DirectorySurface,
}

impl CommandShareSurface {
    pub fn new(command: Option<String>, export_dir: PathBuf) -> Self {
        let command = command.filter(|c| !c.trim().is_empty());
        Self {
            command,
            directory: DirectorySurface::new(export_dir),
        }
    }
}

impl ShareSurface for CommandShareSurface {
    fn can_share_file(&self, _file: &ExportFile) -> bool {
        self.command.is_some()
    }

    fn share(&self, file: &ExportFile) -> Result<(), ShareError> {
        let command = self
            .command
            .as_deref()
            .ok_or_else(|| ShareError::Failed("no share command configured".into()))?;

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ShareError::Failed("no share command configured".into()))?;

        // The command needs a real path to hand on
        let path = self.directory.download(file)?;
        debug!(program, path = %path.display(), "running share command");

        let status = Command::new(program)
            .args(parts)
            .arg(&path)
            .status()
            .map_err(|e| ShareError::Failed(format!("could not run '{}': {}", program, e)))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(EXIT_CANCELLED) => Err(ShareError::Cancelled),
            Some(code) => Err(ShareError::Failed(format!("'{}' exited with {}", program, code))),
            None => Err(ShareError::Failed(format!("'{}' was terminated", program))),
        }
    }

    fn download(&self, file: &ExportFile) -> Result<PathBuf, ShareError> {
        self.directory.download(file)
    }
}
