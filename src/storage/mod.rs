//! Storage layer for the expense tracker
//!
//! Two keyed collections (expenses by id, income by month) held in memory and
//! persisted as JSON with atomic writes. Callers depend on the `ExpenseStore`
//! and `IncomeStore` traits rather than on the concrete repositories.

pub mod expenses;
pub mod file_io;
pub mod income;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use income::IncomeRepository;

use serde::Serialize;
use tracing::info;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{ExpenseEntry, ExpenseId, IncomeMonth, MonthKey};

/// Phrase the user must type to remove every record
pub const WIPE_CONFIRMATION: &str = "DELETE ALL";

/// Keyed collection of expense entries
///
/// `put` inserts or overwrites by id. Listing methods return entries ordered
/// by date, then creation time.
pub trait ExpenseStore {
    fn get(&self, id: &ExpenseId) -> TrackerResult<Option<ExpenseEntry>>;
    fn put(&self, entry: ExpenseEntry) -> TrackerResult<()>;
    /// Remove an entry, returning it if it existed
    fn delete(&self, id: &ExpenseId) -> TrackerResult<Option<ExpenseEntry>>;
    fn bulk_put(&self, entries: Vec<ExpenseEntry>) -> TrackerResult<usize>;
    fn all(&self) -> TrackerResult<Vec<ExpenseEntry>>;
    /// Entries whose `YYYY-MM-DD` date starts with `prefix`
    fn by_date_prefix(&self, prefix: &str) -> TrackerResult<Vec<ExpenseEntry>>;
    fn clear(&self) -> TrackerResult<()>;
    /// Persist pending changes
    fn flush(&self) -> TrackerResult<()>;

    fn by_month(&self, month: MonthKey) -> TrackerResult<Vec<ExpenseEntry>> {
        self.by_date_prefix(&month.to_string())
    }
}

/// Income records keyed by month, last write wins
pub trait IncomeStore {
    fn get(&self, month: MonthKey) -> TrackerResult<Option<IncomeMonth>>;
    fn put(&self, income: IncomeMonth) -> TrackerResult<()>;
    fn delete(&self, month: MonthKey) -> TrackerResult<Option<IncomeMonth>>;
    fn bulk_put(&self, items: Vec<IncomeMonth>) -> TrackerResult<usize>;
    /// All months, oldest first
    fn all(&self) -> TrackerResult<Vec<IncomeMonth>>;
    fn clear(&self) -> TrackerResult<()>;
    fn flush(&self) -> TrackerResult<()>;
}

/// Main storage coordinator that provides access to both repositories
pub struct Storage {
    paths: TrackerPaths,
    pub expenses: ExpenseRepository,
    pub incomes: IncomeRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a Storage instance, creating directories as needed
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            incomes: IncomeRepository::new(paths.incomes_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TrackerError> {
        self.expenses.load()?;
        self.incomes.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TrackerError> {
        self.expenses.save()?;
        self.incomes.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> TrackerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> TrackerResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> TrackerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_import(&self, source: &str, summary: &str) -> TrackerResult<()> {
        self.audit.log(&AuditEntry::import(source, summary))
    }

    /// Remove every expense and income month
    ///
    /// `confirmation` must equal [`WIPE_CONFIRMATION`] exactly. Returns the
    /// number of expenses and income months removed.
    pub fn wipe(&self, confirmation: &str) -> TrackerResult<(usize, usize)> {
        if confirmation != WIPE_CONFIRMATION {
            return Err(TrackerError::Validation(format!(
                "Type \"{}\" to confirm",
                WIPE_CONFIRMATION
            )));
        }

        let expenses = self.expenses.count()?;
        let incomes = IncomeStore::all(&self.incomes)?.len();

        ExpenseStore::clear(&self.expenses)?;
        IncomeStore::clear(&self.incomes)?;
        self.save_all()?;

        self.audit.log(&AuditEntry::wipe(expenses, incomes))?;
        info!(expenses, incomes, "all data deleted");
        Ok((expenses, incomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Category, Money, PaymentSource};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) {
        storage
            .expenses
            .put(ExpenseEntry::new(
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                Category::Mortgage,
                Money::from_cents(90000),
                PaymentSource::JointAccount,
                None,
            ))
            .unwrap();
        storage
            .incomes
            .put(IncomeMonth::new(
                "2025-01".parse().unwrap(),
                Money::from_cents(1),
                Money::zero(),
            ))
            .unwrap();
        storage.save_all().unwrap();
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_reload_after_save() {
        let (temp_dir, storage) = create_storage();
        seed(&storage);

        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();

        assert_eq!(reopened.expenses.count().unwrap(), 1);
        assert_eq!(IncomeStore::all(&reopened.incomes).unwrap().len(), 1);
    }

    #[test]
    fn test_wipe_requires_exact_phrase() {
        let (_temp_dir, storage) = create_storage();
        seed(&storage);

        let err = storage.wipe("delete all").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }

    #[test]
    fn test_wipe_clears_everything() {
        let (_temp_dir, storage) = create_storage();
        seed(&storage);

        assert_eq!(storage.wipe(WIPE_CONFIRMATION).unwrap(), (1, 1));
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert!(IncomeStore::all(&storage.incomes).unwrap().is_empty());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Wipe);
    }
}
