//! Full JSON backup export
//!
//! The document carries both collections with their canonical field names so
//! it can be fed back through the JSON import unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{ExpenseEntry, IncomeMonth};
use crate::storage::{ExpenseStore, IncomeStore, Storage};

/// Default filename of the JSON backup
pub const JSON_BACKUP_FILENAME: &str = "expenses-data.json";

/// Default filename of the combined CSV document
pub const CSV_BACKUP_FILENAME: &str = "expenses-data.csv";

/// Complete backup of the record store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullExport {
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub incomes: Vec<IncomeMonth>,
}

impl FullExport {
    /// Snapshot both collections from storage
    pub fn from_storage(storage: &Storage) -> TrackerResult<Self> {
        Ok(Self {
            expenses: storage.expenses.all()?,
            incomes: storage.incomes.all()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.incomes.is_empty()
    }
}

/// Serialize the whole store as pretty-printed JSON
pub fn export_json_string(storage: &Storage) -> TrackerResult<String> {
    let export = FullExport::from_storage(storage)?;
    serde_json::to_string_pretty(&export).map_err(|e| TrackerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerPaths;
    use crate::models::{Category, Money, MonthKey, PaymentSource};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_empty_store_exports_empty_arrays() {
        let (_temp_dir, storage) = create_test_storage();
        let json = export_json_string(&storage).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["expenses"], serde_json::json!([]));
        assert_eq!(value["incomes"], serde_json::json!([]));
    }

    #[test]
    fn test_uses_canonical_field_names() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .expenses
            .put(ExpenseEntry::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                Category::Gas,
                Money::from_cents(4500),
                PaymentSource::JointAccount,
                None,
            ))
            .unwrap();
        let month: MonthKey = "2025-01".parse().unwrap();
        storage
            .incomes
            .put(IncomeMonth::new(month, Money::from_cents(100), Money::from_cents(200)))
            .unwrap();

        let json = export_json_string(&storage).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let expense = &value["expenses"][0];
        assert_eq!(expense["dateLocal"], "2025-01-15");
        assert_eq!(expense["amountCents"], 4500);
        assert_eq!(expense["paymentSource"], "joint_account");
        assert_eq!(value["incomes"][0]["monthKey"], "2025-01");

        let parsed: FullExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.expenses.len(), 1);
        assert!(!parsed.is_empty());
    }
}
