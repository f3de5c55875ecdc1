//! Income month repository
//!
//! Handles persistence of per-month income records to incomes.json. Records
//! are keyed by month, so a second write for the same month replaces the first.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TrackerError;
use crate::models::{IncomeMonth, MonthKey};

use super::file_io::{read_json, write_json_atomic};
use super::IncomeStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct IncomeData {
    #[serde(default)]
    incomes: Vec<IncomeMonth>,
}

/// Repository for income months
pub struct IncomeRepository {
    path: PathBuf,
    incomes: RwLock<BTreeMap<MonthKey, IncomeMonth>>,
}

impl IncomeRepository {
    /// Create a new repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            incomes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load income months from disk
    pub fn load(&self) -> Result<(), TrackerError> {
        let file_data: IncomeData = read_json(&self.path)?;

        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        incomes.clear();
        for income in file_data.incomes {
            incomes.insert(income.month_key, income);
        }

        debug!(count = incomes.len(), "loaded income months");
        Ok(())
    }

    /// Save income months to disk in month order
    pub fn save(&self) -> Result<(), TrackerError> {
        let incomes = self
            .incomes
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = IncomeData {
            incomes: incomes.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }
}

impl IncomeStore for IncomeRepository {
    fn get(&self, month: MonthKey) -> Result<Option<IncomeMonth>, TrackerError> {
        let incomes = self
            .incomes
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(incomes.get(&month).cloned())
    }

    fn put(&self, income: IncomeMonth) -> Result<(), TrackerError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        incomes.insert(income.month_key, income);
        Ok(())
    }

    fn delete(&self, month: MonthKey) -> Result<Option<IncomeMonth>, TrackerError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(incomes.remove(&month))
    }

    fn bulk_put(&self, items: Vec<IncomeMonth>) -> Result<usize, TrackerError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let count = items.len();
        for income in items {
            incomes.insert(income.month_key, income);
        }
        Ok(count)
    }

    fn all(&self) -> Result<Vec<IncomeMonth>, TrackerError> {
        let incomes = self
            .incomes
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(incomes.values().cloned().collect())
    }

    fn clear(&self) -> Result<(), TrackerError> {
        let mut incomes = self
            .incomes
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        incomes.clear();
        Ok(())
    }

    fn flush(&self) -> Result<(), TrackerError> {
        self.save()
    }
}
