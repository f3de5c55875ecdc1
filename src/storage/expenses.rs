//! Expense repository for JSON storage
//!
//! Manages loading and saving expense entries to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TrackerError;
use crate::models::{ExpenseEntry, ExpenseId};

use super::file_io::{read_json, write_json_atomic};
use super::ExpenseStore;

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    #[serde(default)]
    expenses: Vec<ExpenseEntry>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, ExpenseEntry>>,
}

fn sorted(mut entries: Vec<ExpenseEntry>) -> Vec<ExpenseEntry> {
    entries.sort_by(|a, b| {
        a.date_local
            .cmp(&b.date_local)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    entries
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), TrackerError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for entry in file_data.expenses {
            data.insert(entry.id.clone(), entry);
        }

        debug!(count = data.len(), "loaded expenses");
        Ok(())
    }

    /// Save expenses to disk, oldest first
    pub fn save(&self) -> Result<(), TrackerError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = ExpenseData {
            expenses: sorted(data.values().cloned().collect()),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, TrackerError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

impl ExpenseStore for ExpenseRepository {
    fn get(&self, id: &ExpenseId) -> Result<Option<ExpenseEntry>, TrackerError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(id).cloned())
    }

    fn put(&self, entry: ExpenseEntry) -> Result<(), TrackerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn delete(&self, id: &ExpenseId) -> Result<Option<ExpenseEntry>, TrackerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(id))
    }

    fn bulk_put(&self, entries: Vec<ExpenseEntry>) -> Result<usize, TrackerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let count = entries.len();
        for entry in entries {
            data.insert(entry.id.clone(), entry);
        }
        Ok(count)
    }

    fn all(&self) -> Result<Vec<ExpenseEntry>, TrackerError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(data.values().cloned().collect()))
    }

    fn by_date_prefix(&self, prefix: &str) -> Result<Vec<ExpenseEntry>, TrackerError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(
            data.values()
                .filter(|e| e.date_local.to_string().starts_with(prefix))
                .cloned()
                .collect(),
        ))
    }

    fn clear(&self) -> Result<(), TrackerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        Ok(())
    }

    fn flush(&self) -> Result<(), TrackerError> {
        self.save()
    }
}
