//! Income service
//!
//! Per-month income figures for the two household earners. Each month has at
//! most one record; setting a month again replaces it.

use tracing::info;

use crate::audit::{generate_diff, EntityType};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{IncomeMonth, Money, MonthKey};
use crate::storage::{IncomeStore, Storage};

/// Parse a typed income amount
///
/// Never fails: a comma is accepted as the decimal separator, anything
/// unparsable counts as zero and negative values are clamped to zero.
pub fn parse_income_amount(raw: &str) -> Money {
    match Money::parse_lenient(raw) {
        Some(m) if m.is_positive() => m,
        _ => Money::zero(),
    }
}

/// Service for income month management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Store the income figures for a month, replacing any previous record
    pub fn set_month(
        &self,
        month: MonthKey,
        income_max: Money,
        income_liisu: Money,
    ) -> TrackerResult<IncomeMonth> {
        let income = IncomeMonth::new(month, income_max, income_liisu);
        income
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        let before = self.storage.incomes.get(month)?;

        self.storage.incomes.put(income.clone())?;
        self.storage.incomes.flush()?;

        let name = Some(format!("Income for {}", month));
        match before {
            Some(before) => {
                let diff = generate_diff(
                    &serde_json::to_value(&before)?,
                    &serde_json::to_value(&income)?,
                );
                self.storage.log_update(
                    EntityType::IncomeMonth,
                    month.to_string(),
                    name,
                    &before,
                    &income,
                    diff,
                )?;
            }
            None => {
                self.storage
                    .log_create(EntityType::IncomeMonth, month.to_string(), name, &income)?;
            }
        }

        info!(month = %month, total = income.total().cents(), "income saved");
        Ok(income)
    }

    pub fn get_month(&self, month: MonthKey) -> TrackerResult<Option<IncomeMonth>> {
        self.storage.incomes.get(month)
    }

    /// Default figures for editing a month
    ///
    /// The month's own record if present, else the previous month's figures,
    /// else zero for both streams.
    pub fn prefill(&self, month: MonthKey) -> TrackerResult<(Money, Money)> {
        let source = match self.storage.incomes.get(month)? {
            Some(own) => Some(own),
            None => self.storage.incomes.get(month.prev())?,
        };

        Ok(source
            .map(|i| (i.income_max_cents, i.income_liisu_cents))
            .unwrap_or((Money::zero(), Money::zero())))
    }

    /// Delete a month's income record
    pub fn delete_month(&self, month: MonthKey) -> TrackerResult<IncomeMonth> {
        let removed = self
            .storage
            .incomes
            .delete(month)?
            .ok_or_else(|| TrackerError::income_not_found(month.to_string()))?;
        self.storage.incomes.flush()?;

        self.storage.log_delete(
            EntityType::IncomeMonth,
            month.to_string(),
            Some(format!("Income for {}", month)),
            &removed,
        )?;

        Ok(removed)
    }

    /// All income months, oldest first
    pub fn list(&self) -> TrackerResult<Vec<IncomeMonth>> {
        self.storage.incomes.all()
    }
}
