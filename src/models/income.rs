//! Monthly income model
//!
//! One record per calendar month holding the two household income streams.
//! The month key is the primary key; writes are last-write-wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::month::MonthKey;

/// Validation errors for income months
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NegativeAmount,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Income cannot be negative"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// Income figures for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeMonth {
    pub month_key: MonthKey,
    pub income_max_cents: Money,
    pub income_liisu_cents: Money,
    pub updated_at: DateTime<Utc>,
}

impl IncomeMonth {
    /// Create an income record stamped with the current time
    pub fn new(month_key: MonthKey, income_max: Money, income_liisu: Money) -> Self {
        Self {
            month_key,
            income_max_cents: income_max,
            income_liisu_cents: income_liisu,
            updated_at: Utc::now(),
        }
    }

    /// Combined household income for the month
    pub fn total(&self) -> Money {
        self.income_max_cents + self.income_liisu_cents
    }

    /// Validate the income record
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.income_max_cents.is_negative() || self.income_liisu_cents.is_negative() {
            return Err(IncomeValidationError::NegativeAmount);
        }
        Ok(())
    }
}
