//! Expense entry model
//!
//! One dated, categorized outgoing payment. Field names serialize in
//! camelCase, which is the canonical JSON backup format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::{Category, PaymentSource};
use super::ids::ExpenseId;
use super::money::Money;
use super::month::MonthKey;

/// A single recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    /// Unique identifier, assigned at creation
    pub id: ExpenseId,

    /// User-local calendar day of the expense
    pub date_local: NaiveDate,

    pub category: Category,

    /// Amount in cents, always positive
    pub amount_cents: Money,

    pub payment_source: PaymentSource,

    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_detail: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ExpenseEntry {
    /// Create a new expense with a fresh ID and timestamps
    ///
    /// A detail that is empty after trimming is stored as absent.
    pub fn new(
        date_local: NaiveDate,
        category: Category,
        amount: Money,
        payment_source: PaymentSource,
        extra_detail: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            date_local,
            category,
            amount_cents: amount,
            payment_source,
            extra_detail: extra_detail
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Month this expense belongs to
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date_local)
    }

    /// Detail text, empty when absent
    pub fn detail(&self) -> &str {
        self.extra_detail.as_deref().unwrap_or("")
    }

    /// Check the positive-amount invariant
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount_cents.is_positive() {
            return Err("Amount must be greater than 0.".to_string());
        }
        Ok(())
    }
}
