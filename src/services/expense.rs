//! Expense service
//!
//! Validation and bookkeeping for adding, duplicating, listing and deleting
//! expense entries. Every mutation is flushed to disk and audited.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    parse_date_local, Category, ExpenseEntry, ExpenseId, Money, MonthKey, PaymentSource,
    UnknownValue,
};
use crate::storage::{ExpenseStore, Storage};

/// Default number of entries returned by [`ExpenseService::recent`]
pub const RECENT_LIMIT: usize = 10;

/// Default number of categories returned by [`ExpenseService::top_categories`]
pub const TOP_CATEGORIES: usize = 6;

/// Raw user input for a new expense
#[derive(Debug, Clone, Default)]
pub struct AddExpenseInput {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Category label, e.g. "Food shopping"
    pub category: String,
    /// Decimal amount as typed, e.g. "12,34"
    pub amount: String,
    /// `credit_card` or `joint_account`
    pub payment_source: String,
    pub extra_detail: Option<String>,
}

/// Options for filtering expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub month: Option<MonthKey>,
    pub category: Option<Category>,
    pub payment_source: Option<PaymentSource>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn payment_source(mut self, source: PaymentSource) -> Self {
        self.payment_source = Some(source);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate raw input and store a new expense
    pub fn add(&self, input: AddExpenseInput) -> TrackerResult<ExpenseEntry> {
        let date = parse_date_local(input.date.trim()).ok_or_else(|| {
            TrackerError::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD)", input.date))
        })?;
        let category: Category = input
            .category
            .trim()
            .parse()
            .map_err(|e: UnknownValue| TrackerError::Validation(e.to_string()))?;
        let payment_source: PaymentSource = input
            .payment_source
            .trim()
            .parse()
            .map_err(|e: UnknownValue| TrackerError::Validation(e.to_string()))?;
        let amount =
            Money::parse(&input.amount).map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.create(ExpenseEntry::new(
            date,
            category,
            amount,
            payment_source,
            input.extra_detail,
        ))
    }

    /// Copy an existing entry onto another date as a new expense
    pub fn duplicate(&self, identifier: &str, date: NaiveDate) -> TrackerResult<ExpenseEntry> {
        let source = self.find(identifier)?;
        self.create(ExpenseEntry::new(
            date,
            source.category,
            source.amount_cents,
            source.payment_source,
            source.extra_detail,
        ))
    }

    fn create(&self, entry: ExpenseEntry) -> TrackerResult<ExpenseEntry> {
        entry.validate().map_err(TrackerError::Validation)?;

        self.storage.expenses.put(entry.clone())?;
        self.storage.expenses.flush()?;

        self.storage.log_create(
            EntityType::Expense,
            entry.id.to_string(),
            Some(format!("{} {}", entry.date_local, entry.category)),
            &entry,
        )?;

        info!(id = %entry.id, cents = entry.amount_cents.cents(), "expense added");
        Ok(entry)
    }

    pub fn get(&self, id: &ExpenseId) -> TrackerResult<Option<ExpenseEntry>> {
        self.storage.expenses.get(id)
    }

    /// Resolve a full id or an unambiguous id prefix
    pub fn find(&self, identifier: &str) -> TrackerResult<ExpenseEntry> {
        let identifier = identifier.trim();
        let id: ExpenseId = identifier
            .parse()
            .map_err(|_| TrackerError::expense_not_found(identifier))?;
        if let Some(entry) = self.storage.expenses.get(&id)? {
            return Ok(entry);
        }

        if identifier.is_empty() {
            return Err(TrackerError::expense_not_found(identifier));
        }

        let mut matches: Vec<ExpenseEntry> = self
            .storage
            .expenses
            .all()?
            .into_iter()
            .filter(|e| e.id.as_str().starts_with(identifier))
            .collect();

        match matches.len() {
            0 => Err(TrackerError::expense_not_found(identifier)),
            1 => Ok(matches.remove(0)),
            n => Err(TrackerError::Validation(format!(
                "Id prefix '{}' matches {} expenses",
                identifier, n
            ))),
        }
    }

    /// Delete an expense by id or id prefix
    pub fn delete(&self, identifier: &str) -> TrackerResult<ExpenseEntry> {
        let entry = self.find(identifier)?;

        self.storage.expenses.delete(&entry.id)?;
        self.storage.expenses.flush()?;

        self.storage.log_delete(
            EntityType::Expense,
            entry.id.to_string(),
            Some(format!("{} {}", entry.date_local, entry.category)),
            &entry,
        )?;

        info!(id = %entry.id, "expense deleted");
        Ok(entry)
    }

    pub fn list_month(&self, month: MonthKey) -> TrackerResult<Vec<ExpenseEntry>> {
        self.storage.expenses.by_month(month)
    }

    pub fn list_all(&self) -> TrackerResult<Vec<ExpenseEntry>> {
        self.storage.expenses.all()
    }

    /// List expenses matching a filter, ordered by date
    pub fn list(&self, filter: &ExpenseFilter) -> TrackerResult<Vec<ExpenseEntry>> {
        let mut entries = match filter.month {
            Some(month) => self.list_month(month)?,
            None => self.list_all()?,
        };

        if let Some(category) = filter.category {
            entries.retain(|e| e.category == category);
        }
        if let Some(source) = filter.payment_source {
            entries.retain(|e| e.payment_source == source);
        }
        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    /// The most recently created entries, newest first
    pub fn recent(&self, limit: usize) -> TrackerResult<Vec<ExpenseEntry>> {
        let mut entries = self.list_all()?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    /// The `n` most used categories
    ///
    /// Unused categories still qualify with a count of zero; ties keep the
    /// category display order.
    pub fn top_categories(&self, n: usize) -> TrackerResult<Vec<(Category, usize)>> {
        let entries = self.list_all()?;
        let mut usage: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|c| (*c, entries.iter().filter(|e| e.category == *c).count()))
            .collect();

        usage.sort_by(|a, b| b.1.cmp(&a.1));
        usage.truncate(n);
        Ok(usage)
    }

    /// Total spend over all entries
    pub fn total(&self, entries: &[ExpenseEntry]) -> Money {
        entries.iter().map(|e| e.amount_cents).sum()
    }
}
