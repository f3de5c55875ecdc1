//! Core data models for the expense tracker
//!
//! This module contains the data structures that represent the domain:
//! expense entries, monthly income, money amounts, month keys, and the
//! closed category and payment-source enumerations.

pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod month;

pub use category::{Category, PaymentSource, UnknownValue};
pub use expense::ExpenseEntry;
pub use ids::ExpenseId;
pub use income::{IncomeMonth, IncomeValidationError};
pub use money::{parse_money_to_cents, Money, MoneyParseError};
pub use month::{
    month_range_back, next_month_key, parse_date_local, to_month_key, today_local, MonthKey,
    MonthParseError,
};
