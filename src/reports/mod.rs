//! Reports module for the expense tracker
//!
//! Derived analytics over snapshots of the stored records: the month view,
//! the multi-month trend and spend-spike detection.

pub mod anomalies;
pub mod month;
pub mod trend;

pub use anomalies::{aggregate_by_month_category, calc_category_anomalies, Anomaly, AnomalyThresholds};
pub use month::{percent_of, CategorySpend, MonthReport, PaymentSpend};
pub use trend::{moving_average, TrendPoint, TrendReport};
