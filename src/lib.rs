//! Expense Tracker - household expense and income bookkeeping
//!
//! This library provides the core functionality for the `expenses` binary:
//! recording dated, categorized expenses and per-month income, monthly
//! analytics (spend breakdowns, spending spikes, moving-average trends), and
//! CSV / JSON / XLSX interchange.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, income months, money, month keys)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer, including import
//! - `reports`: Month report, anomaly detector and trend aggregator
//! - `export`: CSV, spreadsheet and JSON builders plus share/download surfaces
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
//! use expense_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
