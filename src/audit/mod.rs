//! Append-only audit trail for the expense tracker
//!
//! Every create, update and delete of an expense or income month, plus one
//! summary line per import run, is appended to `audit.log` as a JSON line.
//!
//! - `AuditEntry`: a single line of the log
//! - `AuditLogger`: appends and reads the JSONL file
//! - `generate_diff`: field-level summary used for income overwrites

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
