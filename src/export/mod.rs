//! Export module for the expense tracker
//!
//! Pure builders turn the two collections into bytes:
//! - CSV: delimited text matching the import format
//! - Grid/XLSX: spreadsheet workbook with numeric amount cells
//! - JSON: full backup of the record store
//!
//! Delivering those bytes goes through the `ShareSurface` seam in `share`.

pub mod csv;
pub mod grid;
pub mod json;
pub mod share;
pub mod xlsx;

pub use csv::{
    build_combined_csv, build_expenses_csv, build_income_csv, csv_escape, format_eur_from_cents,
    EXPENSES_HEADER, INCOME_HEADER,
};
pub use grid::{
    build_expenses_sheet_data, build_income_sheet_data, cents_to_eur_number, Cell, SheetData,
};
pub use json::{export_json_string, FullExport, CSV_BACKUP_FILENAME, JSON_BACKUP_FILENAME};
pub use share::{
    share_batch, share_or_download, CommandShareSurface, DirectorySurface, ExportFile,
    ExportScope, ShareError, ShareOutcome, ShareStatus, ShareSurface, MIME_CSV, MIME_JSON,
    MIME_XLSX,
};
pub use xlsx::{build_export_workbook, EXPENSES_SHEET, INCOME_SHEET};
