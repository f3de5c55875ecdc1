//! CSV and JSON import
//!
//! CSV rows are validated one by one: a bad row is skipped with a
//! row-numbered reason and never aborts the run, and rows accepted before a
//! failure stay committed. JSON backups are trusted and parsed up front, so a
//! malformed document changes nothing.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    parse_date_local, Category, ExpenseEntry, IncomeMonth, Money, PaymentSource,
};
use crate::storage::{ExpenseStore, IncomeStore, Storage};

/// Canonical CSV header names of the five importable fields
pub const FIELD_DATE: &str = "dateLocal";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_PAYMENT_SOURCE: &str = "paymentSource";
pub const FIELD_EXTRA_DETAIL: &str = "extraDetail";

/// Amount header written by the CSV export, accepted in place of `amount`
pub const FIELD_AMOUNT_EXPORTED: &str = "amountEur";

/// Number of skip reasons quoted in a report summary
const SUMMARY_REASONS: usize = 5;

/// Which CSV header supplies each expense field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvMapping {
    pub date_local: String,
    pub category: String,
    pub amount: String,
    pub payment_source: String,
    pub extra_detail: String,
}

impl Default for CsvMapping {
    fn default() -> Self {
        Self {
            date_local: FIELD_DATE.to_string(),
            category: FIELD_CATEGORY.to_string(),
            amount: FIELD_AMOUNT.to_string(),
            payment_source: FIELD_PAYMENT_SOURCE.to_string(),
            extra_detail: FIELD_EXTRA_DETAIL.to_string(),
        }
    }
}

impl CsvMapping {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// A parsed CSV document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRows {
    /// First record, trimmed
    pub headers: Vec<String>,
    /// Remaining records, untrimmed
    pub rows: Vec<Vec<String>>,
}

impl CsvRows {
    fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// Split CSV text into a header row and data rows
///
/// Quoted fields may contain commas, quotes and newlines. Blank lines are
/// dropped and rows may have differing lengths.
pub fn parse_csv_rows(text: &str) -> TrackerResult<CsvRows> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let Some(headers) = records.next() else {
        return Ok(CsvRows::default());
    };

    Ok(CsvRows {
        headers: headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect(),
        rows: records.collect(),
    })
}

/// Whether the headers already name every field canonically
pub fn is_canonical_header(headers: &[String]) -> bool {
    let has = |name: &str| headers.iter().any(|h| h == name);
    has(FIELD_DATE)
        && has(FIELD_CATEGORY)
        && (has(FIELD_AMOUNT) || has(FIELD_AMOUNT_EXPORTED))
        && has(FIELD_PAYMENT_SOURCE)
        && has(FIELD_EXTRA_DETAIL)
}

/// Outcome of one CSV import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    /// One `"Row N: reason"` entry per skipped row, in file order
    pub reasons: Vec<String>,
}

impl ImportReport {
    fn skip(&mut self, row_number: usize, reason: &str) {
        self.skipped += 1;
        self.reasons.push(format!("Row {}: {}", row_number, reason));
    }

    /// `CSV imported: N, skipped: M (first reasons)`
    pub fn summary(&self) -> String {
        let mut text = format!("CSV imported: {}, skipped: {}", self.imported, self.skipped);
        if !self.reasons.is_empty() {
            let shown: Vec<&str> = self
                .reasons
                .iter()
                .take(SUMMARY_REASONS)
                .map(String::as_str)
                .collect();
            text.push_str(&format!(" ({})", shown.join("; ")));
        }
        text
    }
}

/// Counts from a JSON backup import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonImportReport {
    pub expenses: usize,
    pub incomes: usize,
}

impl JsonImportReport {
    pub fn summary(&self) -> String {
        format!(
            "JSON imported: {} expenses, {} income months",
            self.expenses, self.incomes
        )
    }
}

#[derive(Debug, Deserialize)]
struct JsonBackup {
    #[serde(default)]
    expenses: Option<Vec<ExpenseEntry>>,
    #[serde(default)]
    incomes: Option<Vec<IncomeMonth>>,
}

/// Resolved column indexes for one import run
struct Columns {
    date: Option<usize>,
    category: Option<usize>,
    amount: Option<usize>,
    payment_source: Option<usize>,
    extra_detail: Option<usize>,
}

impl Columns {
    fn resolve(rows: &CsvRows, mapping: &CsvMapping) -> Self {
        let amount = rows.column(&mapping.amount).or_else(|| {
            if mapping.amount == FIELD_AMOUNT {
                rows.column(FIELD_AMOUNT_EXPORTED)
            } else {
                None
            }
        });

        Self {
            date: rows.column(&mapping.date_local),
            category: rows.column(&mapping.category),
            amount,
            payment_source: rows.column(&mapping.payment_source),
            extra_detail: rows.column(&mapping.extra_detail),
        }
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

/// Validate one data row into a new expense
///
/// Checks run in a fixed order and stop at the first failure, whose short
/// reason is returned.
fn row_to_entry(row: &[String], columns: &Columns) -> Result<ExpenseEntry, &'static str> {
    let date = parse_date_local(cell(row, columns.date)).ok_or("invalid date")?;
    let category = Category::from_label(cell(row, columns.category)).ok_or("invalid category")?;
    let payment_source =
        cell(row, columns.payment_source).parse::<PaymentSource>().map_err(|_| "invalid payment source")?;

    let detail = cell(row, columns.extra_detail);
    if detail.is_empty() {
        return Err("missing detail");
    }

    let amount = Money::parse_lenient(cell(row, columns.amount))
        .filter(Money::is_positive)
        .ok_or("invalid amount")?;

    Ok(ExpenseEntry::new(
        date,
        category,
        amount,
        payment_source,
        Some(detail.to_string()),
    ))
}

/// Service for importing expenses and backups
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import expenses from CSV text
    ///
    /// Without a mapping the headers are expected to be the canonical field
    /// names. Each accepted row gets a fresh id and timestamps.
    pub fn import_csv(
        &self,
        source: &str,
        text: &str,
        mapping: Option<&CsvMapping>,
    ) -> TrackerResult<ImportReport> {
        let rows = parse_csv_rows(text)?;
        let identity = CsvMapping::default();
        let columns = Columns::resolve(&rows, mapping.unwrap_or(&identity));

        let mut report = ImportReport::default();
        for (index, row) in rows.rows.iter().enumerate() {
            let row_number = index + 2;
            match row_to_entry(row, &columns) {
                Ok(entry) => {
                    if let Err(e) = self.storage.expenses.put(entry) {
                        // Rows accepted before the failure stay committed
                        if let Err(flush_err) = self.storage.expenses.flush() {
                            warn!(error = %flush_err, "could not persist rows imported so far");
                        }
                        return Err(e);
                    }
                    report.imported += 1;
                }
                Err(reason) => {
                    debug!(row = row_number, reason, "skipping CSV row");
                    report.skip(row_number, reason);
                }
            }
        }

        self.storage.expenses.flush()?;
        self.storage.log_import(source, &report.summary())?;

        info!(
            source,
            imported = report.imported,
            skipped = report.skipped,
            "CSV import finished"
        );
        Ok(report)
    }

    /// Restore a JSON backup, upserting by primary key
    pub fn import_json(&self, source: &str, text: &str) -> TrackerResult<JsonImportReport> {
        let backup: JsonBackup = serde_json::from_str(text)
            .map_err(|e| TrackerError::Import(format!("Invalid JSON backup: {}", e)))?;

        let mut report = JsonImportReport::default();

        if let Some(expenses) = backup.expenses.filter(|e| !e.is_empty()) {
            report.expenses = self.storage.expenses.bulk_put(expenses)?;
            self.storage.expenses.flush()?;
        }
        if let Some(incomes) = backup.incomes.filter(|i| !i.is_empty()) {
            report.incomes = self.storage.incomes.bulk_put(incomes)?;
            self.storage.incomes.flush()?;
        }

        self.storage.log_import(source, &report.summary())?;
        info!(
            source,
            expenses = report.expenses,
            incomes = report.incomes,
            "JSON import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::TrackerPaths;
    use tempfile::TempDir;

    const HEADER: &str = "dateLocal,category,amount,paymentSource,extraDetail";

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_csv_rows() {
        let parsed = parse_csv_rows("a , b\r\n1,2\n\n3,\"x, y\"\n").unwrap();
        assert_eq!(parsed.headers, vec!["a", "b"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1], vec!["3", "x, y"]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(parse_csv_rows("").unwrap(), CsvRows::default());
        assert_eq!(parse_csv_rows("\n\n").unwrap(), CsvRows::default());
    }

    #[test]
    fn test_canonical_header_detection() {
        let headers = |s: &str| parse_csv_rows(s).unwrap().headers;
        assert!(is_canonical_header(&headers(HEADER)));
        assert!(is_canonical_header(&headers(
            "dateLocal,category,amountEur,paymentSource,extraDetail"
        )));
        assert!(!is_canonical_header(&headers("Date,Category,Amount,Card,Note")));
    }

    #[test]
    fn test_import_valid_row() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = format!("{}\n2025-01-15,Food shopping,\"12,34\",credit_card,weekly shop", HEADER);

        let report = service.import_csv("a.csv", &text, None).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 0);
        let all = storage.expenses.all().unwrap();
        assert_eq!(all[0].amount_cents.cents(), 1234);
        assert_eq!(all[0].extra_detail.as_deref(), Some("weekly shop"));
    }

    #[test]
    fn test_validation_order_and_reasons() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = [
            HEADER,
            "2025/01/15,Rent,x,cash,",
            "2025-01-15,Rent,x,cash,",
            "2025-01-15,Lunch,x,cash,",
            "2025-01-15,Lunch,x,credit_card,",
            "2025-01-15,Lunch,x,credit_card,sandwich",
            "2025-01-15,Lunch,0,credit_card,sandwich",
            "2025-01-15,Lunch,4.5,joint_account,sandwich",
        ]
        .join("\n");

        let report = service.import_csv("a.csv", &text, None).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 6);
        assert_eq!(
            report.reasons,
            vec![
                "Row 2: invalid date",
                "Row 3: invalid category",
                "Row 4: invalid payment source",
                "Row 5: missing detail",
                "Row 6: invalid amount",
                "Row 7: invalid amount",
            ]
        );
        assert_eq!(report.imported + report.skipped, 7);
    }

    #[test]
    fn test_impossible_calendar_date_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = format!("{}\n2025-02-30,Lunch,1,credit_card,x", HEADER);

        let report = service.import_csv("a.csv", &text, None).unwrap();
        assert_eq!(report.reasons, vec!["Row 2: invalid date"]);
    }

    #[test]
    fn test_mapped_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let mapping = CsvMapping {
            date_local: "Date".into(),
            category: "Cat".into(),
            amount: "Sum".into(),
            payment_source: "Paid".into(),
            extra_detail: "Note".into(),
        };
        let text = "Note,Sum,Date,Paid,Cat\nbread,2.5,2025-03-01,joint_account,Food shopping";

        let report = service.import_csv("bank.csv", text, Some(&mapping)).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(storage.expenses.all().unwrap()[0].amount_cents.cents(), 250);
    }

    #[test]
    fn test_missing_column_reads_as_empty() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = "dateLocal,category,amount,paymentSource\n2025-01-15,Lunch,1,credit_card";

        let report = service.import_csv("a.csv", text, None).unwrap();
        assert_eq!(report.reasons, vec!["Row 2: missing detail"]);
    }

    #[test]
    fn test_summary_quotes_first_five_reasons() {
        let mut report = ImportReport::default();
        report.imported = 2;
        for row in 2..9 {
            report.skip(row, "invalid date");
        }

        let summary = report.summary();
        assert!(summary.starts_with("CSV imported: 2, skipped: 7 (Row 2: invalid date; "));
        assert!(summary.contains("Row 6: invalid date)"));
        assert!(!summary.contains("Row 7"));

        let clean = ImportReport {
            imported: 1,
            ..Default::default()
        };
        assert_eq!(clean.summary(), "CSV imported: 1, skipped: 0");
    }

    #[test]
    fn test_import_is_audited_once_per_run() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = format!("{}\n2025-01-15,Lunch,1,credit_card,a\n2025-01-16,Lunch,1,credit_card,b", HEADER);

        service.import_csv("a.csv", &text, None).unwrap();

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].operation, Operation::Import);
        assert_eq!(log[0].entity_id, "a.csv");
    }

    #[test]
    fn test_import_json() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = r#"{
            "expenses": [{
                "id": "e1",
                "dateLocal": "2025-01-15",
                "category": "Lunch",
                "amountCents": 450,
                "paymentSource": "credit_card",
                "createdAt": "2025-01-15T12:00:00.000Z",
                "updatedAt": "2025-01-15T12:00:00.000Z"
            }],
            "incomes": [{
                "monthKey": "2025-01",
                "incomeMaxCents": 100,
                "incomeLiisuCents": 200,
                "updatedAt": "2025-01-15T12:00:00.000Z"
            }]
        }"#;

        let report = service.import_json("backup.json", text).unwrap();
        assert_eq!(report, JsonImportReport { expenses: 1, incomes: 1 });

        // importing again upserts by key
        service.import_json("backup.json", text).unwrap();
        assert_eq!(storage.expenses.count().unwrap(), 1);
        assert_eq!(storage.incomes.all().unwrap().len(), 1);
    }

    #[test]
    fn test_import_json_only_incomes() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = r#"{"incomes": [{"monthKey": "2025-02", "incomeMaxCents": 1, "incomeLiisuCents": 0, "updatedAt": "2025-02-01T00:00:00Z"}]}"#;

        let report = service.import_json("b.json", text).unwrap();
        assert_eq!(report, JsonImportReport { expenses: 0, incomes: 1 });
    }

    #[test]
    fn test_malformed_json_changes_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = r#"{"expenses": [{"id": "e1"}], "incomes": []}"#;

        let err = service.import_json("bad.json", text).unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_exported_csv_imports_back() {
        use crate::export::build_expenses_csv;
        use chrono::NaiveDate;

        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let originals = vec![
            ExpenseEntry::new(
                NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
                Category::InternetPhoneTv,
                Money::from_cents(4999),
                PaymentSource::JointAccount,
                Some("router \"pro\", yearly\nplan".to_string()),
            ),
            ExpenseEntry::new(
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                Category::FoodShopping,
                Money::from_cents(12345),
                PaymentSource::CreditCard,
                Some("market".to_string()),
            ),
        ];
        let text = build_expenses_csv(&originals);

        let report = service.import_csv("round-trip.csv", &text, None).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);

        let key = |e: &ExpenseEntry| {
            (
                e.date_local,
                e.category,
                e.amount_cents,
                e.payment_source,
                e.extra_detail.clone(),
            )
        };
        let imported: Vec<_> = storage.expenses.all().unwrap().iter().map(key).collect();
        let expected: Vec<_> = originals.iter().map(key).collect();
        assert_eq!(imported, expected);
    }

    #[test]
    fn test_accepted_rows_reach_disk() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = format!(
            "{}\n2025-01-03,Lunch,12.50,credit_card,soup\nnot-a-date,Lunch,1,credit_card,x",
            HEADER
        );

        let report = service.import_csv("in.csv", &text, None).unwrap();
        assert_eq!(report.imported, 1);

        let reloaded = crate::storage::ExpenseRepository::new(
            TrackerPaths::with_base_dir(temp_dir.path().to_path_buf()).expenses_file(),
        );
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
    }

    #[test]
    fn test_backup_with_impossible_date_is_rejected_whole() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let text = r#"{"expenses": [{
            "id": "e1", "dateLocal": "2025-02-30", "category": "Lunch",
            "amountCents": 100, "paymentSource": "credit_card",
            "createdAt": "2025-02-01T10:00:00Z", "updatedAt": "2025-02-01T10:00:00Z"
        }]}"#;

        let err = service.import_json("backup.json", text).unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }
}
