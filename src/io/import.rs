use std::io::Read;

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use tracing::{debug, warn};

use crate::application::{AnalyticsService, AppError};
use crate::domain::{
    CategoryType, RecurringFrequency, Transaction, TransactionType, parse_amount,
};

/// Columns expected in a transaction CSV. `description`, `recurring` and
/// `frequency` may be omitted.
pub const TRANSACTION_COLUMNS: [&str; 7] = [
    "type",
    "amount",
    "category",
    "date",
    "description",
    "recurring",
    "frequency",
];

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred on one line during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every line without touching the store
    pub dry_run: bool,
    /// Create a `both` category for unknown category names
    pub create_missing_categories: bool,
}

struct Columns {
    kind: usize,
    amount: usize,
    category: usize,
    date: usize,
    description: Option<usize>,
    recurring: Option<usize>,
    frequency: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| anyhow::anyhow!("Missing required column '{}'", name))
        };
        Ok(Self {
            kind: require("type")?,
            amount: require("amount")?,
            category: require("category")?,
            date: require("date")?,
            description: find("description"),
            recurring: find("recurring"),
            frequency: find("frequency"),
        })
    }
}

/// Loads CSV transactions into the service's store, line by line.
pub struct Importer<'a> {
    service: &'a mut AnalyticsService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a mut AnalyticsService) -> Self {
        Self { service }
    }

    /// Import transactions from CSV. Bad lines are reported in the result
    /// and do not stop the import; a missing header column does.
    pub fn import_transactions_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let columns = Columns::from_headers(csv_reader.headers()?)?;
        let mut result = ImportResult::default();

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let transaction = match self.parse_record(&record, &columns, &options) {
                Ok(Some(t)) => t,
                Ok(None) => {
                    result.skipped += 1;
                    continue;
                }
                Err(e) => {
                    result.errors.push(ImportError { line, ..e });
                    continue;
                }
            };

            let outcome = if options.dry_run {
                // A nil category stands for one the import would create
                if transaction.category_id.is_nil() {
                    Ok(())
                } else {
                    self.service.validate_transaction(&transaction)
                }
            } else {
                self.service.record_transaction(transaction).map(|_| ())
            };

            match outcome {
                Ok(()) => result.imported += 1,
                Err(e) => result.errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("Transaction rejected: {}", e),
                }),
            }
        }

        if !result.errors.is_empty() {
            warn!(errors = result.errors.len(), "import finished with errors");
        }
        debug!(
            imported = result.imported,
            skipped = result.skipped,
            dry_run = options.dry_run,
            "imported transactions"
        );
        Ok(result)
    }

    /// `Ok(None)` means a blank line.
    fn parse_record(
        &mut self,
        record: &csv::StringRecord,
        columns: &Columns,
        options: &ImportOptions,
    ) -> Result<Option<Transaction>, ImportError> {
        if record.iter().all(|field| field.is_empty()) {
            return Ok(None);
        }

        let field = |index: usize| record.get(index).unwrap_or("");
        let optional = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
        };

        let transaction_type = TransactionType::from_str(field(columns.kind))
            .ok_or_else(|| field_error("type", format!("Unknown type '{}'", field(columns.kind))))?;

        let amount = parse_amount(field(columns.amount))
            .map_err(|e| field_error("amount", format!("Invalid amount: {}", e)))?;

        let date = parse_date(field(columns.date))
            .ok_or_else(|| field_error("date", format!("Invalid date '{}'", field(columns.date))))?;

        let category_key = field(columns.category);
        let category_id = match self.service.resolve_category(category_key) {
            Ok(category) => category.id,
            Err(_) if options.create_missing_categories && !category_key.is_empty() => {
                if options.dry_run {
                    // The category would be created; validate the rest only
                    return Ok(Some(Transaction::new(
                        transaction_type,
                        amount,
                        uuid::Uuid::nil(),
                        date,
                    )));
                }
                self.service
                    .add_category(category_key.to_string(), CategoryType::Both, None, None)
                    .map_err(|e| field_error("category", e.to_string()))?
                    .id
            }
            Err(AppError::CategoryNotFound(key)) => {
                return Err(field_error("category", format!("Unknown category '{}'", key)));
            }
            Err(e) => return Err(field_error("category", e.to_string())),
        };

        let mut transaction = Transaction::new(transaction_type, amount, category_id, date);
        if let Some(description) = optional(columns.description) {
            transaction = transaction.with_description(description);
        }

        let recurring = optional(columns.recurring)
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(false);
        let frequency = match optional(columns.frequency) {
            Some(s) => Some(RecurringFrequency::from_str(s).ok_or_else(|| {
                field_error("frequency", format!("Unknown frequency '{}'", s))
            })?),
            None => None,
        };
        if recurring || frequency.is_some() {
            transaction =
                transaction.with_recurrence(frequency.unwrap_or(RecurringFrequency::Monthly));
        }

        Ok(Some(transaction))
    }
}

fn field_error(field: &str, error: String) -> ImportError {
    ImportError {
        line: 0,
        field: Some(field.to_string()),
        error,
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
