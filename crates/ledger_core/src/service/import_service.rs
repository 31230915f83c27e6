//! Bulk record import use-case.
//!
//! # Responsibility
//! - Read CSV rows, drop incomplete ones, and resolve category names against
//!   the category store.
//! - Create missing categories and all new records in two batch writes.
//!
//! # Invariants
//! - Rows missing title, kind or value are skipped without error.
//! - A present kind outside `income|outcome`, or a present value that is not a
//!   decimal, fails the whole import instead of being skipped.
//! - Each distinct missing category title is created exactly once per import.
//! - Existing categories are reused by title; nothing is created for them.
//! - Returned records keep file order, minus skipped rows.
//! - Typed-field failures are detected before the first write.

use crate::error::AppError;
use crate::import::rows::{open_rows, RawRow};
use crate::model::category::Category;
use crate::model::record::{Record, RecordKind};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::record_repo::{NewRecord, RecordRepository, RepoError};
use log::{error, info};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// Errors from [`ImportRecordsService`].
#[derive(Debug, Error)]
pub enum ImportRecordsError {
    /// File could not be opened or a row could not be read.
    #[error(transparent)]
    Read(#[from] csv::Error),
    #[error("invalid record type `{value}` on line {line}; expected income|outcome")]
    InvalidKind { line: u64, value: String },
    #[error("invalid record value `{value}` on line {line}")]
    InvalidValue { line: u64, value: String },
    /// A pending row's category is missing from the resolved list.
    #[error("category `{0}` could not be resolved")]
    UnresolvedCategory(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ImportRecordsError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidKind { .. } | Self::InvalidValue { .. } => 400,
            Self::Read(_) | Self::UnresolvedCategory(_) | Self::Repo(_) => 500,
        }
    }
}

impl From<ImportRecordsError> for AppError {
    fn from(value: ImportRecordsError) -> Self {
        AppError::new(value.to_string(), value.status_code())
    }
}

/// Row that passed the presence checks, waiting for its category.
#[derive(Debug, Clone, PartialEq)]
struct PendingRecord {
    title: String,
    kind: RecordKind,
    value: Decimal,
    category: String,
}

#[derive(Debug, Default)]
struct ParsedRows {
    pending: Vec<PendingRecord>,
    /// One entry per pending row, duplicates kept.
    category_names: Vec<String>,
    skipped: usize,
}

/// Imports records and their categories from CSV input.
pub struct ImportRecordsService<R: RecordRepository, C: CategoryRepository> {
    records: R,
    categories: C,
}

impl<R: RecordRepository, C: CategoryRepository> ImportRecordsService<R, C> {
    pub fn new(records: R, categories: C) -> Self {
        Self {
            records,
            categories,
        }
    }

    /// Imports every complete row of the CSV file at `path`.
    ///
    /// The first line is treated as a header. Returns the persisted records
    /// in file order.
    pub fn execute(&self, path: impl AsRef<Path>) -> Result<Vec<Record>, ImportRecordsError> {
        let path = path.as_ref();
        let rows = open_rows(path).map_err(|err| {
            error!(
                "event=record_import module=service status=error error_code=open_failed path={} error={err}",
                path.display()
            );
            err
        })?;
        self.import_rows(rows)
    }

    /// Imports already-read rows. Used by [`Self::execute`] and by callers
    /// that do not read from a file.
    pub fn import_rows<I, E>(&self, rows: I) -> Result<Vec<Record>, ImportRecordsError>
    where
        I: IntoIterator<Item = Result<RawRow, E>>,
        E: Into<ImportRecordsError>,
    {
        let started_at = Instant::now();
        let result = self.import_parsed(rows);

        match &result {
            Ok((records, stats)) => info!(
                "event=record_import module=service status=ok rows_skipped={} categories_created={} categories_reused={} records_created={} duration_ms={}",
                stats.skipped,
                stats.categories_created,
                stats.categories_reused,
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=record_import module=service status=error status_code={} duration_ms={} error={err}",
                err.status_code(),
                started_at.elapsed().as_millis()
            ),
        }

        result.map(|(records, _)| records)
    }

    fn import_parsed<I, E>(&self, rows: I) -> Result<(Vec<Record>, ImportStats), ImportRecordsError>
    where
        I: IntoIterator<Item = Result<RawRow, E>>,
        E: Into<ImportRecordsError>,
    {
        let parsed = collect_rows(rows)?;

        let existing = self.categories.find_by_titles(&parsed.category_names)?;
        let missing = missing_category_titles(&parsed.category_names, &existing);

        let drafts = missing
            .iter()
            .map(|title| self.categories.create(title))
            .collect();
        let created = self.categories.save(drafts)?;

        let stats = ImportStats {
            skipped: parsed.skipped,
            categories_created: created.len(),
            categories_reused: existing.len(),
        };

        let by_title = first_category_by_title(created.iter().chain(existing.iter()));
        let drafts = parsed
            .pending
            .iter()
            .map(|pending| -> Result<Record, ImportRecordsError> {
                let category = by_title
                    .get(pending.category.as_str())
                    .copied()
                    .ok_or_else(|| {
                        ImportRecordsError::UnresolvedCategory(pending.category.clone())
                    })?;
                Ok(self.records.create(NewRecord {
                    title: &pending.title,
                    kind: pending.kind,
                    value: pending.value,
                    category,
                }))
            })
            .collect::<Result<Vec<_>, ImportRecordsError>>()?;

        let saved = self.records.save(drafts)?;
        Ok((saved, stats))
    }
}

#[derive(Debug, Clone, Copy)]
struct ImportStats {
    skipped: usize,
    categories_created: usize,
    categories_reused: usize,
}

fn collect_rows<I, E>(rows: I) -> Result<ParsedRows, ImportRecordsError>
where
    I: IntoIterator<Item = Result<RawRow, E>>,
    E: Into<ImportRecordsError>,
{
    let mut parsed = ParsedRows::default();

    for row in rows {
        let row = row.map_err(Into::<ImportRecordsError>::into)?;
        match parse_row(&row)? {
            Some(pending) => {
                parsed.category_names.push(pending.category.clone());
                parsed.pending.push(pending);
            }
            None => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

/// Trims cells and checks presence; `Ok(None)` means the row is skipped.
fn parse_row(row: &RawRow) -> Result<Option<PendingRecord>, ImportRecordsError> {
    let cell = |index: usize| row.cells.get(index).map_or("", |cell| cell.trim());
    let (title, kind, value, category) = (cell(0), cell(1), cell(2), cell(3));

    if title.is_empty() || kind.is_empty() || value.is_empty() {
        return Ok(None);
    }

    let kind = RecordKind::parse(kind).ok_or_else(|| ImportRecordsError::InvalidKind {
        line: row.line,
        value: kind.to_string(),
    })?;
    let value = Decimal::from_str(value).map_err(|_| ImportRecordsError::InvalidValue {
        line: row.line,
        value: value.to_string(),
    })?;

    Ok(Some(PendingRecord {
        title: title.to_string(),
        kind,
        value,
        category: category.to_string(),
    }))
}

/// Titles with no existing match, deduplicated in first-occurrence order.
fn missing_category_titles(names: &[String], existing: &[Category]) -> Vec<String> {
    let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut seen = HashSet::new();

    names
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn first_category_by_title<'a>(
    categories: impl Iterator<Item = &'a Category>,
) -> HashMap<&'a str, &'a Category> {
    let mut by_title = HashMap::new();
    for category in categories {
        by_title.entry(category.title.as_str()).or_insert(category);
    }
    by_title
}

#[cfg(test)]
mod tests {
    use super::{missing_category_titles, parse_row, ImportRecordsError, ImportRecordsService};
    use crate::import::rows::RawRow;
    use crate::model::category::Category;
    use crate::model::record::{Record, RecordId, RecordKind};
    use crate::repo::category_repo::CategoryRepository;
    use crate::repo::record_repo::{NewRecord, RecordRepository, RepoResult};
    use rust_decimal::Decimal;
    use std::cell::Cell;
    use uuid::Uuid;

    #[derive(Default)]
    struct FakeRecords {
        save_calls: Cell<usize>,
    }

    impl RecordRepository for &FakeRecords {
        fn find_one(&self, _id: RecordId) -> RepoResult<Option<Record>> {
            Ok(None)
        }

        fn delete(&self, _id: RecordId) -> RepoResult<()> {
            Ok(())
        }

        fn create(&self, fields: NewRecord<'_>) -> Record {
            Record {
                id: Uuid::new_v4(),
                title: fields.title.to_string(),
                kind: fields.kind,
                value: fields.value,
                category_id: fields.category.id,
            }
        }

        fn save(&self, records: Vec<Record>) -> RepoResult<Vec<Record>> {
            self.save_calls.set(self.save_calls.get() + 1);
            Ok(records)
        }
    }

    /// Category store that finds nothing and drops every saved category.
    struct LossyCategories;

    impl CategoryRepository for LossyCategories {
        fn find_by_titles(&self, _titles: &[String]) -> RepoResult<Vec<Category>> {
            Ok(Vec::new())
        }

        fn create(&self, title: &str) -> Category {
            category(title)
        }

        fn save(&self, _categories: Vec<Category>) -> RepoResult<Vec<Category>> {
            Ok(Vec::new())
        }
    }

    fn category(title: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            title: title.to_string(),
        }
    }

    #[test]
    fn parse_row_trims_cells() {
        let row = RawRow::new(2, [" Salary ", " income", "5000 ", "  Job "]);
        let pending = parse_row(&row).unwrap().unwrap();

        assert_eq!(pending.title, "Salary");
        assert_eq!(pending.kind, RecordKind::Income);
        assert_eq!(pending.value, Decimal::new(5000, 0));
        assert_eq!(pending.category, "Job");
    }

    #[test]
    fn parse_row_skips_rows_missing_required_fields() {
        for cells in [
            vec!["", "income", "10", "Job"],
            vec!["Salary", "   ", "10", "Job"],
            vec!["Salary", "income", "", "Job"],
            vec!["Salary", "income"],
        ] {
            let row = RawRow::new(2, cells);
            assert!(parse_row(&row).unwrap().is_none());
        }
    }

    #[test]
    fn parse_row_keeps_empty_category() {
        let row = RawRow::new(2, ["Gift", "income", "50"]);
        let pending = parse_row(&row).unwrap().unwrap();
        assert_eq!(pending.category, "");
    }

    #[test]
    fn parse_row_rejects_unknown_kind_and_bad_value() {
        let kind_row = RawRow::new(4, ["Rent", "expense", "10", "Housing"]);
        let kind_err = parse_row(&kind_row).unwrap_err();
        assert!(matches!(kind_err, ImportRecordsError::InvalidKind { line: 4, .. }));
        assert_eq!(kind_err.status_code(), 400);

        let value_row = RawRow::new(5, ["Rent", "outcome", "ten", "Housing"]);
        let value_err = parse_row(&value_row).unwrap_err();
        assert!(matches!(value_err, ImportRecordsError::InvalidValue { line: 5, .. }));
    }

    #[test]
    fn missing_titles_are_deduplicated_in_first_occurrence_order() {
        let names: Vec<String> = ["Job", "Food", "Housing", "Food", "Job", "Travel"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let existing = vec![category("Housing")];

        assert_eq!(
            missing_category_titles(&names, &existing),
            vec!["Job", "Food", "Travel"]
        );
    }

    #[test]
    fn unresolved_category_fails_before_record_save() {
        let records = FakeRecords::default();
        let service = ImportRecordsService::new(&records, LossyCategories);
        let rows: Vec<Result<RawRow, csv::Error>> =
            vec![Ok(RawRow::new(2, ["Salary", "income", "5000", "Job"]))];

        let err = service.import_rows(rows).unwrap_err();
        assert!(matches!(&err, ImportRecordsError::UnresolvedCategory(title) if title == "Job"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(records.save_calls.get(), 0);
    }
}
