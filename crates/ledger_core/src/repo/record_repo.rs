//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup, delete, construct and batch-save over `records`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `create` never touches the database; only `save` writes.
//! - One `save` call is one SQLite transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::category::Category;
use crate::model::record::{Balance, Record, RecordId, RecordKind};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    kind,
    value,
    category_uuid
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by record and category persistence.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("record not found: {0}")]
    NotFound(RecordId),
    #[error("invalid persisted ledger data: {0}")]
    InvalidData(String),
    #[error("balance exceeds the decimal range")]
    BalanceOverflow,
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Field set for constructing a record in memory.
#[derive(Debug, Clone, Copy)]
pub struct NewRecord<'a> {
    pub title: &'a str,
    pub kind: RecordKind,
    pub value: Decimal,
    pub category: &'a Category,
}

/// Record store operations used by the ledger services.
pub trait RecordRepository {
    /// Looks up one record by id.
    fn find_one(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Deletes one record by id.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    /// Builds an unsaved record with a store-assigned id.
    fn create(&self, fields: NewRecord<'_>) -> Record;
    /// Persists records in one batch and returns them in input order.
    fn save(&self, records: Vec<Record>) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists all records in insertion order.
    pub fn list_records(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    /// Sums income and outcome over all stored records.
    pub fn get_balance(&self) -> RepoResult<Balance> {
        let records = self.list_records()?;
        Balance::from_records(&records).ok_or(RepoError::BalanceOverflow)
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn find_one(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

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
        if records.is_empty() {
            return Ok(records);
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (uuid, title, kind, value, category_uuid)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(uuid) DO UPDATE SET
                    title = excluded.title,
                    kind = excluded.kind,
                    value = excluded.value,
                    category_uuid = excluded.category_uuid,
                    updated_at = (strftime('%s', 'now') * 1000);",
            )?;

            for record in &records {
                stmt.execute(params![
                    record.id.to_string(),
                    record.title.as_str(),
                    record.kind.as_str(),
                    record.value.to_string(),
                    record.category_id.to_string(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id = parse_uuid(row.get("uuid")?, "records.uuid")?;
    let category_id = parse_uuid(row.get("category_uuid")?, "records.category_uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = RecordKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid record kind `{kind_text}` in records.kind"))
    })?;

    let value_text: String = row.get("value")?;
    let value = Decimal::from_str(&value_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid decimal `{value_text}` in records.value"))
    })?;

    Ok(Record {
        id,
        title: row.get("title")?,
        kind,
        value,
        category_id,
    })
}

pub(crate) fn parse_uuid(text: String, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}
