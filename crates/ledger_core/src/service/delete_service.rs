//! Record delete use-case.
//!
//! # Invariants
//! - Delete is only issued after a successful lookup of the same id.
//! - A missing record always fails with `NotFound` and status 401.

use crate::error::AppError;
use crate::model::record::RecordId;
use crate::repo::record_repo::{RecordRepository, RepoError};
use log::{error, info};
use std::time::Instant;
use thiserror::Error;

/// Message reported when the target record does not exist.
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Transaction not exists!";
/// Status code reported for a missing record. Kept at 401 for API
/// compatibility with existing clients.
pub const RECORD_NOT_FOUND_STATUS: u16 = 401;

/// Errors from [`DeleteRecordService::execute`].
#[derive(Debug, Error)]
pub enum DeleteRecordError {
    #[error("{}", RECORD_NOT_FOUND_MESSAGE)]
    NotFound(RecordId),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DeleteRecordError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => RECORD_NOT_FOUND_STATUS,
            Self::Repo(_) => 500,
        }
    }
}

impl From<DeleteRecordError> for AppError {
    fn from(value: DeleteRecordError) -> Self {
        AppError::new(value.to_string(), value.status_code())
    }
}

/// Deletes single records by id.
pub struct DeleteRecordService<R: RecordRepository> {
    records: R,
}

impl<R: RecordRepository> DeleteRecordService<R> {
    pub fn new(records: R) -> Self {
        Self { records }
    }

    /// Removes the record with `id`, failing first if it does not exist.
    pub fn execute(&self, id: RecordId) -> Result<(), DeleteRecordError> {
        let started_at = Instant::now();
        let result = self.delete_existing(id);

        match &result {
            Ok(()) => info!(
                "event=record_delete module=service status=ok record_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=record_delete module=service status=error record_id={id} status_code={} duration_ms={} error={err}",
                err.status_code(),
                started_at.elapsed().as_millis()
            ),
        }

        result
    }

    fn delete_existing(&self, id: RecordId) -> Result<(), DeleteRecordError> {
        if self.records.find_one(id)?.is_none() {
            return Err(DeleteRecordError::NotFound(id));
        }

        self.records.delete(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteRecordError, DeleteRecordService, RECORD_NOT_FOUND_MESSAGE};
    use crate::error::AppError;
    use crate::model::record::{Record, RecordId, RecordKind};
    use crate::repo::record_repo::{NewRecord, RecordRepository, RepoResult};
    use rust_decimal::Decimal;
    use std::cell::RefCell;
    use uuid::Uuid;

    #[derive(Default)]
    struct FakeRecords {
        stored: RefCell<Vec<Record>>,
        delete_calls: RefCell<Vec<RecordId>>,
    }

    impl RecordRepository for &FakeRecords {
        fn find_one(&self, id: RecordId) -> RepoResult<Option<Record>> {
            Ok(self.stored.borrow().iter().find(|r| r.id == id).cloned())
        }

        fn delete(&self, id: RecordId) -> RepoResult<()> {
            self.delete_calls.borrow_mut().push(id);
            self.stored.borrow_mut().retain(|r| r.id != id);
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
            self.stored.borrow_mut().extend(records.iter().cloned());
            Ok(records)
        }
    }

    fn stored_record() -> Record {
        Record {
            id: Uuid::new_v4(),
            title: "Rent".to_string(),
            kind: RecordKind::Outcome,
            value: Decimal::new(1200, 0),
            category_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn missing_record_fails_without_delete_call() {
        let fake = FakeRecords::default();
        let service = DeleteRecordService::new(&fake);

        let err = service.execute(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DeleteRecordError::NotFound(_)));
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "Transaction not exists!");
        assert!(fake.delete_calls.borrow().is_empty());
    }

    #[test]
    fn existing_record_is_deleted_once() {
        let fake = FakeRecords::default();
        let record = stored_record();
        fake.stored.borrow_mut().push(record.clone());
        let service = DeleteRecordService::new(&fake);

        service.execute(record.id).unwrap();
        assert_eq!(*fake.delete_calls.borrow(), vec![record.id]);
        assert!(fake.stored.borrow().is_empty());
    }

    #[test]
    fn not_found_converts_to_app_error() {
        let err = DeleteRecordError::NotFound(Uuid::new_v4());
        assert_eq!(err.to_string(), RECORD_NOT_FOUND_MESSAGE);

        let app: AppError = err.into();
        assert_eq!(app, AppError::new("Transaction not exists!", 401));
    }
}
