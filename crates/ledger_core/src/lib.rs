//! Core domain logic for the ledger.
//! This crate owns the record/category invariants and the use-case services
//! that enforce them.

pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::AppError;
pub use import::{open_rows, rows_from_source, CsvRows, RawRow};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::record::{Balance, Record, RecordId, RecordKind};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::record_repo::{
    NewRecord, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::delete_service::{
    DeleteRecordError, DeleteRecordService, RECORD_NOT_FOUND_MESSAGE, RECORD_NOT_FOUND_STATUS,
};
pub use service::import_service::{ImportRecordsError, ImportRecordsService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
