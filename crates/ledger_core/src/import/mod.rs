//! Input sources for bulk record import.
//!
//! # Responsibility
//! - Turn a delimited text file into a finite, ordered stream of raw rows.
//! - Leave trimming and field validation to the import service.

pub mod rows;

pub use rows::{open_rows, rows_from_source, CsvRows, RawRow};
