//! CSV row source for record import.
//!
//! # Invariants
//! - The header line is consumed by the reader and never yielded.
//! - Rows are yielded in file order, each exactly once.
//! - Short rows are accepted; missing cells are simply absent.

use csv::{Reader, ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One data row as read from the file, cells untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, cells: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            line,
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    fn from_record(record: StringRecord) -> Self {
        let line = record.position().map_or(0, |position| position.line());
        Self::new(line, record.iter())
    }
}

/// Single-pass iterator over the data rows of a CSV source.
pub struct CsvRows<R> {
    inner: StringRecordsIntoIter<R>,
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = csv::Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|result| result.map(RawRow::from_record))
    }
}

/// Opens `path` and returns an iterator over its data rows.
pub fn open_rows(path: impl AsRef<Path>) -> csv::Result<CsvRows<File>> {
    let reader = builder().from_path(path)?;
    Ok(rows_from_reader(reader))
}

/// Wraps any byte source in the same CSV dialect as [`open_rows`].
pub fn rows_from_source<R: Read>(source: R) -> CsvRows<R> {
    rows_from_reader(builder().from_reader(source))
}

fn rows_from_reader<R: Read>(reader: Reader<R>) -> CsvRows<R> {
    CsvRows {
        inner: reader.into_records(),
    }
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}
