//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - `find_by_titles` matches by exact title value; duplicates in the input
//!   do not duplicate output rows.
//! - Results come back in insertion order, so the oldest category wins when
//!   two rows share a title.

use crate::model::category::Category;
use crate::repo::record_repo::{parse_uuid, RepoResult};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Category store operations used by the ledger services.
pub trait CategoryRepository {
    /// Returns every stored category whose title is in `titles`.
    fn find_by_titles(&self, titles: &[String]) -> RepoResult<Vec<Category>>;
    /// Builds an unsaved category with a store-assigned id.
    fn create(&self, title: &str) -> Category;
    /// Persists categories in one batch and returns them in input order.
    fn save(&self, categories: Vec<Category>) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists all categories in insertion order.
    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, title FROM categories ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_titles(&self, titles: &[String]) -> RepoResult<Vec<Category>> {
        let unique: BTreeSet<&str> = titles.iter().map(String::as_str).collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid, title FROM categories
             WHERE title IN ({placeholders})
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query(params_from_iter(unique))?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }

    fn create(&self, title: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            title: title.to_string(),
        }
    }

    fn save(&self, categories: Vec<Category>) -> RepoResult<Vec<Category>> {
        if categories.is_empty() {
            return Ok(categories);
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO categories (uuid, title)
                 VALUES (?1, ?2)
                 ON CONFLICT(uuid) DO UPDATE SET
                    title = excluded.title,
                    updated_at = (strftime('%s', 'now') * 1000);",
            )?;

            for category in &categories {
                stmt.execute(params![category.id.to_string(), category.title.as_str()])?;
            }
        }
        tx.commit()?;

        Ok(categories)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: parse_uuid(row.get("uuid")?, "categories.uuid")?,
        title: row.get("title")?,
    })
}
