//! Financial record domain model.
//!
//! # Invariants
//! - `id` is assigned by the store at construction and never reused.
//! - `category_id` always names a category that existed when the record was
//!   created.
//! - The sign of `value` is interpreted through `kind`; it is not enforced.

use crate::model::category::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a financial record.
pub type RecordId = Uuid;

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Outcome,
}

impl RecordKind {
    /// Parses the literal `income` / `outcome` form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "outcome" => Some(Self::Outcome),
            _ => None,
        }
    }

    /// Returns the literal form used in CSV input and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One financial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    /// Serialized as `type` to match the external transaction shape.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub value: Decimal,
    pub category_id: CategoryId,
}

/// Aggregated totals over stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income: Decimal,
    pub outcome: Decimal,
    /// `income - outcome`.
    pub total: Decimal,
}

impl Balance {
    /// Folds records into income/outcome sums. `None` when a sum overflows.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<Self> {
        let (income, outcome) = records.into_iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, outcome), record| match record.kind {
                RecordKind::Income => Some((income.checked_add(record.value)?, outcome)),
                RecordKind::Outcome => Some((income, outcome.checked_add(record.value)?)),
            },
        )?;

        Some(Self {
            income,
            outcome,
            total: income.checked_sub(outcome)?,
        })
    }
}
