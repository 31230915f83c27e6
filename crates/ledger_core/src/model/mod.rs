//! Ledger domain model.
//!
//! # Responsibility
//! - Define records (financial transactions) and the categories they are
//!   filed under.
//!
//! # Invariants
//! - Every record references exactly one category and never owns it.
//! - Categories outlive the records that reference them.

pub mod category;
pub mod record;
