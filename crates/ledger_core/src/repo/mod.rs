//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record and category store contracts the services depend on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Services receive repositories at construction; there is no global
//!   registry.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod category_repo;
pub mod record_repo;
