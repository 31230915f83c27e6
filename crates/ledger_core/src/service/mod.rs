//! Ledger use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and other front ends decoupled from storage details.
//!
//! # Invariants
//! - Services hold no state between invocations beyond their repositories.

pub mod delete_service;
pub mod import_service;
