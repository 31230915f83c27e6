//! Flat application error for front ends.
//!
//! Service errors convert into [`AppError`] so a caller can report a message
//! and a status code without matching every variant.

use serde::Serialize;
use thiserror::Error;

/// Message plus HTTP-style status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("error (status {status_code}): {message}")]
pub struct AppError {
    pub message: String,
    pub status_code: u16,
}

impl AppError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}
