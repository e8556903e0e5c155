//! Error types for the agenda core.

use thiserror::Error;

/// Errors that can occur in agenda operations.
///
/// Per-record problems (a bad timestamp, an unknown repeat value) are never
/// reported through this type; such records are skipped or degraded instead.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record parse error: {0}")]
    Parse(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Row capacity must be at least 1, got {0}")]
    InvalidRowCapacity(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
