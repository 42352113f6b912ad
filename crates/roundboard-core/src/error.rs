//! Error types for roundboard-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building tables
#[derive(Debug, Error)]
pub enum Error {
    /// A cell reference such as `B7` could not be read
    #[error("Invalid cell reference '{reference}': {reason}")]
    InvalidReference {
        reference: String,
        reason: &'static str,
    },

    /// A record does not have as many cells as the table has columns
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl Error {
    pub(crate) fn reference(reference: &str, reason: &'static str) -> Self {
        Error::InvalidReference {
            reference: reference.to_string(),
            reason,
        }
    }
}
