//! Errors raised while reading `.csv` files

use thiserror::Error;

pub type CsvResult<T> = std::result::Result<T, CsvError>;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    /// Record-level failure (bad quoting, invalid UTF-8)
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
