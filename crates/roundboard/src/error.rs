//! Error types for the dashboard pipeline

use std::path::PathBuf;

use thiserror::Error;

use roundboard_chart::ChartError;
use roundboard_frame::{AggregationError, NormalizationError};

/// Result type for loading sheets
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type for dashboard operations
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;

/// A sheet could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The workbook has no sheet with this name
    #[error("sheet '{sheet}' not found in {}", file.display())]
    SheetNotFound { file: PathBuf, sheet: String },

    /// The file extension is not one we can read
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The file exists but could not be parsed
    #[error("malformed file {}: {detail}", file.display())]
    Malformed { file: PathBuf, detail: String },
}

/// Any failure while building a panel
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Normalize(#[from] NormalizationError),

    #[error(transparent)]
    Aggregate(#[from] AggregationError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    /// A filter that must select a row selected none
    #[error("no row in '{table}' where {condition}")]
    NoMatchingRow { table: String, condition: String },

    /// Configuration file could not be read
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    /// Error for an empty filter result
    pub fn no_matching_row<T: Into<String>, C: Into<String>>(table: T, condition: C) -> Self {
        DashboardError::NoMatchingRow {
            table: table.into(),
            condition: condition.into(),
        }
    }
}
