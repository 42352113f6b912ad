//! Normalization and aggregation errors

use thiserror::Error;

/// Result type for normalization
pub type NormalizeResult<T> = std::result::Result<T, NormalizationError>;

/// Result type for aggregation and reshaping
pub type AggregateResult<T> = std::result::Result<T, AggregationError>;

/// A raw table could not be turned into a round-indexed table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// Two columns ended up with the same name
    #[error("column name collision: '{name}'")]
    Collision { name: String },

    /// A directional metric appeared more than twice
    #[error("'{name}' appears {occurrences} times; only inbound and outbound are known")]
    AmbiguousDirection { name: String, occurrences: usize },

    /// The table has no label column to use as the round index
    #[error("table has no round column")]
    MissingRound,

    /// A round label is not a number
    #[error("round label '{value}' in row {row} is not numeric")]
    NonNumericRound { row: usize, value: String },
}

/// Grouping, filtering or reshaping failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// A key or metric column does not exist
    #[error("unknown column: '{0}'")]
    UnknownColumn(String),

    /// A metric cell could not be read as a number
    #[error("non-numeric value in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },
}
