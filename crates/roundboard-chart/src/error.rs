//! Chart assembly errors

use thiserror::Error;

/// Result type for chart assembly
pub type ChartResult<T> = std::result::Result<T, ChartError>;

/// A chart specification could not be built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// There is nothing to plot
    #[error("chart '{0}' has no data")]
    EmptySeries(String),

    /// The template refers to a field the data does not provide
    #[error("chart '{chart}' needs field '{field}'")]
    MissingField { chart: String, field: String },

    /// A value cannot be placed in the chart
    #[error("chart '{chart}': {detail}")]
    InvalidValue { chart: String, detail: String },
}
