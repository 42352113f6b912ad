//! # roundboard-frame
//!
//! Turns raw report sheets into round-indexed tables and reduces them to
//! chartable series.
//!
//! - [`normalize`] transposes a metric-per-row sheet into a
//!   [`NormalizedTable`] with unique column names and a numeric `Round`
//! - [`aggregate`] groups any [`Tabular`](roundboard_core::Tabular) by key
//!   columns and reduces one metric column
//! - [`reshape`] holds the row-level helpers pages combine with grouping
//!
//! ## Example
//!
//! ```rust
//! use roundboard_core::{CellValue, RawTable, TableSource};
//! use roundboard_frame::{aggregate, normalize, Aggregation, NormalizeRules};
//!
//! let raw = RawTable::from_grid(
//!     TableSource::new("FinanceReport.xlsx", "Sheet1"),
//!     vec![
//!         vec![CellValue::Empty, 0.into(), 1.into()],
//!         vec!["ROI".into(), 0.1.into(), 0.3.into()],
//!     ],
//! );
//!
//! let table = normalize(&raw, &NormalizeRules::default()).unwrap();
//! let roi = aggregate(&table, &Aggregation::sum(&["Round"], "ROI")).unwrap();
//! assert_eq!(roi.len(), 2);
//! ```

pub mod aggregate;
pub mod error;
pub mod metric;
pub mod normalize;
pub mod reshape;
pub mod tidy;

pub use aggregate::{aggregate, AggregatedSeries, Aggregation, KeyValue, Reduction};
pub use error::{AggregateResult, AggregationError, NormalizationError, NormalizeResult};
pub use metric::MetricLabel;
pub use normalize::{
    dedupe_names, normalize, parse_round, DedupedName, NormalizeRules, NormalizedTable,
    DIRECTIONAL_METRICS, ROUND,
};
pub use reshape::{derive, derive_ratio, filter_eq, melt, ratio, select, unique_values, Row};
pub use tidy::TidyTable;
