//! # roundboard-core
//!
//! Core data structures shared by the roundboard crates.
//!
//! This crate provides:
//! - [`CellValue`] - A single spreadsheet value (number, text, boolean, error literal, empty)
//! - [`CellAddress`] - A1-style cell locations, used while reading sheets
//! - [`RawTable`] - One sheet read verbatim, identified by its [`TableSource`]
//! - [`Tabular`] - Read access shared by every table shape in the pipeline
//!
//! ## Example
//!
//! ```rust
//! use roundboard_core::{CellValue, RawTable, TableSource, Tabular};
//!
//! let table = RawTable::from_grid(
//!     TableSource::new("data/report.csv", "report"),
//!     vec![
//!         vec!["Round".into(), "Profit".into()],
//!         vec![CellValue::Number(1.0), CellValue::Number(1200.0)],
//!     ],
//! );
//!
//! assert_eq!(table.column_index("Profit"), Some(1));
//! assert_eq!(table.row_count(), 1);
//! ```

pub mod cell;
pub mod error;
pub mod table;

pub use cell::{CellAddress, CellValue, SharedString};
pub use error::{Error, Result};
pub use table::{RawTable, TableSource, Tabular};

/// Last row a sheet can address
pub const MAX_ROWS: u32 = 1_048_576;

/// Last column a sheet can address
pub const MAX_COLS: u16 = 16_384;
