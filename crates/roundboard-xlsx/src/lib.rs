//! # roundboard-xlsx
//!
//! XLSX (Office Open XML) reader for roundboard.
//!
//! Only cell values are read: styles, comments and validations are ignored.
//! Each sheet becomes a [`roundboard_core::RawTable`] whose first row is the
//! header row.

pub mod error;
pub mod reader;

mod grid;

pub use error::{XlsxError, XlsxResult};
pub use grid::MAX_DENSE_CELLS;
pub use reader::XlsxReader;
