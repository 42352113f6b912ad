//! # roundboard-csv
//!
//! CSV reader for roundboard. A CSV file is a workbook with exactly one
//! sheet, named after the file stem.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
