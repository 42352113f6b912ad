//! End-to-end tests for roundboard-xlsx.
//!
//! Each test writes the workbook it needs to a temporary directory, then
//! reads it back with `XlsxReader` and asserts on the resulting table.

mod common;
mod reading;

pub use common::*;
