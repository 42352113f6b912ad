//! Owned tidy table
//!
//! Intermediate results of the pipeline (aggregates turned back into rows,
//! filtered or melted tables) are plain column/row tables without a source
//! file. [`TidyTable`] is that shape.

use roundboard_core::{CellValue, Tabular};

use crate::error::{AggregateResult, AggregationError};

static EMPTY: CellValue = CellValue::Empty;

/// One observation per row, one variable per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TidyTable {
    /// Create a table, padding or truncating rows to the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Copy any table into an owned tidy table
    pub fn from_tabular<T: Tabular + ?Sized>(table: &T) -> Self {
        let rows = (0..table.row_count())
            .map(|row| {
                (0..table.column_count())
                    .map(|col| table.cell(row, col).clone())
                    .collect()
            })
            .collect();
        Self {
            columns: table.columns().to_vec(),
            rows,
        }
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Append a column; `values` shorter than the table are padded
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<CellValue>) {
        self.columns.push(name.into());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().unwrap_or(CellValue::Empty));
        }
    }
}

impl Tabular for TidyTable {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// Index of a column, as an aggregation error when it is missing
pub(crate) fn require_column(
    table: &(impl Tabular + ?Sized),
    name: &str,
) -> AggregateResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| AggregationError::UnknownColumn(name.to_string()))
}

/// Read a metric cell as a number, naming the column on failure
pub(crate) fn numeric(
    table: &(impl Tabular + ?Sized),
    row: usize,
    col: usize,
) -> AggregateResult<f64> {
    table
        .cell(row, col)
        .to_number()
        .ok_or_else(|| AggregationError::NonNumeric {
            column: table.columns()[col].clone(),
            row,
        })
}
