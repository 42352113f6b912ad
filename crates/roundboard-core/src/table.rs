//! Raw table type
//!
//! A [`RawTable`] is one sheet exactly as it was read: the first row is the
//! header, every following non-blank row is a record. Header text is kept
//! verbatim, so the same column name may appear more than once.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::cell::CellValue;
use crate::error::{Error, Result};

static EMPTY: CellValue = CellValue::Empty;

/// Identity of a loaded table: the file it came from and the sheet name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableSource {
    /// Path of the workbook or CSV file
    pub file: PathBuf,
    /// Sheet name (CSV files use the file stem)
    pub sheet: String,
}

impl TableSource {
    /// Create a new table source
    pub fn new<P: Into<PathBuf>, S: Into<String>>(file: P, sheet: S) -> Self {
        Self {
            file: file.into(),
            sheet: sheet.into(),
        }
    }

    /// Path of the source file
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.file.display(), self.sheet)
    }
}

/// Read access to a rectangular table with named columns.
///
/// Implemented by [`RawTable`] and by the normalized and aggregated tables
/// of the pipeline, so grouping and filtering work on any of them.
pub trait Tabular {
    /// Column names in order
    fn columns(&self) -> &[String];

    /// Number of data rows (header excluded)
    fn row_count(&self) -> usize;

    /// Cell at a data row and column; [`CellValue::Empty`] when out of range
    fn cell(&self, row: usize, col: usize) -> &CellValue;

    /// Index of the first column with exactly this name
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| c == name)
    }

    /// Number of columns
    fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// All values of the named column, in row order
    fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        let col = self.column_index(name)?;
        Some((0..self.row_count()).map(|row| self.cell(row, col)).collect())
    }
}

/// One sheet read verbatim.
///
/// Immutable once built; loaders hand it out behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    source: TableSource,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table from explicit column names and rows.
    ///
    /// Every row must have exactly one cell per column.
    pub fn new(
        source: TableSource,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RaggedRow {
                    row: idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self {
            source,
            columns,
            rows,
        })
    }

    /// Build a table from a dense grid whose first row is the header.
    ///
    /// Short rows are padded with empty cells, rows that are entirely blank
    /// are dropped, and blank header cells are named `Unnamed: {index}`.
    pub fn from_grid(source: TableSource, grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = grid.into_iter();

        let header = grid.next().unwrap_or_default();
        let columns = (0..width)
            .map(|idx| match header.get(idx) {
                Some(cell) if !cell.is_blank() => cell.to_string().trim().to_string(),
                _ => format!("Unnamed: {}", idx),
            })
            .collect();

        let rows = grid
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            source,
            columns,
            rows,
        }
    }

    /// Where this table was read from
    pub fn source(&self) -> &TableSource {
        &self.source
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// The table as a grid, header row first.
    ///
    /// Header cells are returned as strings.
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let header = self.columns.iter().map(CellValue::text).collect();
        std::iter::once(header)
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

impl Tabular for RawTable {
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
