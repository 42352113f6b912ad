//! Sparse cell collection used while a worksheet is being parsed

use std::collections::BTreeMap;

use roundboard_core::{CellAddress, CellValue};

use crate::error::{XlsxError, XlsxResult};

/// Largest grid a sheet may span once densified
pub const MAX_DENSE_CELLS: u64 = 10_000_000;

/// Cells keyed by position, densified once the sheet has been read.
#[derive(Debug, Default)]
pub(crate) struct SparseGrid {
    cells: BTreeMap<CellAddress, CellValue>,
    max_row: u32,
    max_col: u16,
}

impl SparseGrid {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, addr: CellAddress, value: CellValue) {
        if matches!(value, CellValue::Empty) {
            return;
        }
        self.max_row = self.max_row.max(addr.row);
        self.max_col = self.max_col.max(addr.col);
        self.cells.insert(addr, value);
    }

    /// Dense rows from A1 to the bottom-right-most non-empty cell.
    ///
    /// Fails with [`XlsxError::SheetTooLarge`] when that rectangle holds more
    /// than [`MAX_DENSE_CELLS`] cells.
    pub(crate) fn into_rows(self) -> XlsxResult<Vec<Vec<CellValue>>> {
        if self.cells.is_empty() {
            return Ok(Vec::new());
        }

        let height = u64::from(self.max_row) + 1;
        let width = u64::from(self.max_col) + 1;
        if height * width > MAX_DENSE_CELLS {
            return Err(XlsxError::SheetTooLarge {
                rows: height,
                columns: width,
            });
        }

        let mut rows = vec![vec![CellValue::Empty; width as usize]; height as usize];
        for (addr, value) in self.cells {
            rows[addr.row as usize][addr.col as usize] = value;
        }
        Ok(rows)
    }
}
