//! Row filtering, derived columns and wide/long reshaping

use ahash::AHashSet;

use roundboard_core::{CellValue, Tabular};

use crate::aggregate::KeyValue;
use crate::error::AggregateResult;
use crate::tidy::{numeric, require_column, TidyTable};

/// One row of a table, handed to [`derive`] closures
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a dyn Tabular,
    index: usize,
}

impl<'a> Row<'a> {
    /// Row position in the table
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the named column
    pub fn cell(&self, column: &str) -> AggregateResult<&'a CellValue> {
        let col = require_column(self.table, column)?;
        Ok(self.table.cell(self.index, col))
    }

    /// Numeric value in the named column
    pub fn number(&self, column: &str) -> AggregateResult<f64> {
        let col = require_column(self.table, column)?;
        numeric(self.table, self.index, col)
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Rows whose `column` equals `value`
pub fn filter_eq<T: Tabular>(
    table: &T,
    column: &str,
    value: &KeyValue,
) -> AggregateResult<TidyTable> {
    let col = require_column(table, column)?;
    let rows = (0..table.row_count())
        .filter(|&row| KeyValue::from_cell(table.cell(row, col)).as_ref() == Some(value))
        .map(|row| copy_row(table, row))
        .collect();
    Ok(TidyTable::new(table.columns().to_vec(), rows))
}

/// Append a column computed from each row
pub fn derive<T, F>(table: &T, name: &str, mut compute: F) -> AggregateResult<TidyTable>
where
    T: Tabular,
    F: FnMut(Row<'_>) -> AggregateResult<CellValue>,
{
    let values = (0..table.row_count())
        .map(|index| compute(Row { table, index }))
        .collect::<AggregateResult<Vec<_>>>()?;

    let mut derived = TidyTable::from_tabular(table);
    derived.push_column(name, values);
    Ok(derived)
}

/// Append `numerator / denominator` per row, 0 where the denominator is 0
pub fn derive_ratio<T: Tabular>(
    table: &T,
    name: &str,
    numerator: &str,
    denominator: &str,
) -> AggregateResult<TidyTable> {
    derive(table, name, |row| {
        Ok(CellValue::Number(ratio(
            row.number(numerator)?,
            row.number(denominator)?,
        )))
    })
}

/// Wide to long: one output row per input row and value column.
///
/// Output columns are `id_columns`, then `variable`, then `value`.
pub fn melt<T: Tabular>(
    table: &T,
    id_columns: &[&str],
    value_columns: &[&str],
    variable: &str,
    value: &str,
) -> AggregateResult<TidyTable> {
    let ids = id_columns
        .iter()
        .map(|name| require_column(table, name))
        .collect::<AggregateResult<Vec<_>>>()?;
    let values = value_columns
        .iter()
        .map(|name| require_column(table, name))
        .collect::<AggregateResult<Vec<_>>>()?;

    let mut columns: Vec<String> = id_columns.iter().map(|s| s.to_string()).collect();
    columns.push(variable.to_string());
    columns.push(value.to_string());

    let mut rows = Vec::with_capacity(table.row_count() * values.len());
    for (value_name, &value_col) in value_columns.iter().zip(&values) {
        for row in 0..table.row_count() {
            let mut out: Vec<CellValue> =
                ids.iter().map(|&col| table.cell(row, col).clone()).collect();
            out.push(CellValue::text(value_name));
            out.push(table.cell(row, value_col).clone());
            rows.push(out);
        }
    }

    Ok(TidyTable::new(columns, rows))
}

/// Distinct values of a column in first-seen order, empty cells skipped
pub fn unique_values<T: Tabular>(table: &T, column: &str) -> AggregateResult<Vec<KeyValue>> {
    let col = require_column(table, column)?;
    let mut seen = AHashSet::new();
    Ok((0..table.row_count())
        .filter_map(|row| KeyValue::from_cell(table.cell(row, col)))
        .filter(|key| seen.insert(key.clone()))
        .collect())
}

/// Keep only the named columns, in the given order
pub fn select<T: Tabular>(table: &T, columns: &[&str]) -> AggregateResult<TidyTable> {
    let cols = columns
        .iter()
        .map(|name| require_column(table, name))
        .collect::<AggregateResult<Vec<_>>>()?;
    let rows = (0..table.row_count())
        .map(|row| cols.iter().map(|&col| table.cell(row, col).clone()).collect())
        .collect();
    Ok(TidyTable::new(
        columns.iter().map(|s| s.to_string()).collect(),
        rows,
    ))
}

fn copy_row<T: Tabular>(table: &T, row: usize) -> Vec<CellValue> {
    (0..table.column_count())
        .map(|col| table.cell(row, col).clone())
        .collect()
}
