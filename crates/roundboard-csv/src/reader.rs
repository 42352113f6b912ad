//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use roundboard_core::{CellValue, RawTable, TableSource};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a table named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<RawTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read(file, TableSource::new(path, Self::sheet_name(path)), options)
    }

    /// The single sheet name a CSV file exposes
    pub fn sheet_name(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read CSV from a reader into a table
    pub fn read<R: Read>(
        reader: R,
        source: TableSource,
        options: &CsvReadOptions,
    ) -> CsvResult<RawTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut grid: Vec<Vec<CellValue>> = Vec::new();

        // Header cells stay text; without a header every column is unnamed
        if options.has_header {
            let headers = csv_reader.headers()?;
            grid.push(headers.iter().map(CellValue::text).collect());
        } else {
            grid.push(Vec::new());
        }

        for result in csv_reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if options.detect_types {
                        Self::detect_type(field)
                    } else {
                        CellValue::text(field)
                    }
                })
                .collect();
            grid.push(row);
        }

        tracing::debug!(source = %source, rows = grid.len() - 1, "read csv sheet");

        Ok(RawTable::from_grid(source, grid))
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let field = field.trim();

        if field.is_empty() {
            return CellValue::Empty;
        }

        // Digits are always numbers, so only words count as booleans
        match field.to_lowercase().as_str() {
            "true" => return CellValue::Boolean(true),
            "false" => return CellValue::Boolean(false),
            _ => {}
        }

        if let Ok(n) = field.parse::<f64>() {
            return CellValue::Number(n);
        }

        CellValue::text(field)
    }
}
