//! Errors raised while reading `.xlsx` workbooks

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("cannot read workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook archive is unreadable: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("workbook XML is malformed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is a zip file but not a spreadsheet
    #[error("not an xlsx workbook: {0}")]
    NotAWorkbook(String),

    /// A part referenced by the workbook is absent from the archive
    #[error("workbook part '{0}' is missing")]
    MissingPart(String),

    #[error("no sheet named '{0}'")]
    SheetNotFound(String),

    /// Used range too large to lay out as rows
    #[error("sheet spans {rows} rows by {columns} columns, too large to read")]
    SheetTooLarge { rows: u64, columns: u64 },

    /// A cell whose reference or value cannot be interpreted
    #[error("bad cell: {0}")]
    BadCell(String),
}
