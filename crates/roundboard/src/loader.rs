//! Sheet loading
//!
//! [`WorkbookLoader`] picks a reader from the file extension, the same way
//! for every page. [`MemoizedLoader`] wraps any loader with a per-render
//! cache so a page that reads the same sheet twice parses it once.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;

use roundboard_core::RawTable;
#[cfg(feature = "csv")]
use roundboard_csv::{CsvError, CsvReadOptions, CsvReader};
#[cfg(feature = "xlsx")]
use roundboard_xlsx::{XlsxError, XlsxReader};

use crate::error::{LoadError, LoadResult};

/// Reads one sheet of a file into a [`RawTable`]
pub trait SheetLoader {
    /// Load a sheet; `sheet = None` selects the first sheet
    fn load(&self, path: &Path, sheet: Option<&str>) -> LoadResult<Arc<RawTable>>;
}

impl<L: SheetLoader + ?Sized> SheetLoader for &L {
    fn load(&self, path: &Path, sheet: Option<&str>) -> LoadResult<Arc<RawTable>> {
        (**self).load(path, sheet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Xlsx,
    Csv,
}

fn format_of(path: &Path) -> LoadResult<Format> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xlsm") => Ok(Format::Xlsx),
        #[cfg(feature = "csv")]
        Some("csv") => Ok(Format::Csv),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn require_file(path: &Path) -> LoadResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::FileNotFound(path.to_path_buf()))
    }
}

#[cfg(feature = "xlsx")]
fn xlsx_error(path: &Path, err: XlsxError) -> LoadError {
    match err {
        XlsxError::SheetNotFound(sheet) => LoadError::SheetNotFound {
            file: path.to_path_buf(),
            sheet,
        },
        XlsxError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            LoadError::FileNotFound(path.to_path_buf())
        }
        other => LoadError::Malformed {
            file: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

#[cfg(feature = "csv")]
fn csv_error(path: &Path, err: CsvError) -> LoadError {
    match err {
        CsvError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            LoadError::FileNotFound(path.to_path_buf())
        }
        other => LoadError::Malformed {
            file: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

/// Loader for XLSX and CSV files, chosen by extension
#[derive(Debug, Clone, Default)]
pub struct WorkbookLoader {
    #[cfg(feature = "csv")]
    csv_options: CsvReadOptions,
}

impl WorkbookLoader {
    /// Loader with default CSV options
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these options for CSV files
    #[cfg(feature = "csv")]
    pub fn with_csv_options(mut self, options: CsvReadOptions) -> Self {
        self.csv_options = options;
        self
    }
}

impl SheetLoader for WorkbookLoader {
    fn load(&self, path: &Path, sheet: Option<&str>) -> LoadResult<Arc<RawTable>> {
        let format = format_of(path)?;
        require_file(path)?;

        let table = match format {
            #[cfg(feature = "xlsx")]
            Format::Xlsx => {
                XlsxReader::read_sheet_file(path, sheet).map_err(|e| xlsx_error(path, e))?
            }
            #[cfg(feature = "csv")]
            Format::Csv => {
                let name = CsvReader::sheet_name(path);
                if let Some(requested) = sheet {
                    if requested != name {
                        return Err(LoadError::SheetNotFound {
                            file: path.to_path_buf(),
                            sheet: requested.to_string(),
                        });
                    }
                }
                CsvReader::read_file(path, &self.csv_options).map_err(|e| csv_error(path, e))?
            }
            #[allow(unreachable_patterns)]
            _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::debug!(
            source = %table.source(),
            rows = table.rows().len(),
            "loaded sheet"
        );
        Ok(Arc::new(table))
    }
}

/// Sheet names of a workbook in workbook order; a CSV file has one
pub fn list_sheets<P: AsRef<Path>>(path: P) -> LoadResult<Vec<String>> {
    let path = path.as_ref();
    let format = format_of(path)?;
    require_file(path)?;

    match format {
        #[cfg(feature = "xlsx")]
        Format::Xlsx => XlsxReader::sheet_names_from_file(path).map_err(|e| xlsx_error(path, e)),
        #[cfg(feature = "csv")]
        Format::Csv => Ok(vec![CsvReader::sheet_name(path)]),
        #[allow(unreachable_patterns)]
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

type CacheKey = (PathBuf, Option<String>);

/// Caches loaded tables by `(file, sheet)` for the lifetime of one render.
///
/// Failed loads are not cached. Not `Sync`: create one per render.
pub struct MemoizedLoader<L> {
    inner: L,
    cache: RefCell<AHashMap<CacheKey, Arc<RawTable>>>,
}

impl<L: SheetLoader> MemoizedLoader<L> {
    /// Wrap a loader
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RefCell::new(AHashMap::new()),
        }
    }

    /// Number of cached tables
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    /// The wrapped loader
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: SheetLoader> SheetLoader for MemoizedLoader<L> {
    fn load(&self, path: &Path, sheet: Option<&str>) -> LoadResult<Arc<RawTable>> {
        let key = (path.to_path_buf(), sheet.map(str::to_string));
        if let Some(table) = self.cache.borrow().get(&key) {
            tracing::debug!(file = %path.display(), sheet = ?sheet, "sheet cache hit");
            return Ok(Arc::clone(table));
        }

        let table = self.inner.load(path, sheet)?;
        self.cache.borrow_mut().insert(key, Arc::clone(&table));
        Ok(table)
    }
}
