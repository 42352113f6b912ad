//! # roundboard
//!
//! Dashboard pages for the reports of a round-based supply chain game.
//!
//! Each page runs the same pipeline: load sheets from the finance report,
//! the supplier list and the main data export, normalize the finance report
//! into one row per round, aggregate per round (and category), and assemble
//! chart specifications that any plotting front end can draw.
//!
//! ## Features
//!
//! - `xlsx` (default): read `.xlsx` workbooks
//! - `csv` (default): read `.csv` files as single-sheet workbooks
//!
//! ## Example
//!
//! ```rust,no_run
//! use roundboard::prelude::*;
//!
//! let config = DashboardConfig::default().with_data_dir("reports");
//! let page = render(Page::Purchasing, &config);
//!
//! for panel in page.failures() {
//!     eprintln!("{} could not be drawn", panel.title());
//! }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod pages;
pub mod panel;
pub mod prelude;

pub use config::{DashboardConfig, HubLocation, InputFiles, KpiTargets, NormalizeConfig};
pub use error::{DashboardError, DashboardResult, LoadError, LoadResult};
pub use loader::{list_sheets, MemoizedLoader, SheetLoader, WorkbookLoader};
pub use pages::{Page, PageContext, UnknownPage};
pub use panel::{
    PageRender, PanelBuilder, PanelContent, PanelOutcome, Report, ReportRow, ReportSection,
    Section, TableData,
};

pub use roundboard_chart::{
    format_value, Annotation, Assembler, Axis, BarMode, ChartError, ChartKind, ChartSpec,
    ChartTemplate, Dash, Gauge, GeoPoint, Legend, LegendPosition, Palette, Payload,
    ReferenceLine, Sankey, SankeyLink, StaticSeries, Trace, TraceMode, ValueFormat,
};
pub use roundboard_core::{CellValue, RawTable, TableSource, Tabular};
pub use roundboard_frame::{
    aggregate, normalize, AggregatedSeries, Aggregation, AggregationError, KeyValue, MetricLabel,
    NormalizationError, NormalizeRules, NormalizedTable, Reduction, TidyTable, ROUND,
};

#[cfg(feature = "csv")]
pub use roundboard_csv::{CsvReadOptions, CsvReader};
#[cfg(feature = "xlsx")]
pub use roundboard_xlsx::XlsxReader;

/// Render one page from the files named in `config`.
///
/// Each sheet is read at most once per call. Panels that fail are part of
/// the result; this never fails as a whole.
pub fn render(page: Page, config: &DashboardConfig) -> PageRender {
    let loader = MemoizedLoader::new(WorkbookLoader::new());
    render_with(page, config, &loader)
}

/// Render one page with a caller-supplied loader
pub fn render_with(page: Page, config: &DashboardConfig, loader: &dyn SheetLoader) -> PageRender {
    let ctx = PageContext::new(config, loader);
    let render = page.render(&ctx);
    tracing::info!(
        page = page.name(),
        panels = render.panels().count(),
        failed = render.failures().count(),
        "page rendered"
    );
    render
}
