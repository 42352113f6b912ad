//! Common imports for roundboard users
//!
//! ```rust
//! use roundboard::prelude::*;
//! ```

pub use crate::{
    // Entry points
    render,
    render_with,
    // Pipeline
    aggregate,
    normalize,
    Aggregation,
    Assembler,
    ChartTemplate,
    // Results
    ChartSpec,
    PageRender,
    PanelContent,
    PanelOutcome,
    // Configuration
    DashboardConfig,
    // Errors
    DashboardError,
    DashboardResult,
    LoadError,
    // Loading
    MemoizedLoader,
    Page,
    PageContext,
    SheetLoader,
    Tabular,
    ValueFormat,
    WorkbookLoader,
};
