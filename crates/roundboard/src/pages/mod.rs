//! Dashboard pages
//!
//! Each page loads what it needs through a [`PageContext`] and lays out its
//! panels with a [`PanelBuilder`]. A panel that fails is reported in place;
//! the rest of the page still renders.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use roundboard_chart::{ChartTemplate, ValueFormat};
use roundboard_core::{RawTable, Tabular};
use roundboard_frame::{
    aggregate, filter_eq, normalize, AggregateResult, AggregatedSeries, Aggregation,
    AggregationError, KeyValue, NormalizedTable, TidyTable, ROUND,
};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::loader::SheetLoader;
use crate::lookup::kpi_palette;
use crate::panel::{PageRender, PanelBuilder, TableData};

pub mod finances;
pub mod home;
pub mod operations;
pub mod purchasing;
pub mod sales;

/// Sheet names of the main workbook
pub mod sheets {
    pub const SUPPLIER_COMPONENT: &str = "Supplier - Component";
    pub const COMPONENT: &str = "Component";
    pub const SUPPLIER: &str = "Supplier";
    pub const WAREHOUSE_SALESAREA: &str = "Warehouse, Salesarea";
    pub const PRODUCT_WAREHOUSE: &str = "Product - Warehouse";
    pub const MIXERS: &str = "Mixers";
    pub const BOTTLING_LINE: &str = "Bottling line";
    pub const PRODUCT: &str = "Product";
    pub const CUSTOMER: &str = "Customer";
    pub const CUSTOMER_PRODUCT: &str = "Customer - Product";
}

/// Inputs shared by every panel of one render
pub struct PageContext<'a> {
    config: &'a DashboardConfig,
    loader: &'a dyn SheetLoader,
}

impl<'a> PageContext<'a> {
    pub fn new(config: &'a DashboardConfig, loader: &'a dyn SheetLoader) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &DashboardConfig {
        self.config
    }

    /// Finance report exactly as read
    pub fn raw_finance(&self) -> DashboardResult<Arc<RawTable>> {
        Ok(self.loader.load(&self.config.inputs.finance_report, None)?)
    }

    /// Finance report with one row per round
    pub fn finance(&self) -> DashboardResult<NormalizedTable> {
        let raw = self.raw_finance()?;
        Ok(normalize(&raw, &self.config.normalize_rules())?)
    }

    /// Supplier list with locations
    pub fn suppliers(&self) -> DashboardResult<Arc<RawTable>> {
        Ok(self.loader.load(&self.config.inputs.suppliers, None)?)
    }

    /// A sheet of the main workbook
    pub fn main_sheet(&self, sheet: &str) -> DashboardResult<Arc<RawTable>> {
        Ok(self.loader.load(&self.config.inputs.main_data, Some(sheet))?)
    }
}

/// The five dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Purchasing,
    Operations,
    Sales,
    Finances,
}

impl Page {
    /// Every page in menu order
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Purchasing,
        Page::Operations,
        Page::Sales,
        Page::Finances,
    ];

    /// Lowercase identifier
    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Purchasing => "purchasing",
            Page::Operations => "operations",
            Page::Sales => "sales",
            Page::Finances => "finances",
        }
    }

    /// Page heading
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Purchasing => "Purchasing",
            Page::Operations => "Operations",
            Page::Sales => "Sales",
            Page::Finances => "Finances",
        }
    }

    /// Build every panel of the page
    pub fn render(&self, ctx: &PageContext<'_>) -> PageRender {
        tracing::debug!(page = self.name(), "rendering page");
        let mut panels = PanelBuilder::new(self.name(), self.title());
        match self {
            Page::Home => home::build(ctx, &mut panels),
            Page::Purchasing => purchasing::build(ctx, &mut panels),
            Page::Operations => operations::build(ctx, &mut panels),
            Page::Sales => sales::build(ctx, &mut panels),
            Page::Finances => finances::build(ctx, &mut panels),
        }
        panels.finish()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Page name that matches no page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page '{0}' (expected one of: home, purchasing, operations, sales, finances)")]
pub struct UnknownPage(pub String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Sum of a metric per round
pub(crate) fn sum_by_round<T: Tabular + ?Sized>(
    table: &T,
    metric: &str,
) -> AggregateResult<AggregatedSeries> {
    aggregate(table, &Aggregation::sum(&[ROUND], metric))
}

/// Single orange line over rounds with value labels
pub(crate) fn kpi_line(title: &str, y_title: &str, format: ValueFormat) -> ChartTemplate {
    ChartTemplate::line(title)
        .with_y_title(y_title)
        .with_format(format)
        .with_palette(kpi_palette())
}

/// Rows matching every `(column, value)` pair; at least one must match
pub(crate) fn matching_rows<T: Tabular>(
    table: &T,
    table_name: &str,
    filters: &[(&str, KeyValue)],
) -> DashboardResult<TidyTable> {
    let mut rows = TidyTable::from_tabular(table);
    for (column, value) in filters {
        rows = filter_eq(&rows, column, value)?;
    }
    if rows.row_count() == 0 {
        let condition = filters
            .iter()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect::<Vec<_>>()
            .join(" and ");
        return Err(DashboardError::no_matching_row(table_name, condition));
    }
    Ok(rows)
}

/// Number in a named column; text is parsed
pub(crate) fn cell_number<T: Tabular + ?Sized>(
    table: &T,
    row: usize,
    column: &str,
) -> DashboardResult<f64> {
    let col = table
        .column_index(column)
        .ok_or_else(|| AggregationError::UnknownColumn(column.to_string()))?;
    table.cell(row, col).to_number().ok_or_else(|| {
        AggregationError::NonNumeric {
            column: column.to_string(),
            row,
        }
        .into()
    })
}

/// Display text of a cell in a named column
pub(crate) fn cell_text<T: Tabular + ?Sized>(
    table: &T,
    row: usize,
    column: &str,
) -> DashboardResult<String> {
    let col = table
        .column_index(column)
        .ok_or_else(|| AggregationError::UnknownColumn(column.to_string()))?;
    Ok(table.cell(row, col).to_string())
}

/// Panel showing a loaded sheet as is
pub(crate) fn raw_table<F>(panels: &mut PanelBuilder, title: &str, load: F)
where
    F: FnOnce() -> DashboardResult<Arc<RawTable>>,
{
    panels.table(title, || Ok(TableData::from_tabular(&*load()?)));
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_names_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.name().parse::<Page>(), Ok(page));
        }
        assert_eq!("Sales".parse::<Page>(), Ok(Page::Sales));
        assert_eq!(
            "supply-chain".parse::<Page>(),
            Err(UnknownPage("supply-chain".into()))
        );
    }

    #[test]
    fn test_matching_rows_reports_condition() {
        let table = TidyTable::new(
            vec!["Round".into(), "Warehouse".into()],
            vec![vec![0.into(), "Tank yard".into()]],
        );
        let found =
            matching_rows(&table, "Warehouse", &[("Round", KeyValue::Number(0.0))]).unwrap();
        assert_eq!(found.row_count(), 1);

        let err = matching_rows(
            &table,
            "Warehouse",
            &[("Round", KeyValue::Number(0.0)), ("Warehouse", KeyValue::from("Mixer hall"))],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no row in 'Warehouse' where Round = 0 and Warehouse = Mixer hall"
        );
    }
}
