//! Panels and the per-panel failure boundary
//!
//! A page is a list of sections, each a list of panels. Every panel is
//! built by a closure; when the closure fails the panel is recorded as
//! [`PanelOutcome::Failed`] and the page carries on with the next one.

use serde::Serialize;

use roundboard_chart::ChartSpec;
use roundboard_core::{CellValue, Tabular};
use roundboard_frame::KeyValue;

use crate::error::DashboardResult;

/// A table as shown on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<String>,
    /// Empty cells are `None`
    pub rows: Vec<Vec<Option<KeyValue>>>,
}

impl TableData {
    /// Copy any table
    pub fn from_tabular<T: Tabular + ?Sized>(table: &T) -> Self {
        let rows = (0..table.row_count())
            .map(|row| {
                (0..table.column_count())
                    .map(|col| KeyValue::from_cell(table.cell(row, col)))
                    .collect()
            })
            .collect();
        Self {
            columns: table.columns().to_vec(),
            rows,
        }
    }
}

/// One line of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub cells: Vec<String>,
}

impl ReportRow {
    pub fn new<S: Into<String>>(label: S, cells: Vec<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            cells,
        }
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Rows under a heading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub rows: Vec<ReportRow>,
}

/// Preformatted text table, optionally split into headed sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Column headers, label column first; empty for key/value lists
    pub columns: Vec<String>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Report with the given column headers
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            sections: Vec::new(),
        }
    }

    /// Key/value list without headers
    pub fn facts<I, K>(facts: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        Self {
            columns: Vec::new(),
            sections: vec![ReportSection {
                heading: None,
                rows: facts
                    .into_iter()
                    .map(|(label, value)| ReportRow::new(label, vec![value]))
                    .collect(),
            }],
        }
    }

    /// Append a section
    pub fn with_section<S: Into<String>>(mut self, heading: S, rows: Vec<ReportRow>) -> Self {
        self.sections.push(ReportSection {
            heading: Some(heading.into()),
            rows,
        });
        self
    }
}

/// What a rendered panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PanelContent {
    Chart(ChartSpec),
    Table(TableData),
    Report(Report),
    Message(String),
}

/// Result of building one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelOutcome {
    Rendered { title: String, content: PanelContent },
    Failed { title: String, error: String },
}

impl PanelOutcome {
    pub fn title(&self) -> &str {
        match self {
            PanelOutcome::Rendered { title, .. } | PanelOutcome::Failed { title, .. } => title,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PanelOutcome::Failed { .. })
    }

    /// The chart, if this panel rendered one
    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            PanelOutcome::Rendered {
                content: PanelContent::Chart(chart),
                ..
            } => Some(chart),
            _ => None,
        }
    }
}

/// A titled group of panels; tabs are sections with a tab label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    pub panels: Vec<PanelOutcome>,
}

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRender {
    pub page: String,
    pub title: String,
    pub sections: Vec<Section>,
}

impl PageRender {
    /// All panels in page order
    pub fn panels(&self) -> impl Iterator<Item = &PanelOutcome> {
        self.sections.iter().flat_map(|s| s.panels.iter())
    }

    /// Panels that failed
    pub fn failures(&self) -> impl Iterator<Item = &PanelOutcome> {
        self.panels().filter(|p| p.is_failed())
    }

    /// First panel with this title
    pub fn panel(&self, title: &str) -> Option<&PanelOutcome> {
        self.panels().find(|p| p.title() == title)
    }
}

/// Collects panels for a page, isolating failures per panel
pub struct PanelBuilder {
    page: String,
    title: String,
    sections: Vec<Section>,
}

impl PanelBuilder {
    pub fn new<P: Into<String>, T: Into<String>>(page: P, title: T) -> Self {
        Self {
            page: page.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Start a new section; later panels go into it
    pub fn section<S: Into<String>>(&mut self, title: S) -> &mut Self {
        self.sections.push(Section {
            title: title.into(),
            tab: None,
            panels: Vec::new(),
        });
        self
    }

    /// Start a new tab of a section
    pub fn tab<S: Into<String>, T: Into<String>>(&mut self, title: S, tab: T) -> &mut Self {
        self.sections.push(Section {
            title: title.into(),
            tab: Some(tab.into()),
            panels: Vec::new(),
        });
        self
    }

    /// Build a panel; any error becomes a failed panel
    pub fn panel<F>(&mut self, title: &str, build: F) -> &mut Self
    where
        F: FnOnce() -> DashboardResult<PanelContent>,
    {
        let outcome = match build() {
            Ok(content) => PanelOutcome::Rendered {
                title: title.to_string(),
                content,
            },
            Err(err) => {
                tracing::warn!(page = %self.page, panel = title, error = %err, "panel failed");
                PanelOutcome::Failed {
                    title: title.to_string(),
                    error: err.to_string(),
                }
            }
        };
        self.push(outcome);
        self
    }

    pub fn chart<F>(&mut self, title: &str, build: F) -> &mut Self
    where
        F: FnOnce() -> DashboardResult<ChartSpec>,
    {
        self.panel(title, || build().map(PanelContent::Chart))
    }

    pub fn table<F>(&mut self, title: &str, build: F) -> &mut Self
    where
        F: FnOnce() -> DashboardResult<TableData>,
    {
        self.panel(title, || build().map(PanelContent::Table))
    }

    pub fn report<F>(&mut self, title: &str, build: F) -> &mut Self
    where
        F: FnOnce() -> DashboardResult<Report>,
    {
        self.panel(title, || build().map(PanelContent::Report))
    }

    /// Record a panel that could not even be set up
    pub fn failed<E: std::fmt::Display>(&mut self, title: &str, error: E) -> &mut Self {
        tracing::warn!(page = %self.page, panel = title, error = %error, "panel failed");
        self.push(PanelOutcome::Failed {
            title: title.to_string(),
            error: error.to_string(),
        });
        self
    }

    fn push(&mut self, outcome: PanelOutcome) {
        if self.sections.is_empty() {
            self.section(self.title.clone());
        }
        if let Some(section) = self.sections.last_mut() {
            section.panels.push(outcome);
        }
    }

    pub fn finish(self) -> PageRender {
        PageRender {
            page: self.page,
            title: self.title,
            sections: self.sections,
        }
    }
}

/// Round a value to `decimals` places and print it without trailing zeros
pub fn format_rounded(value: f64, decimals: i32) -> String {
    let factor = 10f64.powi(decimals);
    CellValue::Number((value * factor).round() / factor).to_string()
}

/// Print a number with `,` thousands separators
pub fn format_thousands(value: f64) -> String {
    let text = CellValue::Number(value).to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DashboardError, LoadError};
    use pretty_assertions::assert_eq;
    use roundboard_chart::ChartKind;
    use std::path::PathBuf;

    #[test]
    fn test_failed_panel_does_not_stop_page() {
        let mut panels = PanelBuilder::new("home", "Home");
        panels
            .section("Finance")
            .chart("first", || Ok(ChartSpec::new(ChartKind::Line, "first")))
            .chart("second", || {
                Err(LoadError::FileNotFound(PathBuf::from("data/missing.xlsx")).into())
            })
            .chart("third", || Ok(ChartSpec::new(ChartKind::Bar, "third")));
        let page = panels.finish();

        let outcomes: Vec<(&str, bool)> =
            page.panels().map(|p| (p.title(), p.is_failed())).collect();
        assert_eq!(outcomes, vec![("first", false), ("second", true), ("third", false)]);
        assert_eq!(page.failures().count(), 1);
        match page.panel("second") {
            Some(PanelOutcome::Failed { error, .. }) => {
                assert_eq!(error, "file not found: data/missing.xlsx")
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_panels_before_any_section_use_page_title() {
        let mut panels = PanelBuilder::new("sales", "Sales");
        panels.failed("Customers", DashboardError::no_matching_row("Customer", "Customer = A"));
        let page = panels.finish();
        assert_eq!(page.sections[0].title, "Sales");
        assert_eq!(page.sections[0].panels.len(), 1);
    }

    #[test]
    fn test_tabs() {
        let mut panels = PanelBuilder::new("operations", "Operations");
        panels
            .tab("Warehousing", "Round 0")
            .panel("note", || Ok(PanelContent::Message("No data found for Round 0".into())));
        let page = panels.finish();
        assert_eq!(page.sections[0].tab.as_deref(), Some("Round 0"));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(-12345.5), "-12,345.5");
        assert_eq!(format_thousands(0.0), "0");
    }

    #[test]
    fn test_format_rounded() {
        assert_eq!(format_rounded(12.3456, 2), "12.35");
        assert_eq!(format_rounded(40.0, 2), "40");
        assert_eq!(format_rounded(5.000000000000001, 2), "5");
    }

    #[test]
    fn test_table_data_from_tabular() {
        use roundboard_core::{RawTable, TableSource};
        let raw = RawTable::from_grid(
            TableSource::new("data/a.xlsx", "A"),
            vec![
                vec!["Round".into(), "Name".into()],
                vec![CellValue::Number(1.0), CellValue::Empty],
            ],
        );
        let table = TableData::from_tabular(&raw);
        assert_eq!(table.rows, vec![vec![Some(KeyValue::Number(1.0)), None]]);
    }
}
