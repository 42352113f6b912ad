//! Column normalization
//!
//! Report sheets are laid out with one metric per row and one round per
//! column. [`normalize`] turns such a sheet into a [`NormalizedTable`] with
//! one row per round and one uniquely named column per metric.

use ahash::{AHashMap, AHashSet};
use lazy_regex::regex_captures;

use roundboard_core::{CellValue, RawTable, TableSource, Tabular};

use crate::error::{NormalizationError, NormalizeResult};
use crate::metric::MetricLabel;
use crate::tidy::TidyTable;

/// Name given to the label column
pub const ROUND: &str = "Round";

/// Finance metrics that are reported twice, once per flow direction
pub const DIRECTIONAL_METRICS: [&str; 4] = [
    "Operating profit - Indirect cost - Handling costs - Permanent employees",
    "Operating profit - Indirect cost - Handling costs - Flexible manpower",
    "Operating profit - Indirect cost - Administration costs - Order lines",
    "Operating profit - Indirect cost - Administration costs - Orders",
];

static EMPTY: CellValue = CellValue::Empty;

/// Rules applied by [`normalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Base names rewritten to `name (Inbound)` / `name (Outbound)`
    pub directional: Vec<String>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            directional: DIRECTIONAL_METRICS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NormalizeRules {
    /// Rules without any directional rewrite
    pub fn none() -> Self {
        Self {
            directional: Vec::new(),
        }
    }

    fn is_directional(&self, name: &str) -> bool {
        self.directional.iter().any(|d| d == name)
    }
}

/// A column name after duplicate resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupedName {
    /// Name as it appeared in the sheet
    pub base: String,
    /// 0 for the first occurrence, k for the k-th repeat
    pub occurrence: usize,
}

impl DedupedName {
    /// `base` for the first occurrence, `base_k` afterwards
    pub fn resolved(&self) -> String {
        if self.occurrence == 0 {
            self.base.clone()
        } else {
            format!("{}_{}", self.base, self.occurrence)
        }
    }
}

/// Number every repeated name left to right.
///
/// # Examples
/// ```
/// use roundboard_frame::dedupe_names;
///
/// let names = dedupe_names(["ROI", "ROI", "Gross margin", "ROI"]);
/// let resolved: Vec<String> = names.iter().map(|n| n.resolved()).collect();
/// assert_eq!(resolved, ["ROI", "ROI_1", "Gross margin", "ROI_2"]);
/// ```
pub fn dedupe_names<I, S>(names: I) -> Vec<DedupedName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    names
        .into_iter()
        .map(|name| {
            let base = name.as_ref().to_string();
            let count = counts.entry(base.clone()).or_insert(0);
            let occurrence = *count;
            *count += 1;
            DedupedName { base, occurrence }
        })
        .collect()
}

/// Parse a round label: a number, numeric text or text like `Round 3`
pub fn parse_round(value: &CellValue) -> Option<f64> {
    if let Some(n) = value.to_number() {
        return Some(n);
    }
    let text = value.as_text()?.trim();
    let (_, number) = regex_captures!(r"(?i)^round\s*(-?\d+(?:\.\d+)?)$", text)?;
    number.parse().ok()
}

/// One row per round, one uniquely named column per metric.
///
/// Column 0 is always [`ROUND`] and holds numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    source: TableSource,
    columns: Vec<String>,
    labels: Vec<MetricLabel>,
    suffixed: Vec<bool>,
    rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    /// Where the underlying sheet was read from
    pub fn source(&self) -> &TableSource {
        &self.source
    }

    /// Round of every row, in row order
    pub fn rounds(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.first().and_then(CellValue::as_number))
            .collect()
    }

    /// Parsed label of a column
    pub fn label(&self, name: &str) -> Option<&MetricLabel> {
        self.column_index(name).map(|idx| &self.labels[idx])
    }

    /// Parsed labels of all columns, in column order
    pub fn labels(&self) -> &[MetricLabel] {
        &self.labels
    }

    /// Columns whose name contains `keyword`.
    ///
    /// Columns renamed with a `_k` duplicate suffix are skipped.
    pub fn columns_matching(&self, keyword: &str) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.suffixed)
            .skip(1)
            .filter(|(name, suffixed)| !**suffixed && name.contains(keyword))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Copy into a tidy table for aggregation and reshaping
    pub fn to_table(&self) -> TidyTable {
        TidyTable::new(self.columns.clone(), self.rows.clone())
    }
}

impl Tabular for NormalizedTable {
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

/// Transpose a metric-per-row sheet and resolve its column names.
///
/// The first column of `raw` (metric names, headed by the blank or `Round`
/// label cell) becomes the header. Repeated names are numbered, directional
/// metrics are split into `(Inbound)` and `(Outbound)`, and the label column
/// becomes [`ROUND`] with numeric values.
pub fn normalize(raw: &RawTable, rules: &NormalizeRules) -> NormalizeResult<NormalizedTable> {
    if raw.column_count() == 0 {
        return Err(NormalizationError::MissingRound);
    }

    let grid = raw.to_grid();

    // Column 0 of the grid is the new header; the label cell heads it
    let metric_names: Vec<String> = grid
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, row)| match row.first() {
            Some(cell) if !cell.is_blank() => cell.to_string().trim().to_string(),
            _ => format!("Unnamed: {}", idx),
        })
        .collect();

    let mut columns = vec![ROUND.to_string()];
    let mut suffixed = vec![false];
    let deduped = dedupe_names(&metric_names);

    for name in &deduped {
        if rules.is_directional(&name.base) {
            let directional = match name.occurrence {
                0 => format!("{} (Inbound)", name.base),
                1 => format!("{} (Outbound)", name.base),
                _ => {
                    let occurrences = deduped.iter().filter(|n| n.base == name.base).count();
                    return Err(NormalizationError::AmbiguousDirection {
                        name: name.base.clone(),
                        occurrences,
                    });
                }
            };
            columns.push(directional);
            suffixed.push(false);
        } else {
            columns.push(name.resolved());
            suffixed.push(name.occurrence > 0);
        }
    }

    let mut seen: AHashSet<&str> = AHashSet::with_capacity(columns.len());
    for name in &columns {
        if !seen.insert(name.as_str()) {
            return Err(NormalizationError::Collision { name: name.clone() });
        }
    }

    // Every original column after the label column is one round
    let width = grid.len();
    let mut rows = Vec::with_capacity(raw.column_count().saturating_sub(1));
    for col in 1..raw.column_count() {
        let label = grid[0].get(col).unwrap_or(&EMPTY);
        let round = parse_round(label).ok_or_else(|| NormalizationError::NonNumericRound {
            row: col - 1,
            value: label.to_string(),
        })?;

        let mut row = Vec::with_capacity(width);
        row.push(CellValue::Number(round));
        for grid_row in grid.iter().skip(1) {
            row.push(grid_row.get(col).cloned().unwrap_or(CellValue::Empty));
        }
        rows.push(row);
    }

    let labels = columns.iter().map(|name| MetricLabel::parse(name)).collect();

    tracing::debug!(
        source = %raw.source(),
        rounds = rows.len(),
        metrics = columns.len() - 1,
        "normalized table"
    );

    Ok(NormalizedTable {
        source: raw.source().clone(),
        columns,
        labels,
        suffixed,
        rows,
    })
}
