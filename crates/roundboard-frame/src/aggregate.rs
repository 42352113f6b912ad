//! Grouping and reduction

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ahash::AHashMap;
use serde::{Serialize, Serializer};

use roundboard_core::{CellValue, Tabular};

use crate::error::AggregateResult;
use crate::tidy::{numeric, require_column, TidyTable};

/// How the values of one group are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Sum,
    Mean,
}

/// What to group by and what to reduce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Grouping key columns, in order
    pub keys: Vec<String>,
    /// Column holding the values to reduce
    pub metric: String,
    /// Reduction applied per group
    pub reduction: Reduction,
}

impl Aggregation {
    /// Sum `metric` per distinct key tuple
    pub fn sum<K: AsRef<str>>(keys: &[K], metric: &str) -> Self {
        Self::new(keys, metric, Reduction::Sum)
    }

    /// Average `metric` per distinct key tuple
    pub fn mean<K: AsRef<str>>(keys: &[K], metric: &str) -> Self {
        Self::new(keys, metric, Reduction::Mean)
    }

    fn new<K: AsRef<str>>(keys: &[K], metric: &str, reduction: Reduction) -> Self {
        Self {
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            metric: metric.to_string(),
            reduction,
        }
    }
}

/// One component of a group key.
///
/// Numbers compare by value, so `-0.0` and `0.0` are the same group.
#[derive(Debug, Clone)]
pub enum KeyValue {
    Number(f64),
    Text(String),
}

impl KeyValue {
    /// Key for a cell; empty cells have none
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(KeyValue::Number(Self::canonical(*n))),
            CellValue::Text(s) => Some(KeyValue::Text(s.as_str().to_string())),
            other => Some(KeyValue::Text(other.to_string())),
        }
    }

    /// Numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            KeyValue::Number(n) => Some(*n),
            KeyValue::Text(_) => None,
        }
    }

    /// Back to a cell value
    pub fn to_cell(&self) -> CellValue {
        match self {
            KeyValue::Number(n) => CellValue::Number(*n),
            KeyValue::Text(s) => CellValue::text(s),
        }
    }

    fn canonical(n: f64) -> f64 {
        if n == 0.0 {
            0.0
        } else {
            n
        }
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (KeyValue::Number(a), KeyValue::Number(b)) => a == b,
            (KeyValue::Text(a), KeyValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for KeyValue {}

impl Hash for KeyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            KeyValue::Number(n) => {
                0u8.hash(state);
                Self::canonical(*n).to_bits().hash(state);
            }
            KeyValue::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyValue {
    /// Numbers first, by value, then text
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Number(a), KeyValue::Number(b)) => a.total_cmp(b),
            (KeyValue::Number(_), KeyValue::Text(_)) => Ordering::Less,
            (KeyValue::Text(_), KeyValue::Number(_)) => Ordering::Greater,
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Number(n) => write!(f, "{}", CellValue::Number(*n)),
            KeyValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for KeyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeyValue::Number(n) => serializer.serialize_f64(*n),
            KeyValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for KeyValue {
    fn from(n: f64) -> Self {
        KeyValue::Number(Self::canonical(n))
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Text(s.to_string())
    }
}

/// Reduced value per key tuple, in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    keys: Vec<String>,
    metric: String,
    reduction: Reduction,
    groups: Vec<(Vec<KeyValue>, f64)>,
}

impl AggregatedSeries {
    /// Build a series from already reduced groups
    pub fn from_groups(
        keys: Vec<String>,
        metric: impl Into<String>,
        reduction: Reduction,
        groups: Vec<(Vec<KeyValue>, f64)>,
    ) -> Self {
        Self {
            keys,
            metric: metric.into(),
            reduction,
            groups,
        }
    }

    /// Key column names
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Reduced metric column
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Reduction that produced the values
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no row produced a group
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups with their values
    pub fn iter(&self) -> impl Iterator<Item = (&[KeyValue], f64)> {
        self.groups.iter().map(|(key, value)| (key.as_slice(), *value))
    }

    /// Value of one group
    pub fn get(&self, key: &[KeyValue]) -> Option<f64> {
        self.groups
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, value)| *value)
    }

    /// Position of a key column
    pub fn key_position(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == name)
    }

    /// All values, in group order
    pub fn values(&self) -> Vec<f64> {
        self.groups.iter().map(|(_, value)| *value).collect()
    }

    /// Multiply every value, e.g. by 100 for fractions shown as percent
    pub fn scaled(mut self, factor: f64) -> Self {
        for (_, value) in &mut self.groups {
            *value *= factor;
        }
        self
    }

    /// Groups ordered by key tuple
    pub fn sorted_by_key(mut self) -> Self {
        self.groups.sort_by(|(a, _), (b, _)| a.cmp(b));
        self
    }

    /// Back to rows: the key columns followed by the metric column
    pub fn to_table(&self) -> TidyTable {
        let mut columns = self.keys.clone();
        columns.push(self.metric.clone());

        let rows = self
            .groups
            .iter()
            .map(|(key, value)| {
                key.iter()
                    .map(KeyValue::to_cell)
                    .chain(std::iter::once(CellValue::Number(*value)))
                    .collect()
            })
            .collect();

        TidyTable::new(columns, rows)
    }
}

/// Group `table` by the key columns and reduce the metric column.
///
/// Rows with an empty key cell belong to no group. Every metric cell of the
/// remaining rows must be numeric.
///
/// # Examples
/// ```
/// use roundboard_core::{RawTable, TableSource};
/// use roundboard_frame::{aggregate, Aggregation};
///
/// let table = RawTable::from_grid(
///     TableSource::new("data.xlsx", "Component"),
///     vec![
///         vec!["Round".into(), "Rejection (%)".into()],
///         vec![1.into(), 0.2.into()],
///         vec![1.into(), 0.4.into()],
///     ],
/// );
/// let series = aggregate(&table, &Aggregation::mean(&["Round"], "Rejection (%)"))
///     .unwrap()
///     .scaled(100.0);
/// assert!((series.values()[0] - 30.0).abs() < 1e-9);
/// ```
pub fn aggregate<T: Tabular + ?Sized>(
    table: &T,
    spec: &Aggregation,
) -> AggregateResult<AggregatedSeries> {
    let key_cols = spec
        .keys
        .iter()
        .map(|key| require_column(table, key))
        .collect::<AggregateResult<Vec<_>>>()?;
    let metric_col = require_column(table, &spec.metric)?;

    let mut index: AHashMap<Vec<KeyValue>, usize> = AHashMap::new();
    let mut groups: Vec<(Vec<KeyValue>, f64, usize)> = Vec::new();

    for row in 0..table.row_count() {
        let key: Option<Vec<KeyValue>> = key_cols
            .iter()
            .map(|&col| KeyValue::from_cell(table.cell(row, col)))
            .collect();
        let Some(key) = key else {
            continue;
        };

        let value = numeric(table, row, metric_col)?;

        match index.get(&key) {
            Some(&idx) => {
                groups[idx].1 += value;
                groups[idx].2 += 1;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, value, 1));
            }
        }
    }

    let groups = groups
        .into_iter()
        .map(|(key, sum, count)| {
            let value = match spec.reduction {
                Reduction::Sum => sum,
                Reduction::Mean => sum / count as f64,
            };
            (key, value)
        })
        .collect();

    Ok(AggregatedSeries::from_groups(
        spec.keys.clone(),
        spec.metric.clone(),
        spec.reduction,
        groups,
    ))
}
