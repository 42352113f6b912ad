//! Metric labels
//!
//! Finance report metrics are named hierarchically, e.g.
//! `Operating profit - Indirect cost - Handling costs - Orders`. The name is
//! split once during normalization so pages never re-parse column names.

use std::fmt;

use serde::Serialize;

const SEPARATOR: &str = " - ";

/// Parsed form of a hierarchical metric name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetricLabel {
    /// Full column name
    pub name: String,
    /// First segment
    pub category: String,
    /// Second segment, present when the name has at least three segments
    pub subcategory: Option<String>,
    /// Last segment, used as legend text
    pub display: String,
}

impl MetricLabel {
    /// Parse a column name.
    ///
    /// # Examples
    /// ```
    /// use roundboard_frame::MetricLabel;
    ///
    /// let label = MetricLabel::parse("Realized revenue - Contracted sales revenue");
    /// assert_eq!(label.category, "Realized revenue");
    /// assert_eq!(label.subcategory, None);
    /// assert_eq!(label.display, "Contracted sales revenue");
    /// ```
    pub fn parse(name: &str) -> Self {
        let segments: Vec<&str> = name.split(SEPARATOR).map(str::trim).collect();
        let category = segments.first().copied().unwrap_or_default();
        let display = segments.last().copied().unwrap_or_default();
        let subcategory = if segments.len() >= 3 {
            Some(segments[1].to_string())
        } else {
            None
        };

        Self {
            name: name.to_string(),
            category: category.to_string(),
            subcategory,
            display: display.to_string(),
        }
    }

    /// Number of ` - ` separated segments
    pub fn depth(&self) -> usize {
        self.name.split(SEPARATOR).count()
    }
}

impl fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subcategory {
            Some(sub) => write!(f, "{} / {} / {}", self.category, sub, self.display),
            None if self.category != self.display => {
                write!(f, "{} / {}", self.category, self.display)
            }
            None => f.write_str(&self.display),
        }
    }
}
