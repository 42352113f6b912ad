//! Chart templates
//!
//! A [`ChartTemplate`] holds everything about a chart that is not data:
//! kind, titles, which key goes on the x axis, how traces are split, how
//! points are labelled and which target line to draw.

use ahash::AHashMap;
use serde::Serialize;

use roundboard_frame::KeyValue;

use crate::annotation::format_value;
use crate::chart::{BarMode, ChartKind};

/// How data labels are written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `1.2M`, `-1.5k`, `999.0`
    Abbreviated,
    /// Fixed decimals followed by a suffix, e.g. `32.5%`
    Fixed { decimals: usize, suffix: String },
    /// No labels
    #[default]
    None,
}

impl ValueFormat {
    /// Fixed decimals with no suffix
    pub fn decimals(decimals: usize) -> Self {
        ValueFormat::Fixed {
            decimals,
            suffix: String::new(),
        }
    }

    /// Fixed decimals followed by `%`
    pub fn percent(decimals: usize) -> Self {
        ValueFormat::Fixed {
            decimals,
            suffix: "%".to_string(),
        }
    }

    /// Label text for a value, `None` when labels are off
    pub fn apply(&self, value: f64) -> Option<String> {
        match self {
            ValueFormat::Abbreviated => Some(format_value(value)),
            ValueFormat::Fixed { decimals, suffix } => {
                Some(format!("{:.*}{}", decimals, value, suffix))
            }
            ValueFormat::None => None,
        }
    }
}

/// Colors per trace key; a single-color palette colors every key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: AHashMap<String, String>,
    fallback: Option<String>,
}

impl Palette {
    /// Palette that gives every trace the same color
    pub fn single<S: Into<String>>(color: S) -> Self {
        Self {
            colors: AHashMap::new(),
            fallback: Some(color.into()),
        }
    }

    /// Palette from `(key, color)` pairs
    pub fn from_pairs<I, K, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<String>,
    {
        Self {
            colors: pairs
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
            fallback: None,
        }
    }

    /// Color for a key; numeric keys are looked up by their display form
    pub fn color(&self, key: &KeyValue) -> Option<&str> {
        self.colors
            .get(&key.to_string())
            .or(self.fallback.as_ref())
            .map(String::as_str)
    }
}

/// Everything about a chart except its data
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTemplate {
    pub kind: ChartKind,
    pub title: String,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    /// Series key plotted on the x axis
    pub x_key: String,
    /// Series key whose values become separate traces
    pub split_key: Option<String>,
    pub value_format: ValueFormat,
    /// Target value drawn as a horizontal line
    pub threshold: Option<f64>,
    pub palette: Palette,
    pub bar_mode: Option<BarMode>,
    pub height: Option<u32>,
}

impl ChartTemplate {
    /// Line chart over rounds
    pub fn line<S: Into<String>>(title: S) -> Self {
        Self::new(ChartKind::Line, title)
    }

    /// Grouped bar chart over rounds
    pub fn bar<S: Into<String>>(title: S) -> Self {
        Self {
            bar_mode: Some(BarMode::Group),
            ..Self::new(ChartKind::Bar, title)
        }
    }

    fn new<S: Into<String>>(kind: ChartKind, title: S) -> Self {
        Self {
            kind,
            title: title.into(),
            x_title: Some("Round".to_string()),
            y_title: None,
            x_key: "Round".to_string(),
            split_key: None,
            value_format: ValueFormat::None,
            threshold: None,
            palette: Palette::default(),
            bar_mode: None,
            height: None,
        }
    }

    /// Set the axis titles
    pub fn with_axes<X: Into<String>, Y: Into<String>>(mut self, x_title: X, y_title: Y) -> Self {
        self.x_title = Some(x_title.into());
        self.y_title = Some(y_title.into());
        self
    }

    /// Set the y axis title
    pub fn with_y_title<S: Into<String>>(mut self, y_title: S) -> Self {
        self.y_title = Some(y_title.into());
        self
    }

    /// Plot a different key on the x axis
    pub fn with_x_key<S: Into<String>>(mut self, key: S) -> Self {
        self.x_key = key.into();
        self
    }

    /// One trace per distinct value of `key`
    pub fn split_by<S: Into<String>>(mut self, key: S) -> Self {
        self.split_key = Some(key.into());
        self
    }

    /// Set label formatting
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// Draw a target line at `y`
    pub fn with_threshold(mut self, y: f64) -> Self {
        self.threshold = Some(y);
        self
    }

    /// Set trace colors
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set bar arrangement
    pub fn with_bar_mode(mut self, mode: BarMode) -> Self {
        self.bar_mode = Some(mode);
        self
    }

    /// Set chart height
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}
