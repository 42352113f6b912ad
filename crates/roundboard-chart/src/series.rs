//! Trace types

use serde::Serialize;

use roundboard_frame::KeyValue;

/// How a trace is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    #[default]
    LinesMarkers,
    Lines,
    Markers,
    Bars,
    PieSlices,
}

/// Line dash pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    #[default]
    Solid,
    Dash,
    DashDot,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Legend name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Categories or positions (longitudes on maps, labels on pies)
    pub x: Vec<KeyValue>,
    /// Values (latitudes on maps)
    pub y: Vec<f64>,
    /// Drawing mode
    pub mode: TraceMode,
    /// Color name or CSS color, passed through as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line dash pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<Dash>,
    /// Hover text per point
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    /// Whether the trace gets a legend entry
    pub show_legend: bool,
}

impl Trace {
    /// Create a new trace
    pub fn new(mode: TraceMode, x: Vec<KeyValue>, y: Vec<f64>) -> Self {
        Self {
            name: None,
            x,
            y,
            mode,
            color: None,
            dash: None,
            text: Vec::new(),
            show_legend: true,
        }
    }

    /// Set trace name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set trace color
    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set dash pattern
    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Set hover text
    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self
    }

    /// Hide from the legend
    pub fn hidden_from_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// True when the trace has no points
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}
