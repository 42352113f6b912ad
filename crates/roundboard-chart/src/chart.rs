//! Chart types

use serde::Serialize;

use crate::annotation::{Annotation, ReferenceLine};
use crate::axis::Axis;
use crate::legend::Legend;
use crate::series::Trace;

/// Chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Gauge,
    Pie,
    Sankey,
    ScatterGeo,
}

/// How bars of several traces share a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    #[default]
    Group,
    Stack,
}

/// Gauge indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub suffix: String,
}

/// Flow from one node to another
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// Sankey nodes and links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sankey {
    pub nodes: Vec<String>,
    pub links: Vec<SankeyLink>,
}

/// Data that only some chart kinds carry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Gauge(Gauge),
    Sankey(Sankey),
}

/// Chart definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Chart kind
    pub kind: ChartKind,
    /// Chart title
    pub title: String,
    /// Plotted traces
    pub traces: Vec<Trace>,
    /// Category axis (X)
    pub x_axis: Axis,
    /// Value axis (Y)
    pub y_axis: Axis,
    /// Per-point value labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Horizontal target lines
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
    /// Free text shown beside the chart
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Legend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    /// Bar arrangement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    /// Height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Kind-specific data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl ChartSpec {
    /// Create an empty chart
    pub fn new<S: Into<String>>(kind: ChartKind, title: S) -> Self {
        Self {
            kind,
            title: title.into(),
            traces: Vec::new(),
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            annotations: Vec::new(),
            reference_lines: Vec::new(),
            notes: Vec::new(),
            legend: None,
            bar_mode: None,
            height: None,
            payload: None,
        }
    }

    /// Set the chart height
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Add a trace
    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Add a trace, builder style
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Add a note
    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }
}
