//! Axes

use serde::Serialize;

use roundboard_frame::KeyValue;

/// Title and tick placement of one axis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// One tick per round on round-indexed line charts; empty lets the
    /// front end choose
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ticks: Vec<KeyValue>,
}

impl Axis {
    pub fn titled(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            ticks: Vec::new(),
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<KeyValue>) -> Self {
        self.ticks = ticks;
        self
    }
}
