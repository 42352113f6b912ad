//! Legend placement

use serde::Serialize;

/// Where trace names are listed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend {
    pub position: LegendPosition,
    pub horizontal: bool,
}

impl Legend {
    /// Entries in one row above the plot; used for split series
    pub fn top_row() -> Self {
        Self {
            position: LegendPosition::Top,
            horizontal: true,
        }
    }

    /// Entries in one row below the plot; used under maps
    pub fn bottom_row() -> Self {
        Self {
            position: LegendPosition::Bottom,
            horizontal: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    Right,
    Top,
    Bottom,
}
