//! Value labels and reference lines

use serde::Serialize;

use roundboard_frame::KeyValue;

use crate::series::Dash;

/// Text placed at a data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: KeyValue,
    pub y: f64,
    pub text: String,
}

impl Annotation {
    /// Create a new annotation
    pub fn new<S: Into<String>>(x: KeyValue, y: f64, text: S) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Horizontal line marking a target value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
    pub color: String,
    pub dash: Dash,
}

impl ReferenceLine {
    /// Line at `y` reaching half a round past the first and last round.
    ///
    /// Returns `None` when there are no rounds.
    ///
    /// # Examples
    /// ```
    /// use roundboard_chart::ReferenceLine;
    ///
    /// let line = ReferenceLine::spanning(&[0.0, 1.0, 2.0, 3.0, 4.0], 95.0).unwrap();
    /// assert_eq!((line.x0, line.x1, line.y), (-0.5, 4.5, 95.0));
    /// ```
    pub fn spanning(rounds: &[f64], y: f64) -> Option<Self> {
        let min = rounds.iter().copied().reduce(f64::min)?;
        let max = rounds.iter().copied().reduce(f64::max)?;
        Some(Self {
            x0: min - 0.5,
            x1: max + 0.5,
            y,
            color: "rgba(255,0,0,0.5)".to_string(),
            dash: Dash::DashDot,
        })
    }

    /// Use a different line color
    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = color.into();
        self
    }
}

/// Abbreviate a value for a data label.
///
/// Values are shown with one decimal in the largest unit (`M`, `k`, none)
/// whose rounded figure stays below 1000, so `999.96` reads `1.0k`. A label
/// that rounds to zero carries no sign. Formatting the number a label shows
/// gives the same label back.
///
/// # Examples
/// ```
/// use roundboard_chart::format_value;
///
/// assert_eq!(format_value(1_234_000.0), "1.2M");
/// assert_eq!(format_value(-1_500.0), "-1.5k");
/// assert_eq!(format_value(999.0), "999.0");
/// assert_eq!(format_value(999.96), "1.0k");
/// ```
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    let tenths = |scale: f64| (magnitude / scale * 10.0).round() / 10.0;

    let (shown, unit) = match tenths(1.0) {
        plain if plain < 1_000.0 => (plain, ""),
        _ => match tenths(1_000.0) {
            thousands if thousands < 1_000.0 => (thousands, "k"),
            _ => (tenths(1_000_000.0), "M"),
        },
    };

    let sign = if value < 0.0 && shown > 0.0 { "-" } else { "" };
    format!("{}{:.1}{}", sign, shown, unit)
}
