//! Static lookup tables
//!
//! Display colors per category and the few series that are entered by hand
//! because no sheet carries them.

use roundboard_chart::{Palette, StaticSeries};

/// Component colors
pub const COMPONENT_COLORS: [(&str, &str); 10] = [
    ("Pack 1L", "#6a4c93"),
    ("PET", "#1982c4"),
    ("Orange", "#fb8500"),
    ("Mango", "#8ac926"),
    ("Vitamin C", "#ff595e"),
    ("Açaí", "#c792ea"),
    ("Bag", "#d6eaf8"),
    ("Capsule", "#ffc0cb"),
    ("Capsule (orange)", "#ffc000"),
    ("Capsule (red)", "#c70039"),
];

/// Round colors, keyed by round number
pub const ROUND_COLORS: [(i32, &str); 9] = [
    (-2, "#8ac926"),
    (-1, "#06d6a0"),
    (0, "#8338ec"),
    (1, "#fd9e02"),
    (2, "#126782"),
    (3, "#8ecae6"),
    (4, "#219ebc"),
    (5, "#126782"),
    (6, "#8ac926"),
];

/// Supply label colors in the round supplier report
pub const SUPPLIER_REPORT_COLORS: [(&str, &str); 6] = [
    ("Pack1L", "rgb(135, 110, 168)"),
    ("PET", "rgb(92, 154, 207)"),
    ("Orange", "rgb(245, 158, 52)"),
    ("Mango", "rgb(165, 213, 89)"),
    ("Vitamin C", "rgb(249, 121, 125)"),
    ("Açaí", "rgb(199, 146, 234)"),
];

/// Content per trade unit, shown next to the supplier report
pub const QUANTITIES_PER_UNIT: [(&str, f64); 4] = [
    ("Content drum (liter)", 250.0),
    ("Content IBC (liter)", 1_000.0),
    ("Content tank truck (liter)", 30_000.0),
    ("Pallets per FTL", 30.0),
];

/// Line color of single-trace KPI charts
pub const KPI_LINE_COLOR: &str = "orange";

const STATIC_ROUNDS: [f64; 9] = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

/// Palette of [`COMPONENT_COLORS`]
pub fn component_palette() -> Palette {
    Palette::from_pairs(COMPONENT_COLORS)
}

/// Palette of [`ROUND_COLORS`]
pub fn round_palette() -> Palette {
    Palette::from_pairs(ROUND_COLORS.iter().map(|(round, color)| (round.to_string(), *color)))
}

/// Same color for every trace
pub fn kpi_palette() -> Palette {
    Palette::single(KPI_LINE_COLOR)
}

/// Color of a supply label in the supplier report
pub fn supplier_report_color(supply: &str) -> Option<&'static str> {
    SUPPLIER_REPORT_COLORS
        .iter()
        .find(|(name, _)| *name == supply)
        .map(|(_, color)| *color)
}

fn static_series(values: &[f64]) -> StaticSeries {
    StaticSeries::new(STATIC_ROUNDS.to_vec(), values.to_vec())
}

/// Obsolete products (%) per round
pub fn obsolete_products() -> StaticSeries {
    static_series(&[6.5, 13.7, 13.7, 13.7, 5.6, 2.7])
}

/// Service level of outbound order lines (%) per round
pub fn service_level() -> StaticSeries {
    static_series(&[85.5, 87.1, 87.1, 87.1, 95.7, 87.8])
}

/// Component stock in weeks per round
pub fn component_stock_weeks() -> StaticSeries {
    static_series(&[3.6, 4.4, 4.4, 4.4, 4.3, 4.9])
}

/// Product stock in weeks per round
pub fn product_stock_weeks() -> StaticSeries {
    static_series(&[2.4, 3.3, 3.3, 3.3, 3.1, 1.9])
}
