//! # roundboard-chart
//!
//! Declarative chart specifications for roundboard.
//!
//! Charts are plain data: a [`ChartSpec`] describes traces, axes, labels
//! and target lines, and serializes to JSON for whatever front end draws it.
//!
//! ```
//! use roundboard_chart::{Assembler, ChartTemplate, ValueFormat};
//! use roundboard_frame::{AggregatedSeries, KeyValue, Reduction};
//!
//! let series = AggregatedSeries::from_groups(
//!     vec!["Round".to_string()],
//!     "ROI",
//!     Reduction::Sum,
//!     vec![(vec![KeyValue::Number(0.0)], 12.5), (vec![KeyValue::Number(1.0)], 14.0)],
//! );
//! let template = ChartTemplate::line("ROI over Rounds").with_format(ValueFormat::decimals(1));
//! let chart = Assembler::assemble(&series, &template).unwrap();
//!
//! assert_eq!(chart.traces[0].y, vec![12.5, 14.0]);
//! assert_eq!(chart.annotations[1].text, "14.0");
//! ```

mod annotation;
mod assemble;
mod axis;
mod chart;
mod error;
mod legend;
mod series;
mod template;

pub use annotation::{format_value, Annotation, ReferenceLine};
pub use assemble::{Assembler, GeoPoint, StaticSeries};
pub use axis::Axis;
pub use chart::{BarMode, ChartKind, ChartSpec, Gauge, Payload, Sankey, SankeyLink};
pub use error::{ChartError, ChartResult};
pub use legend::{Legend, LegendPosition};
pub use series::{Dash, Trace, TraceMode};
pub use template::{ChartTemplate, Palette, ValueFormat};
