//! Chart assembly
//!
//! [`Assembler`] turns aggregated series and literal values into
//! [`ChartSpec`]s. Every chart on every page goes through one of its
//! constructors.

use ahash::AHashMap;

use roundboard_frame::{AggregatedSeries, KeyValue};

use crate::annotation::{Annotation, ReferenceLine};
use crate::axis::Axis;
use crate::chart::{ChartKind, ChartSpec, Gauge, Payload, Sankey, SankeyLink};
use crate::error::{ChartError, ChartResult};
use crate::legend::Legend;
use crate::series::{Dash, Trace, TraceMode};
use crate::template::{ChartTemplate, Palette, ValueFormat};

/// Hand-entered values per round
#[derive(Debug, Clone, PartialEq)]
pub struct StaticSeries {
    pub rounds: Vec<f64>,
    pub values: Vec<f64>,
}

impl StaticSeries {
    /// Pair rounds with values; extra entries on either side are dropped
    pub fn new(rounds: Vec<f64>, values: Vec<f64>) -> Self {
        let len = rounds.len().min(values.len());
        let mut rounds = rounds;
        let mut values = values;
        rounds.truncate(len);
        values.truncate(len);
        Self { rounds, values }
    }
}

/// A located point on a map
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    /// Legend group, e.g. the supplied component
    pub category: String,
    pub lon: f64,
    pub lat: f64,
    /// Hover text
    pub text: String,
}

/// Builds chart specifications
pub struct Assembler;

impl Assembler {
    /// Chart a series according to a template.
    ///
    /// The template's `x_key` (and `split_key`, when set) must be key
    /// columns of the series. Traces appear in first-seen order of the split
    /// key; points keep the order of the series.
    pub fn assemble(series: &AggregatedSeries, template: &ChartTemplate) -> ChartResult<ChartSpec> {
        let title = &template.title;
        if series.is_empty() {
            return Err(ChartError::EmptySeries(title.clone()));
        }

        let x_pos = Self::key_position(series, &template.x_key, title)?;
        let split_pos = template
            .split_key
            .as_deref()
            .map(|key| Self::key_position(series, key, title))
            .transpose()?;

        let mut groups: Vec<(Option<KeyValue>, Vec<KeyValue>, Vec<f64>)> = Vec::new();
        let mut index: AHashMap<Option<KeyValue>, usize> = AHashMap::new();

        for (key, value) in series.iter() {
            Self::check_finite(value, title)?;
            let split = split_pos.map(|pos| key[pos].clone());
            let idx = *index.entry(split.clone()).or_insert_with(|| {
                groups.push((split, Vec::new(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(key[x_pos].clone());
            groups[idx].2.push(value);
        }

        let mode = match template.kind {
            ChartKind::Bar => TraceMode::Bars,
            _ => TraceMode::LinesMarkers,
        };

        let mut chart = ChartSpec::new(template.kind, title.clone());
        let mut xs: Vec<KeyValue> = Vec::new();

        for (split, x, y) in groups {
            for (xv, yv) in x.iter().zip(&y) {
                if let Some(text) = template.value_format.apply(*yv) {
                    chart.annotations.push(Annotation::new(xv.clone(), *yv, text));
                }
            }
            xs.extend(x.iter().cloned());

            let mut trace = Trace::new(mode, x, y);
            match split {
                Some(name) => {
                    if let Some(color) = template.palette.color(&name) {
                        trace = trace.with_color(color);
                    }
                    trace = trace.with_name(name.to_string());
                }
                None => {
                    if let Some(color) = template.palette.color(&KeyValue::from(title.as_str())) {
                        trace = trace.with_color(color);
                    }
                }
            }
            chart.add_trace(trace);
        }

        xs.sort();
        xs.dedup();

        if let Some(y) = template.threshold {
            let rounds = xs
                .iter()
                .map(KeyValue::as_number)
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| ChartError::MissingField {
                    chart: title.clone(),
                    field: format!("numeric {}", template.x_key),
                })?;
            chart
                .reference_lines
                .extend(ReferenceLine::spanning(&rounds, y));
        }

        chart.x_axis = Axis::titled(template.x_title.as_deref());
        if template.kind == ChartKind::Line && xs.iter().all(|x| x.as_number().is_some()) {
            chart.x_axis = chart.x_axis.with_ticks(xs);
        }
        chart.y_axis = Axis::titled(template.y_title.as_deref());
        chart.legend = split_pos.map(|_| Legend::top_row());
        chart.bar_mode = template.bar_mode.filter(|_| template.kind == ChartKind::Bar);
        chart.height = template.height;

        Ok(chart)
    }

    /// Gauge showing one value within a range
    pub fn gauge(
        title: &str,
        value: f64,
        range: (f64, f64),
        suffix: &str,
    ) -> ChartResult<ChartSpec> {
        Self::check_finite(value, title)?;
        let mut chart = ChartSpec::new(ChartKind::Gauge, title);
        chart.payload = Some(Payload::Gauge(Gauge {
            value,
            min: range.0,
            max: range.1,
            suffix: suffix.to_string(),
        }));
        Ok(chart)
    }

    /// Pie chart of labelled shares, with an optional note beside it
    pub fn pie(
        title: &str,
        labels: Vec<String>,
        values: Vec<f64>,
        note: Option<String>,
    ) -> ChartResult<ChartSpec> {
        if values.is_empty() {
            return Err(ChartError::EmptySeries(title.to_string()));
        }
        if labels.len() != values.len() {
            return Err(ChartError::InvalidValue {
                chart: title.to_string(),
                detail: format!("{} labels for {} values", labels.len(), values.len()),
            });
        }
        for value in &values {
            Self::check_finite(*value, title)?;
        }

        let x = labels.into_iter().map(KeyValue::Text).collect();
        let mut chart = ChartSpec::new(ChartKind::Pie, title)
            .with_trace(Trace::new(TraceMode::PieSlices, x, values));
        chart.notes.extend(note);
        Ok(chart)
    }

    /// Sankey with one root node flowing into each branch
    pub fn sankey(title: &str, root: &str, branches: &[(String, f64)]) -> ChartResult<ChartSpec> {
        if branches.is_empty() {
            return Err(ChartError::EmptySeries(title.to_string()));
        }

        let mut nodes = vec![root.to_string()];
        let mut links = Vec::with_capacity(branches.len());
        for (idx, (label, value)) in branches.iter().enumerate() {
            Self::check_finite(*value, title)?;
            nodes.push(label.clone());
            links.push(SankeyLink {
                source: 0,
                target: idx + 1,
                value: *value,
            });
        }

        let mut chart = ChartSpec::new(ChartKind::Sankey, title);
        chart.payload = Some(Payload::Sankey(Sankey { nodes, links }));
        Ok(chart)
    }

    /// Map of points with a dashed route from each point to the hub.
    ///
    /// Each category gets a legend entry on its first point only.
    pub fn scatter_geo(
        title: &str,
        hub: &GeoPoint,
        points: &[GeoPoint],
        palette: &Palette,
    ) -> ChartResult<ChartSpec> {
        for point in std::iter::once(hub).chain(points) {
            Self::check_finite(point.lon, title)?;
            Self::check_finite(point.lat, title)?;
        }

        let mut chart = ChartSpec::new(ChartKind::ScatterGeo, title).with_trace(
            Trace::new(
                TraceMode::Markers,
                vec![KeyValue::Number(hub.lon)],
                vec![hub.lat],
            )
            .with_name(hub.category.clone())
            .with_color("blue")
            .with_text(vec![hub.text.clone()]),
        );

        for point in points {
            chart.add_trace(
                Trace::new(
                    TraceMode::Lines,
                    vec![KeyValue::Number(point.lon), KeyValue::Number(hub.lon)],
                    vec![point.lat, hub.lat],
                )
                .with_color("rgba(249, 190, 71, 0.5)")
                .with_dash(Dash::DashDot)
                .hidden_from_legend(),
            );
        }

        let mut seen: Vec<&str> = Vec::new();
        for point in points {
            let category = KeyValue::from(point.category.as_str());
            let mut marker = Trace::new(
                TraceMode::Markers,
                vec![KeyValue::Number(point.lon)],
                vec![point.lat],
            )
            .with_name(point.category.clone())
            .with_color(palette.color(&category).unwrap_or("grey"))
            .with_text(vec![point.text.clone()]);

            if seen.contains(&point.category.as_str()) {
                marker = marker.hidden_from_legend();
            } else {
                seen.push(&point.category);
            }
            chart.add_trace(marker);
        }

        chart.legend = Some(Legend::bottom_row());
        Ok(chart)
    }

    /// Line chart of hand-entered values
    pub fn static_line(series: &StaticSeries, template: &ChartTemplate) -> ChartResult<ChartSpec> {
        let title = &template.title;
        if series.values.is_empty() {
            return Err(ChartError::EmptySeries(title.clone()));
        }

        let x: Vec<KeyValue> = series.rounds.iter().map(|r| KeyValue::from(*r)).collect();
        let mut chart = ChartSpec::new(ChartKind::Line, title.clone());

        for (xv, yv) in x.iter().zip(&series.values) {
            Self::check_finite(*yv, title)?;
            if let Some(text) = template.value_format.apply(*yv) {
                chart.annotations.push(Annotation::new(xv.clone(), *yv, text));
            }
        }

        if let Some(y) = template.threshold {
            chart
                .reference_lines
                .extend(ReferenceLine::spanning(&series.rounds, y));
        }

        let mut trace = Trace::new(TraceMode::LinesMarkers, x.clone(), series.values.clone());
        if let Some(color) = template.palette.color(&KeyValue::from(title.as_str())) {
            trace = trace.with_color(color);
        }
        chart.add_trace(trace);

        chart.x_axis = Axis::titled(template.x_title.as_deref()).with_ticks(x);
        chart.y_axis = Axis::titled(template.y_title.as_deref());
        chart.height = template.height;
        Ok(chart)
    }

    fn key_position(series: &AggregatedSeries, key: &str, chart: &str) -> ChartResult<usize> {
        series
            .key_position(key)
            .ok_or_else(|| ChartError::MissingField {
                chart: chart.to_string(),
                field: key.to_string(),
            })
    }

    fn check_finite(value: f64, chart: &str) -> ChartResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ChartError::InvalidValue {
                chart: chart.to_string(),
                detail: format!("non-finite value {}", value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::BarMode;
    use pretty_assertions::assert_eq;
    use roundboard_frame::Reduction;

    fn by_round(values: &[(f64, f64)]) -> AggregatedSeries {
        AggregatedSeries::from_groups(
            vec!["Round".into()],
            "ROI",
            Reduction::Sum,
            values
                .iter()
                .map(|(r, v)| (vec![KeyValue::Number(*r)], *v))
                .collect(),
        )
    }

    fn by_component_round() -> AggregatedSeries {
        AggregatedSeries::from_groups(
            vec!["Component".into(), "Round".into()],
            "Stock",
            Reduction::Sum,
            vec![
                (vec!["PET".into(), KeyValue::Number(0.0)], 10.0),
                (vec!["Orange".into(), KeyValue::Number(0.0)], 20.0),
                (vec!["PET".into(), KeyValue::Number(1.0)], 30.0),
            ],
        )
    }

    #[test]
    fn test_line_with_threshold() {
        let series = by_round(&[(0.0, 90.0), (1.0, 96.0), (2.0, 94.0), (3.0, 97.0), (4.0, 95.5)]);
        let template = ChartTemplate::line("AVG Delivery reliability (%) by Round")
            .with_format(ValueFormat::percent(2))
            .with_threshold(95.0);

        let chart = Assembler::assemble(&series, &template).unwrap();

        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.traces.len(), 1);
        assert_eq!(chart.annotations.len(), 5);
        assert_eq!(chart.annotations[1].text, "96.00%");
        let line = &chart.reference_lines[0];
        assert_eq!((line.x0, line.x1, line.y), (-0.5, 4.5, 95.0));
        assert_eq!(chart.x_axis.ticks.len(), 5);
    }

    #[test]
    fn test_abbreviated_labels() {
        let series = by_round(&[(-2.0, 1_234_000.0), (-1.0, -1_500.0), (0.0, 999.0)]);
        let template = ChartTemplate::line("Operating profit over Rounds")
            .with_format(ValueFormat::Abbreviated);

        let chart = Assembler::assemble(&series, &template).unwrap();
        let labels: Vec<&str> = chart.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(labels, vec!["1.2M", "-1.5k", "999.0"]);
    }

    #[test]
    fn test_split_traces_and_colors() {
        let template = ChartTemplate::bar("Sum of Stock")
            .split_by("Component")
            .with_bar_mode(BarMode::Stack)
            .with_palette(Palette::from_pairs([("PET", "#1982c4")]));

        let chart = Assembler::assemble(&by_component_round(), &template).unwrap();

        assert_eq!(chart.traces.len(), 2);
        assert_eq!(chart.traces[0].name.as_deref(), Some("PET"));
        assert_eq!(chart.traces[0].color.as_deref(), Some("#1982c4"));
        assert_eq!(chart.traces[0].y, vec![10.0, 30.0]);
        assert_eq!(chart.traces[1].color, None);
        assert_eq!(chart.traces[0].mode, TraceMode::Bars);
        assert_eq!(chart.bar_mode, Some(BarMode::Stack));
        assert!(chart.legend.is_some());
    }

    #[test]
    fn test_missing_split_key() {
        let template = ChartTemplate::bar("x").split_by("Customer");
        let err = Assembler::assemble(&by_round(&[(0.0, 1.0)]), &template).unwrap_err();
        assert_eq!(
            err,
            ChartError::MissingField {
                chart: "x".into(),
                field: "Customer".into()
            }
        );
    }

    #[test]
    fn test_threshold_needs_numeric_x() {
        let template = ChartTemplate::bar("Rejection by Component")
            .with_x_key("Component")
            .with_threshold(2.0);
        let err = Assembler::assemble(&by_component_round(), &template).unwrap_err();
        assert!(matches!(err, ChartError::MissingField { .. }));
    }

    #[test]
    fn test_empty_and_invalid() {
        let template = ChartTemplate::line("ROI");
        assert_eq!(
            Assembler::assemble(&by_round(&[]), &template),
            Err(ChartError::EmptySeries("ROI".into()))
        );
        assert!(matches!(
            Assembler::assemble(&by_round(&[(0.0, f64::NAN)]), &template),
            Err(ChartError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_gauge() {
        let chart = Assembler::gauge("Tank yard", 72.5, (0.0, 100.0), "%").unwrap();
        assert_eq!(
            chart.payload,
            Some(Payload::Gauge(Gauge {
                value: 72.5,
                min: 0.0,
                max: 100.0,
                suffix: "%".into()
            }))
        );
        assert!(Assembler::gauge("Tank yard", f64::INFINITY, (0.0, 100.0), "%").is_err());
    }

    #[test]
    fn test_pie_with_note() {
        let chart = Assembler::pie(
            "Swiss Fill 1 Usage for Round 0",
            vec!["Run time (%)".into(), "Unused capacity (%)".into()],
            vec![80.0, 20.0],
            Some("- Overtime: 5%".into()),
        )
        .unwrap();
        assert_eq!(chart.notes, vec!["- Overtime: 5%".to_string()]);
        assert_eq!(chart.traces[0].mode, TraceMode::PieSlices);

        let err = Assembler::pie("p", vec!["a".into()], vec![1.0, 2.0], None).unwrap_err();
        assert!(matches!(err, ChartError::InvalidValue { .. }));
    }

    #[test]
    fn test_sankey_links_from_root() {
        let chart = Assembler::sankey(
            "Investment Breakdown",
            "Investment",
            &[("Fixed".into(), 100.0), ("Stock".into(), 50.0)],
        )
        .unwrap();

        match chart.payload {
            Some(Payload::Sankey(sankey)) => {
                assert_eq!(sankey.nodes, vec!["Investment", "Fixed", "Stock"]);
                assert_eq!(sankey.links[1].source, 0);
                assert_eq!(sankey.links[1].target, 2);
                assert_eq!(sankey.links[1].value, 50.0);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_scatter_geo_legend_once_per_category() {
        let hub = GeoPoint {
            category: "Netherlands".into(),
            lon: 4.8952,
            lat: 52.3676,
            text: "Netherlands".into(),
        };
        let point = |category: &str, lon: f64| GeoPoint {
            category: category.into(),
            lon,
            lat: 10.0,
            text: String::new(),
        };
        let points = vec![point("PET", 1.0), point("Orange", 2.0), point("PET", 3.0)];

        let chart = Assembler::scatter_geo(
            "Round 0",
            &hub,
            &points,
            &Palette::from_pairs([("PET", "#1982c4")]),
        )
        .unwrap();

        // hub + one route per point + one marker per point
        assert_eq!(chart.traces.len(), 7);
        let routes: Vec<&Trace> =
            chart.traces.iter().filter(|t| t.mode == TraceMode::Lines).collect();
        assert_eq!(routes.len(), 3);
        assert!(routes.iter().all(|t| t.dash == Some(Dash::DashDot) && !t.show_legend));
        assert_eq!(routes[0].y, vec![10.0, 52.3676]);

        let markers = &chart.traces[4..];
        let legend: Vec<bool> = markers.iter().map(|t| t.show_legend).collect();
        assert_eq!(legend, vec![true, true, false]);
        assert_eq!(markers[1].color.as_deref(), Some("grey"));
    }

    #[test]
    fn test_static_line() {
        let series = StaticSeries::new(
            vec![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0],
            vec![6.5, 13.7, 13.7, 13.7, 5.6, 2.7],
        );
        let template =
            ChartTemplate::line("Obsolete products (%)").with_format(ValueFormat::decimals(1));

        let chart = Assembler::static_line(&series, &template).unwrap();
        assert_eq!(chart.traces[0].len(), 6);
        assert_eq!(chart.annotations[0].text, "6.5");
    }

    #[test]
    fn test_serializes() {
        let chart = Assembler::assemble(
            &by_round(&[(0.0, 1.0)]),
            &ChartTemplate::line("ROI").with_format(ValueFormat::Abbreviated),
        )
        .unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "line");
        assert_eq!(json["traces"][0]["x"][0], 0.0);
        assert_eq!(json["annotations"][0]["text"], "1.0");
    }
}
