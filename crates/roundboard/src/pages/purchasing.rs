//! Purchasing: suppliers per round, purchasing KPIs and component figures

use roundboard_chart::{
    Assembler, BarMode, ChartSpec, ChartTemplate, Dash, GeoPoint, Trace, TraceMode, ValueFormat,
};
use roundboard_core::{CellValue, Tabular};
use roundboard_frame::{
    aggregate, derive, derive_ratio, filter_eq, select, unique_values, Aggregation, KeyValue,
    TidyTable, ROUND,
};

use crate::error::DashboardResult;
use crate::lookup::{component_palette, supplier_report_color, QUANTITIES_PER_UNIT};
use crate::panel::{format_thousands, PanelBuilder, Report, ReportRow};

use super::sheets::{COMPONENT, SUPPLIER, SUPPLIER_COMPONENT};
use super::{cell_number, cell_text, kpi_line, raw_table, sum_by_round, PageContext};

const COMPONENT_KEY: &str = "Component";

pub(crate) fn build(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    suppliers_section(ctx, panels);
    kpi_section(ctx, panels);
    component_section(ctx, panels);

    panels.section("Tables");
    raw_table(panels, "Finance Table", || ctx.raw_finance());
    raw_table(panels, "Supplier Table", || ctx.main_sheet(SUPPLIER));
    raw_table(panels, "Component Table", || ctx.main_sheet(COMPONENT));
    raw_table(panels, "Supplier - Component Table", || {
        ctx.main_sheet(SUPPLIER_COMPONENT)
    });
}

fn suppliers_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    const SECTION: &str = "Worldwide Suppliers";

    let rounds = match ctx
        .suppliers()
        .and_then(|table| Ok(unique_values(&*table, ROUND)?))
    {
        Ok(rounds) => rounds,
        Err(err) => {
            panels.section(SECTION).failed(SECTION, err);
            return;
        }
    };

    for round in rounds {
        panels.tab(SECTION, format!("Round {}", round));
        panels.chart(&format!("Supplier map | Round {}", round), || {
            supplier_map(ctx, &round)
        });
        panels.report(&format!("Round supplier report | Round {}", round), || {
            supplier_report(ctx, &round)
        });
        panels.report("Quantities per Unit", || {
            Ok(Report::facts(
                QUANTITIES_PER_UNIT
                    .iter()
                    .map(|(label, value)| (*label, format_thousands(*value))),
            ))
        });
    }
}

fn supplier_map(ctx: &PageContext<'_>, round: &KeyValue) -> DashboardResult<ChartSpec> {
    let suppliers = ctx.suppliers()?;
    let rows = filter_eq(&*suppliers, ROUND, round)?;

    let mut points = Vec::with_capacity(rows.row_count());
    for row in 0..rows.row_count() {
        let hover = [
            ("Name", "Name"),
            ("Supply", "Supply"),
            ("Country", "Country"),
            ("Qlty", "Qlty"),
            ("Deliveries", "Deliveries"),
            ("AVG order size", "AVG_order_size"),
            ("TansP mode", "TransP_mode"),
            ("Trade unit", "Trade_unit"),
        ]
        .iter()
        .map(|(label, column)| {
            cell_text(&rows, row, column).map(|value| format!("{}: {}", label, value))
        })
        .collect::<DashboardResult<Vec<_>>>()?
        .join("\n");

        points.push(GeoPoint {
            category: cell_text(&rows, row, "Supply")?,
            lon: cell_number(&rows, row, "Longitude")?,
            lat: cell_number(&rows, row, "Latitude")?,
            text: hover,
        });
    }

    let hub = &ctx.config().hub;
    let hub = GeoPoint {
        category: hub.name.clone(),
        lon: hub.lon,
        lat: hub.lat,
        text: hub.name.clone(),
    };

    Ok(Assembler::scatter_geo(
        &format!("Worldwide Suppliers | Round {}", round),
        &hub,
        &points,
        &component_palette(),
    )?
    .with_height(500))
}

fn supplier_report(ctx: &PageContext<'_>, round: &KeyValue) -> DashboardResult<Report> {
    const COLUMNS: [&str; 5] = [
        "Supply",
        "AVG_order_size",
        "Deliveries",
        "Purchase value",
        "Transport costs",
    ];

    let suppliers = ctx.suppliers()?;
    let rows = filter_eq(&*suppliers, ROUND, round)?;

    let mut report = Report::new(
        ["Trade unit", "Order size", "Purchases", "Purchase value", "Transport costs"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    for unit in unique_values(&rows, "Trade_unit")? {
        let items = select(&filter_eq(&rows, "Trade_unit", &unit)?, &COLUMNS)?;
        let lines = (0..items.row_count()).map(|row| report_line(&items, row)).collect();
        report = report.with_section(unit.to_string(), lines);
    }
    Ok(report)
}

/// Supply label, then the remaining columns with numbers grouped by thousands
fn report_line(items: &TidyTable, row: usize) -> ReportRow {
    let supply = items.cell(row, 0).to_string();
    let cells = (1..items.column_count())
        .map(|col| {
            let cell = items.cell(row, col);
            cell.to_number()
                .map(format_thousands)
                .unwrap_or_else(|| cell.to_string())
        })
        .collect();

    let line = ReportRow::new(supply.as_str(), cells);
    match supplier_report_color(&supply) {
        Some(color) => line.with_color(color),
        None => line,
    }
}

fn kpi_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    let targets = &ctx.config().targets;
    panels.section("Important KPI's");

    panels.chart("Raw Material Costs (%) by Round (\u{2193})", || {
        let finance = ctx.finance()?;
        let costs = derive(&finance, "Raw material costs", |row| {
            let purchase = row.number("Gross margin - Cost of goods sold - Purchase value")?;
            let revenue = row.number("Realized revenue")?;
            Ok(CellValue::Number(purchase / revenue * 100.0))
        })?;
        let series = sum_by_round(&costs, "Raw material costs")?;
        let template = kpi_line(
            "Raw Material Costs (%) by Round (\u{2193})",
            "Raw Material Costs %",
            ValueFormat::percent(1),
        )
        .with_threshold(targets.raw_material_costs)
        .with_height(400);
        Ok(Assembler::assemble(&series, &template)?)
    });

    panels.chart("AVG Transport costs per order (%) by Round (\u{2193})", || {
        let table = ctx.main_sheet(SUPPLIER_COMPONENT)?;
        let with_share = derive_ratio(
            &*table,
            "Transport%",
            "Transport costs previous round",
            "Purchase value previous round",
        )?;
        let series =
            aggregate(&with_share, &Aggregation::mean(&[ROUND], "Transport%"))?.scaled(100.0);
        let template = kpi_line(
            "AVG Transport costs per order (%) by Round (\u{2193})",
            "AVG of transport %",
            ValueFormat::percent(2),
        )
        .with_threshold(targets.transport_costs)
        .with_height(400);
        Ok(Assembler::assemble(&series, &template)?)
    });

    panels.chart("AVG Delivery reliability (%) by Round (\u{2191})", || {
        component_average(
            ctx,
            "Delivery reliability (%)",
            kpi_line(
                "AVG Delivery reliability (%) by Round (\u{2191})",
                "AVG Delivery reliability %",
                ValueFormat::percent(2),
            )
            .with_threshold(targets.delivery_reliability),
        )
    });

    panels.chart("AVG Rejection (%) by Round (\u{2193})", || {
        component_average(
            ctx,
            "Rejection (%)",
            kpi_line(
                "AVG Rejection (%) by Round (\u{2193})",
                "AVG Rejection %",
                ValueFormat::percent(2),
            )
            .with_threshold(targets.rejection),
        )
    });
}

/// Sum per component and round, then the mean over components per round
fn component_average(
    ctx: &PageContext<'_>,
    metric: &str,
    template: ChartTemplate,
) -> DashboardResult<ChartSpec> {
    let components = ctx.main_sheet(COMPONENT)?;
    let per_component =
        aggregate(&*components, &Aggregation::sum(&[COMPONENT_KEY, ROUND], metric))?;
    let series = aggregate(
        &per_component.to_table(),
        &Aggregation::mean(&[ROUND], metric),
    )?
    .scaled(100.0);
    Ok(Assembler::assemble(&series, &template.with_height(400))?)
}

struct ComponentBars {
    sheet: &'static str,
    metric: &'static str,
    title: &'static str,
    mode: BarMode,
    format: ValueFormat,
    percent: bool,
    top_line: bool,
}

fn component_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    let charts = [
        ComponentBars {
            sheet: SUPPLIER,
            metric: "Order lines previous round",
            title: "Order lines by Rounds",
            mode: BarMode::Group,
            format: ValueFormat::decimals(1),
            percent: false,
            top_line: false,
        },
        ComponentBars {
            sheet: SUPPLIER,
            metric: "Purchase  value previous round",
            title: "Purchase value by Rounds",
            mode: BarMode::Group,
            format: ValueFormat::Abbreviated,
            percent: false,
            top_line: false,
        },
        ComponentBars {
            sheet: SUPPLIER,
            metric: "Transport costs previous round",
            title: "Transport costs by Rounds",
            mode: BarMode::Group,
            format: ValueFormat::Abbreviated,
            percent: false,
            top_line: false,
        },
        ComponentBars {
            sheet: SUPPLIER,
            metric: "Rejection  (%)",
            title: "Sum of Rejection(%) by Round and Component",
            mode: BarMode::Stack,
            format: ValueFormat::percent(2),
            percent: true,
            top_line: false,
        },
        ComponentBars {
            sheet: COMPONENT,
            metric: "Stock (pieces or liters)",
            title: "Sum of Stock (pieces or liters) by Round and Component",
            mode: BarMode::Stack,
            format: ValueFormat::Abbreviated,
            percent: false,
            top_line: true,
        },
        ComponentBars {
            sheet: COMPONENT,
            metric: "Stock (weeks)",
            title: "Sum of Stock (weeks) by Round and Component",
            mode: BarMode::Stack,
            format: ValueFormat::decimals(1),
            percent: false,
            top_line: false,
        },
    ];

    panels.section("Component KPI's per round");
    for spec in &charts {
        panels.chart(spec.title, || component_bars(ctx, spec));
    }
}

fn component_bars(ctx: &PageContext<'_>, spec: &ComponentBars) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(spec.sheet)?;
    let mut series = aggregate(&*table, &Aggregation::sum(&[COMPONENT_KEY, ROUND], spec.metric))?;
    if spec.percent {
        series = series.scaled(100.0);
    }

    let template = ChartTemplate::bar(spec.title)
        .with_axes(ROUND, spec.metric)
        .split_by(COMPONENT_KEY)
        .with_palette(component_palette())
        .with_bar_mode(spec.mode)
        .with_format(spec.format.clone());
    let mut chart = Assembler::assemble(&series, &template)?;

    if spec.top_line {
        let totals = sum_by_round(&series.to_table(), spec.metric)?;
        let (x, y) = totals
            .iter()
            .map(|(key, value)| (key[0].clone(), value))
            .unzip();
        chart.add_trace(
            Trace::new(TraceMode::Lines, x, y)
                .with_name("Top Line")
                .with_color("red")
                .with_dash(Dash::DashDot),
        );
    }

    Ok(chart)
}
