//! Operations: warehousing, bottling and mixing

use roundboard_chart::{
    Assembler, BarMode, ChartSpec, ChartTemplate, Palette, StaticSeries, ValueFormat,
};
use roundboard_core::Tabular;
use roundboard_frame::{aggregate, filter_eq, melt, unique_values, Aggregation, KeyValue, ROUND};

use crate::error::DashboardResult;
use crate::lookup::{component_stock_weeks, product_stock_weeks};
use crate::panel::{format_rounded, PanelBuilder, PanelContent, Report};

use super::sheets::{BOTTLING_LINE, MIXERS, PRODUCT, PRODUCT_WAREHOUSE, WAREHOUSE_SALESAREA};
use super::{cell_number, cell_text, kpi_line, matching_rows, raw_table, PageContext};

const CUBE_UTILIZATION: &str = "Cube utilization (%)";

/// Warehouses shown per round, left to right
pub const WAREHOUSES: [&str; 3] =
    ["Raw materials warehouse", "Tank yard", "Finished goods warehouse"];

const USAGE_COLUMNS: [&str; 4] = [
    "Run time (%)",
    "Changeover time (%)",
    "Breakdown time (%)",
    "Unused capacity (%)",
];

const MAIN_LINE: &str = "Swiss Fill 1";
const SECOND_LINE: &str = "Cup Canon 1.3 TDX";
/// The second bottling line only ran in this round
const SECOND_LINE_ROUND: f64 = 3.0;

pub(crate) fn build(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    warehousing_section(ctx, panels);
    bottling_section(ctx, panels);
    stock_section(panels);

    panels.section("Tables");
    raw_table(panels, "Warehouse, Salesarea Table", || ctx.main_sheet(WAREHOUSE_SALESAREA));
    raw_table(panels, "Product - Warehouse Table", || ctx.main_sheet(PRODUCT_WAREHOUSE));
    raw_table(panels, "Mixers Table", || ctx.main_sheet(MIXERS));
    raw_table(panels, "Bottling line Table", || ctx.main_sheet(BOTTLING_LINE));
    raw_table(panels, "Product Table", || ctx.main_sheet(PRODUCT));
}

fn warehousing_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    const SECTION: &str = "Warehousing";

    panels.tab(SECTION, "Overview");
    panels.chart("Cube Utilization per Round for Each Warehouse", || {
        cube_utilization(ctx)
    });
    panels.chart("Total Demand vs Stock Value by Round", || demand_vs_stock(ctx));

    let rounds = match ctx
        .main_sheet(WAREHOUSE_SALESAREA)
        .and_then(|table| Ok(unique_values(&*table, ROUND)?))
    {
        Ok(rounds) => rounds,
        Err(err) => {
            panels.failed("Cube utilization (%)", err);
            return;
        }
    };

    for round in rounds {
        panels.tab(SECTION, format!("Round {}", round));
        for warehouse in WAREHOUSES {
            panels.chart(&format!("Cube utilization (%) | {} | Round {}", warehouse, round), || {
                warehouse_gauge(ctx, warehouse, &round)
            });
            panels.report(
                &format!("Other information | {} | Round {}", warehouse, round),
                || warehouse_facts(ctx, warehouse, &round),
            );
        }
    }
}

fn cube_utilization(ctx: &PageContext<'_>) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(WAREHOUSE_SALESAREA)?;
    let series = aggregate(&*table, &Aggregation::mean(&["Warehouse", ROUND], CUBE_UTILIZATION))?
        .scaled(100.0);
    let template = ChartTemplate::line("Cube Utilization per Round for Each Warehouse")
        .with_axes(ROUND, "Cube Utilization (%)")
        .split_by("Warehouse");
    Ok(Assembler::assemble(&series, &template)?)
}

fn demand_vs_stock(ctx: &PageContext<'_>) -> DashboardResult<ChartSpec> {
    const DEMAND: &str = "Demand per week (value)";
    const STOCK: &str = "Stock value";

    let table = ctx.main_sheet(PRODUCT_WAREHOUSE)?;
    let long = melt(&*table, &[ROUND], &[DEMAND, STOCK], "Measure", "Value")?;
    let series = aggregate(&long, &Aggregation::sum(&["Measure", ROUND], "Value"))?;
    let template = ChartTemplate::bar("Total Demand vs Stock Value by Round")
        .with_axes(ROUND, "Value")
        .split_by("Measure")
        .with_palette(Palette::from_pairs([(DEMAND, "#ef233c"), (STOCK, "#8d99ae")]))
        .with_bar_mode(BarMode::Group)
        .with_format(ValueFormat::Abbreviated);
    Ok(Assembler::assemble(&series, &template)?)
}

fn warehouse_gauge(
    ctx: &PageContext<'_>,
    warehouse: &str,
    round: &KeyValue,
) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(WAREHOUSE_SALESAREA)?;
    let rows = matching_rows(
        &*table,
        WAREHOUSE_SALESAREA,
        &[(ROUND, round.clone()), ("Warehouse", KeyValue::from(warehouse))],
    )?;
    let value = cell_number(&rows, 0, CUBE_UTILIZATION)? * 100.0;
    Ok(Assembler::gauge(warehouse, value, (0.0, 100.0), "%")?)
}

fn warehouse_facts(
    ctx: &PageContext<'_>,
    warehouse: &str,
    round: &KeyValue,
) -> DashboardResult<Report> {
    let table = ctx.main_sheet(WAREHOUSE_SALESAREA)?;
    let rows = matching_rows(
        &*table,
        WAREHOUSE_SALESAREA,
        &[(ROUND, round.clone()), ("Warehouse", KeyValue::from(warehouse))],
    )?;

    let rounded = |column: &str| cell_number(&rows, 0, column).map(|n| format_rounded(n, 2));
    Ok(Report::facts([
        ("Capacity", cell_text(&rows, 0, "Capacity")?),
        ("Usage", rounded("Usage")?),
        ("Orderlines/week", rounded("Orderlines per week")?),
        ("Pallets/Tanks/week", rounded("Pallets/Tanks per week")?),
        ("Flexible manpower", rounded("Flexible manpower (FTE)")?),
    ]))
}

fn bottling_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    const SECTION: &str = "Bottling and mixing";

    panels.section(SECTION);
    panels.chart("Mixer Average Lot Size per Round", || mixer_lot_size(ctx));

    let rounds = match ctx
        .main_sheet(BOTTLING_LINE)
        .and_then(|table| Ok(unique_values(&*table, ROUND)?))
    {
        Ok(rounds) => rounds,
        Err(err) => {
            panels.failed("Bottling line usage", err);
            return;
        }
    };

    for round in rounds {
        panels.tab(SECTION, format!("Round {}", round));
        let mut lines = vec![MAIN_LINE];
        if round == KeyValue::Number(SECOND_LINE_ROUND) {
            lines.push(SECOND_LINE);
        }
        for line in lines {
            panels.panel(&format!("{} Usage for Round {}", line, round), || {
                bottling_usage(ctx, line, &round)
            });
        }
    }
}

/// Pie of how a bottling line spent its time, or a notice when it did not run
fn bottling_usage(
    ctx: &PageContext<'_>,
    line: &str,
    round: &KeyValue,
) -> DashboardResult<PanelContent> {
    let table = ctx.main_sheet(BOTTLING_LINE)?;
    let rows = filter_eq(&*table, BOTTLING_LINE, &KeyValue::from(line))?;
    let rows = filter_eq(&rows, ROUND, round)?;
    if rows.row_count() == 0 {
        return Ok(PanelContent::Message(format!("No data found for Round {}", round)));
    }

    let values = USAGE_COLUMNS
        .iter()
        .map(|column| cell_number(&rows, 0, column).map(|n| n * 100.0))
        .collect::<DashboardResult<Vec<_>>>()?;
    let overtime = cell_number(&rows, 0, "Overtime (%)")? * 100.0;

    let chart = Assembler::pie(
        &format!("{} Usage for Round {}", line, round),
        USAGE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        values,
        Some(format!("- Overtime: {}%", format_rounded(overtime, 2))),
    )?;
    Ok(PanelContent::Chart(chart))
}

fn mixer_lot_size(ctx: &PageContext<'_>) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(MIXERS)?;
    let series = aggregate(&*table, &Aggregation::mean(&[ROUND], "Average lot size"))?;
    let template = ChartTemplate::bar("Mixer Average Lot Size per Round")
        .with_axes(ROUND, "Average Lot Size")
        .with_palette(Palette::single("#ff4d6d"))
        .with_bar_mode(BarMode::Group)
        .with_format(ValueFormat::Abbreviated);
    Ok(Assembler::assemble(&series, &template)?)
}

fn stock_section(panels: &mut PanelBuilder) {
    panels.section("Stock coverage");
    stock_line(panels, "Component stock (weeks)", component_stock_weeks());
    stock_line(panels, "Product stock (weeks)", product_stock_weeks());
}

fn stock_line(panels: &mut PanelBuilder, title: &str, series: StaticSeries) {
    panels.chart(title, || {
        let template = kpi_line(title, "Stock (weeks)", ValueFormat::decimals(1))
            .with_axes("Rounds", "Stock (weeks)")
            .with_height(300);
        Ok(Assembler::static_line(&series, &template)?)
    });
}
