//! Home: headline finance figures and the latest investment split

use roundboard_chart::{Assembler, ChartSpec, ValueFormat};
use roundboard_frame::{filter_eq, KeyValue, ROUND};

use crate::error::{DashboardError, DashboardResult};
use crate::panel::PanelBuilder;

use super::{kpi_line, raw_table, sum_by_round, PageContext};

/// Headline metrics, charted per round
pub const HEADLINE_METRICS: [&str; 4] = ["ROI", "Operating profit", "Gross margin", "Investment"];

/// Investment parts flowing out of the total
pub const INVESTMENT_PARTS: [&str; 4] = [
    "Investment - Investment - Fixed",
    "Investment - Investment - Stock",
    "Investment - Investment - Machines",
    "Investment - Investment - Payment terms",
];

pub(crate) fn build(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    panels.section("Finance");
    for metric in HEADLINE_METRICS {
        let title = format!("{} over Rounds", metric);
        panels.chart(&title, || headline(ctx, metric, &title));
    }

    panels.section("Current Investment Breakdown");
    panels.chart("Investment Breakdown", || investment_breakdown(ctx));

    panels.section("Finance Report data preview");
    raw_table(panels, "Finance Report", || ctx.raw_finance());
}

fn headline(ctx: &PageContext<'_>, metric: &str, title: &str) -> DashboardResult<ChartSpec> {
    let finance = ctx.finance()?;
    let mut series = sum_by_round(&finance, metric)?;
    if metric == "ROI" {
        series = series.scaled(100.0);
    }

    let template = kpi_line(title, metric, ValueFormat::Abbreviated).with_height(300);
    Ok(Assembler::assemble(&series, &template)?)
}

fn investment_breakdown(ctx: &PageContext<'_>) -> DashboardResult<ChartSpec> {
    let finance = ctx.finance()?;
    let latest = finance
        .rounds()
        .into_iter()
        .reduce(f64::max)
        .ok_or_else(|| DashboardError::no_matching_row("finance report", "any round"))?;
    let rows = filter_eq(&finance, ROUND, &KeyValue::Number(latest))?;

    let branches = INVESTMENT_PARTS
        .iter()
        .map(|part| -> DashboardResult<(String, f64)> {
            let total = sum_by_round(&rows, part)?.values().into_iter().sum::<f64>();
            Ok((part.to_string(), total))
        })
        .collect::<DashboardResult<Vec<_>>>()?;

    Ok(Assembler::sankey("Investment Breakdown", "Investment", &branches)?)
}
