//! Finances: revenue, operating profit and investment breakdowns

use roundboard_chart::{Assembler, ChartSpec, ChartTemplate, ValueFormat};
use roundboard_frame::{aggregate, melt, Aggregation, NormalizedTable, ROUND};

use crate::error::DashboardResult;
use crate::panel::PanelBuilder;

use super::{kpi_line, raw_table, sum_by_round, PageContext};

/// Revenue charts: columns containing the first name, plus the second column
pub const REVENUE_LINES: [(&str, &str); 2] = [
    (
        "Contracted sales revenue - Contracted sales revenue",
        "Realized revenue - Contracted sales revenue",
    ),
    (
        "Bonus or penalties - Contracted sales revenue",
        "Realized revenue - Bonus or penalties",
    ),
];

/// Cost groups broken down under operating profit
pub const OPERATING_PROFIT_GROUPS: [&str; 4] =
    ["Overhead", "Distribution costs", "Handling costs", "Project costs"];

const METRIC: &str = "Metric";
const VALUE: &str = "Value";

pub(crate) fn build(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    panels.section("Revenue");
    for (keyword, extra) in REVENUE_LINES {
        let title = format!("{} over Rounds", keyword);
        panels.chart(&title, || {
            let finance = ctx.finance()?;
            let mut columns = finance.columns_matching(keyword);
            columns.push(extra);
            let template = ChartTemplate::line(title.as_str()).with_height(400);
            metric_lines(&finance, &columns, template)
        });
    }
    panels.chart("Realized revenue over Rounds", || {
        single_line(ctx, "Realized revenue")
    });

    panels.section("Operating profit");
    for keyword in OPERATING_PROFIT_GROUPS {
        let title = format!("Operating Profit for {}", keyword);
        panels.chart(&title, || {
            let finance = ctx.finance()?;
            let template = ChartTemplate::line(title.as_str()).with_y_title("Operating Profit");
            metric_lines(&finance, &finance.columns_matching(keyword), template)
        });
    }
    panels.chart("Operating profit over Rounds", || {
        single_line(ctx, "Operating profit")
    });

    panels.section("Investment");
    panels.chart("Investments", || {
        let finance = ctx.finance()?;
        let template = ChartTemplate::line("Investments").with_y_title("Investment");
        metric_lines(&finance, &finance.columns_matching("Investment"), template)
    });

    panels.section("Tables");
    raw_table(panels, "Finances Table", || ctx.raw_finance());
}

/// One line per metric column, named by the last segment of the metric
fn metric_lines(
    finance: &NormalizedTable,
    columns: &[&str],
    template: ChartTemplate,
) -> DashboardResult<ChartSpec> {
    let long = melt(finance, &[ROUND], columns, METRIC, VALUE)?;
    let series = aggregate(&long, &Aggregation::sum(&[METRIC, ROUND], VALUE))?;
    let mut chart = Assembler::assemble(&series, &template.split_by(METRIC))?;

    for trace in &mut chart.traces {
        let display = trace
            .name
            .as_deref()
            .and_then(|name| finance.label(name))
            .map(|label| label.display.clone());
        if display.is_some() {
            trace.name = display;
        }
    }
    Ok(chart)
}

fn single_line(ctx: &PageContext<'_>, metric: &str) -> DashboardResult<ChartSpec> {
    let finance = ctx.finance()?;
    let series = sum_by_round(&finance, metric)?;
    let template = kpi_line(&format!("{} over Rounds", metric), metric, ValueFormat::None)
        .with_height(300);
    Ok(Assembler::assemble(&series, &template)?)
}
