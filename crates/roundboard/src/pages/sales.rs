//! Sales: headline KPIs, service levels, components, products and customers

use roundboard_chart::{Assembler, BarMode, ChartSpec, ChartTemplate, StaticSeries, ValueFormat};
use roundboard_frame::{aggregate, filter_eq, unique_values, Aggregation, KeyValue, ROUND};

use crate::error::DashboardResult;
use crate::lookup::{obsolete_products, round_palette, service_level};
use crate::panel::PanelBuilder;

use super::sheets::{CUSTOMER, CUSTOMER_PRODUCT, PRODUCT, SUPPLIER};
use super::{kpi_line, raw_table, sum_by_round, PageContext};

/// Per-customer metrics, one line per customer
pub const SERVICE_LEVEL_METRICS: [&str; 3] = [
    "Service level (order lines)",
    "Service level (pieces)",
    "Attained contract index",
];

const PROMOTION_SALES: &str = "Additional sales as a result of promotions (%)";

pub(crate) fn build(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    panels.section("Important KPI's");
    panels.chart("ROI(%)", || finance_line(ctx, "ROI", "ROI(%)"));
    panels.chart("Obsolete products (%)", || {
        static_kpi("Obsolete products (%)", &obsolete_products())
    });
    panels.chart("Gross margin (customer)", || {
        finance_line(ctx, "Gross margin", "Gross margin (customer)")
    });
    panels.chart("Service level outbound order lines (%)", || {
        static_kpi("Service level outbound order lines (%)", &service_level())
    });

    panels.section("Service Level");
    for metric in SERVICE_LEVEL_METRICS {
        panels.chart(metric, || customer_lines(ctx, metric));
    }

    panels.section("Components");
    panels.chart("Delivery reliability (%) by Component", || {
        bars_by_round(
            ctx,
            SUPPLIER,
            "Component",
            "Delivery reliability (%)",
            "Delivery reliability (%) by Component",
        )
    });
    panels.chart("Rejection (%) by Component", || {
        bars_by_round(
            ctx,
            SUPPLIER,
            "Component",
            "Rejection  (%)",
            "Rejection (%) by Component",
        )
    });

    panels.section("Products");
    panels.chart("Service level (%) by Product", || {
        bars_by_round(
            ctx,
            PRODUCT,
            "Product",
            "Service level (order lines)",
            "Service level (%) by Product",
        )
    });
    panels.chart("Obsoletes (%) by Product", || {
        bars_by_round(
            ctx,
            PRODUCT,
            "Product",
            "Obsoletes (%)",
            "Obsoletes (%) by Product",
        )
    });

    customers_section(ctx, panels);

    panels.section("Tables");
    raw_table(panels, "Customers Table", || ctx.main_sheet(CUSTOMER));
    raw_table(panels, "Supplier Table", || ctx.main_sheet(SUPPLIER));
    raw_table(panels, "Product Table", || ctx.main_sheet(PRODUCT));
    raw_table(panels, "Customer - Product Table", || ctx.main_sheet(CUSTOMER_PRODUCT));
}

fn finance_line(ctx: &PageContext<'_>, metric: &str, title: &str) -> DashboardResult<ChartSpec> {
    let finance = ctx.finance()?;
    let mut series = sum_by_round(&finance, metric)?;
    if metric == "ROI" {
        series = series.scaled(100.0);
    }
    let template = kpi_line(title, metric, ValueFormat::decimals(1)).with_height(300);
    Ok(Assembler::assemble(&series, &template)?)
}

fn static_kpi(title: &str, series: &StaticSeries) -> DashboardResult<ChartSpec> {
    let template = kpi_line(title, title, ValueFormat::decimals(1))
        .with_axes("Rounds", title)
        .with_height(300);
    Ok(Assembler::static_line(series, &template)?)
}

fn customer_lines(ctx: &PageContext<'_>, metric: &str) -> DashboardResult<ChartSpec> {
    let customers = ctx.main_sheet(CUSTOMER)?;
    let series = aggregate(&*customers, &Aggregation::sum(&["Customer", ROUND], metric))?;
    let template = ChartTemplate::line(metric)
        .with_axes(ROUND, metric)
        .split_by("Customer");
    Ok(Assembler::assemble(&series, &template)?)
}

/// Grouped bars per category, one trace per round
fn bars_by_round(
    ctx: &PageContext<'_>,
    sheet: &str,
    category: &str,
    metric: &str,
    title: &str,
) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(sheet)?;
    let series = aggregate(&*table, &Aggregation::mean(&[ROUND, category], metric))?.scaled(100.0);
    let template = round_bars(title, category, metric).with_format(ValueFormat::decimals(0));
    Ok(Assembler::assemble(&series, &template)?)
}

fn round_bars(title: &str, category: &str, metric: &str) -> ChartTemplate {
    ChartTemplate::bar(title)
        .with_axes(category, metric)
        .with_x_key(category)
        .split_by(ROUND)
        .with_palette(round_palette())
        .with_bar_mode(BarMode::Group)
}

fn customers_section(ctx: &PageContext<'_>, panels: &mut PanelBuilder) {
    const SECTION: &str = "Customers";

    let customers = match ctx
        .main_sheet(CUSTOMER)
        .and_then(|table| Ok(unique_values(&*table, "Customer")?))
    {
        Ok(customers) => customers,
        Err(err) => {
            panels.section(SECTION).failed(PROMOTION_SALES, err);
            return;
        }
    };

    for customer in customers {
        let title = format!("{} | {}", PROMOTION_SALES, customer);
        panels.tab(SECTION, customer.to_string());
        panels.chart(&title, || promotion_bars(ctx, &customer, &title));
    }
}

fn promotion_bars(
    ctx: &PageContext<'_>,
    customer: &KeyValue,
    title: &str,
) -> DashboardResult<ChartSpec> {
    let table = ctx.main_sheet(CUSTOMER_PRODUCT)?;
    let rows = filter_eq(&*table, "Customer", customer)?;
    let series = aggregate(
        &rows,
        &Aggregation::mean(&["Customer", "Product", ROUND], PROMOTION_SALES),
    )?
    .scaled(100.0);
    let template =
        round_bars(title, "Product", PROMOTION_SALES).with_format(ValueFormat::decimals(2));
    Ok(Assembler::assemble(&series, &template)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::{grid, Fixtures};
    use pretty_assertions::assert_eq;
    use roundboard_core::CellValue;

    fn n(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    #[test]
    fn test_component_bars_one_trace_per_round() {
        let fixtures = Fixtures::new().main(
            SUPPLIER,
            grid(
                &["Round", "Component", "Delivery reliability (%)"],
                vec![
                    vec![n(0.0), "PET".into(), n(0.75)],
                    vec![n(0.0), "PET".into(), n(0.25)],
                    vec![n(0.0), "Orange".into(), n(1.0)],
                    vec![n(1.0), "PET".into(), n(0.5)],
                ],
            ),
        );
        let ctx = PageContext::new(fixtures.config(), &fixtures);
        let chart = bars_by_round(
            &ctx,
            SUPPLIER,
            "Component",
            "Delivery reliability (%)",
            "Delivery reliability (%) by Component",
        )
        .unwrap();

        assert_eq!(chart.traces.len(), 2);
        assert_eq!(chart.traces[0].name.as_deref(), Some("0"));
        assert_eq!(
            chart.traces[0].x,
            vec![KeyValue::from("PET"), KeyValue::from("Orange")]
        );
        assert_eq!(chart.traces[0].y, vec![50.0, 100.0]);
        assert_eq!(chart.traces[0].color.as_deref(), Some("#8338ec"));
        assert_eq!(chart.traces[1].color.as_deref(), Some("#fd9e02"));
    }

    #[test]
    fn test_static_kpi_lines() {
        let chart = static_kpi("Obsolete products (%)", &obsolete_products()).unwrap();
        assert_eq!(chart.traces[0].y, vec![6.5, 13.7, 13.7, 13.7, 5.6, 2.7]);
        assert_eq!(chart.annotations[0].text, "6.5");
        assert_eq!(chart.height, Some(300));
    }

    #[test]
    fn test_customer_tabs_follow_customer_sheet() {
        let fixtures = Fixtures::new()
            .main(
                CUSTOMER,
                grid(
                    &["Round", "Customer"],
                    vec![
                        vec![n(0.0), "Dominick".into()],
                        vec![n(0.0), "Land Market".into()],
                    ],
                ),
            )
            .main(
                CUSTOMER_PRODUCT,
                grid(
                    &["Round", "Customer", "Product", PROMOTION_SALES],
                    vec![
                        vec![n(0.0), "Dominick".into(), "Fressie Orange PET".into(), n(0.05)],
                        vec![n(1.0), "Dominick".into(), "Fressie Orange PET".into(), n(0.1)],
                    ],
                ),
            );
        let ctx = PageContext::new(fixtures.config(), &fixtures);
        let mut panels = PanelBuilder::new("sales", "Sales");
        customers_section(&ctx, &mut panels);
        let page = panels.finish();

        let tabs: Vec<Option<&str>> = page.sections.iter().map(|s| s.tab.as_deref()).collect();
        assert_eq!(tabs, vec![Some("Dominick"), Some("Land Market")]);

        let dominick = page
            .panel("Additional sales as a result of promotions (%) | Dominick")
            .and_then(|p| p.chart())
            .unwrap();
        assert_eq!(dominick.traces.len(), 2);
        assert_eq!(dominick.traces[1].y, vec![10.0]);

        // no rows for this customer
        assert!(page
            .panel("Additional sales as a result of promotions (%) | Land Market")
            .unwrap()
            .is_failed());
    }
}
