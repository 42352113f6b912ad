//! End-to-end page rendering from workbooks on disk

mod common;

use common::{finance_report, write_workbook, N, T};
use pretty_assertions::assert_eq;
use roundboard::prelude::*;
use roundboard::{KeyValue, Payload};

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(
        &dir.path().join("FinanceReport_r1.xlsx"),
        &[("Sheet1", finance_report())],
    );
    dir
}

#[test]
fn test_home_renders_from_finance_report() {
    let dir = data_dir();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let page = render(Page::Home, &config);

    assert_eq!(page.failures().count(), 0, "{:#?}", page.failures().collect::<Vec<_>>());

    let roi = page.panel("ROI over Rounds").and_then(|p| p.chart()).unwrap();
    assert_eq!(roi.traces[0].x, vec![KeyValue::Number(0.0), KeyValue::Number(1.0)]);
    assert_eq!(roi.traces[0].y, vec![25.0, 50.0]);
    assert_eq!(roi.annotations[1].text, "50.0");

    let breakdown = page.panel("Investment Breakdown").and_then(|p| p.chart()).unwrap();
    match &breakdown.payload {
        Some(Payload::Sankey(sankey)) => {
            let values: Vec<f64> = sankey.links.iter().map(|l| l.value).collect();
            assert_eq!(values, vec![4000.0, 5000.0, 2000.0, 1000.0]);
            assert_eq!(sankey.nodes[0], "Investment");
        }
        other => panic!("expected a sankey, got {:?}", other),
    }
}

#[test]
fn test_missing_workbook_fails_only_its_panels() {
    let dir = data_dir();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let page = render(Page::Purchasing, &config);

    // suppliers and main data are missing, the finance report is not
    let raw_costs = page
        .panel("Raw Material Costs (%) by Round (\u{2193})")
        .and_then(|p| p.chart())
        .unwrap();
    assert_eq!(raw_costs.traces[0].y, vec![25.0, 40.0]);
    assert_eq!(raw_costs.reference_lines[0].y, 32.0);

    let first_failure = page.failures().next().unwrap();
    assert_eq!(first_failure.title(), "Worldwide Suppliers");

    let order_lines = page.panel("Order lines by Rounds").unwrap();
    match order_lines {
        PanelOutcome::Failed { error, .. } => assert!(error.starts_with("file not found: ")),
        other => panic!("expected a failure, got {:?}", other),
    }
    assert!(!page.panel("Finance Table").unwrap().is_failed());
}

#[test]
fn test_operations_from_main_workbook() {
    let dir = data_dir();
    write_workbook(
        &dir.path().join("TFC_MAIN_DATA_R-2to1.xlsx"),
        &[(
            "Warehouse, Salesarea",
            vec![
                vec![
                    T("Round"),
                    T("Warehouse"),
                    T("Cube utilization (%)"),
                    T("Capacity"),
                    T("Usage"),
                    T("Orderlines per week"),
                    T("Pallets/Tanks per week"),
                    T("Flexible manpower (FTE)"),
                ],
                vec![
                    N(0.0),
                    T("Raw materials warehouse"),
                    N(0.5),
                    N(1000.0),
                    N(500.0),
                    N(10.0),
                    N(20.0),
                    N(1.0),
                ],
                vec![N(0.0), T("Tank yard"), N(0.75), N(40.0), N(30.0), N(5.0), N(6.0), N(0.5)],
                vec![
                    N(0.0),
                    T("Finished goods warehouse"),
                    N(0.25),
                    N(800.0),
                    N(200.0),
                    N(50.0),
                    N(60.0),
                    N(2.0),
                ],
            ],
        )],
    );
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let page = render(Page::Operations, &config);

    let cube = page
        .panel("Cube Utilization per Round for Each Warehouse")
        .and_then(|p| p.chart())
        .unwrap();
    let names: Vec<&str> = cube.traces.iter().filter_map(|t| t.name.as_deref()).collect();
    assert_eq!(names, vec!["Raw materials warehouse", "Tank yard", "Finished goods warehouse"]);

    let gauge = page
        .panel("Cube utilization (%) | Tank yard | Round 0")
        .and_then(|p| p.chart())
        .unwrap();
    match &gauge.payload {
        Some(Payload::Gauge(g)) => assert_eq!((g.value, g.max), (75.0, 100.0)),
        other => panic!("expected a gauge, got {:?}", other),
    }

    // no such sheet in the workbook
    match page.panel("Mixers Table").unwrap() {
        PanelOutcome::Failed { error, .. } => assert!(error.contains("Mixers"), "{}", error),
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[test]
fn test_finance_report_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finance.csv");
    std::fs::write(
        &path,
        ",Round 0,Round 1\nROI,0.1,0.2\nOperating profit,100,150\nGross margin,10,20\nInvestment,5,6\n",
    )
    .unwrap();

    let config = DashboardConfig::from_toml_str(&format!(
        "[inputs]\nfinance_report = {:?}\n",
        path.display().to_string()
    ))
    .unwrap();
    let page = render(Page::Home, &config);

    let profit = page
        .panel("Operating profit over Rounds")
        .and_then(|p| p.chart())
        .unwrap();
    assert_eq!(profit.traces[0].y, vec![100.0, 150.0]);
    // the sankey needs the investment parts
    assert!(page.panel("Investment Breakdown").unwrap().is_failed());
}

#[test]
fn test_directional_metrics_are_split() {
    let dir = data_dir();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let loader = WorkbookLoader::new();
    let raw = loader
        .load(&config.inputs.finance_report, None)
        .unwrap();
    let finance = normalize(&raw, &config.normalize_rules()).unwrap();

    let orders: Vec<&str> = finance.columns_matching("Administration costs - Orders");
    assert_eq!(
        orders,
        vec![
            "Operating profit - Indirect cost - Administration costs - Orders (Inbound)",
            "Operating profit - Indirect cost - Administration costs - Orders (Outbound)",
        ]
    );
}

#[test]
fn test_page_serializes_with_panel_status() {
    let dir = data_dir();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let page = render(Page::Finances, &config);

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["page"], "finances");
    let statuses: Vec<&str> = json["sections"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|s| s["panels"].as_array().unwrap())
        .map(|p| p["status"].as_str().unwrap())
        .collect();
    assert!(statuses.contains(&"rendered"));
    assert!(statuses.contains(&"failed"));
}

#[test]
fn test_each_sheet_is_read_once() {
    let dir = data_dir();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let loader = MemoizedLoader::new(WorkbookLoader::new());

    roundboard::render_with(Page::Finances, &config, &loader);
    assert_eq!(loader.cached(), 1);
}
