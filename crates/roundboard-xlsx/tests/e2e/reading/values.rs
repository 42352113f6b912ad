//! Cell values and header handling.

use crate::{temp_fixture_path, write_workbook, Fixture};
use pretty_assertions::assert_eq;
use roundboard_core::{CellValue, Tabular};
use roundboard_xlsx::XlsxReader;

#[test]
fn test_round_columns_layout() {
    // Round-per-column layout: blank top-left header, metric labels down column A
    let dir = tempfile::tempdir().unwrap();
    let path = temp_fixture_path(&dir, "FinanceReport.xlsx");
    write_workbook(
        &path,
        &[(
            "Finances",
            vec![
                vec![
                    Fixture::Blank,
                    Fixture::Number(-2.0),
                    Fixture::Number(-1.0),
                    Fixture::Number(0.0),
                ],
                vec![
                    Fixture::Text("ROI"),
                    Fixture::Number(0.12),
                    Fixture::Number(0.15),
                    Fixture::Number(0.2),
                ],
                vec![
                    Fixture::Text("Operating profit"),
                    Fixture::Number(1500000.0),
                    Fixture::Number(-25000.0),
                    Fixture::Number(0.0),
                ],
            ],
        )],
    );

    let table = XlsxReader::read_sheet_file(&path, Some("Finances")).unwrap();

    assert_eq!(table.columns(), &["Unnamed: 0", "-2", "-1", "0"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 0), &CellValue::text("ROI"));
    assert_eq!(table.cell(1, 2), &CellValue::Number(-25000.0));
}

#[test]
fn test_duplicate_headers_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_fixture_path(&dir, "dup.xlsx");
    write_workbook(
        &path,
        &[(
            "Sheet1",
            vec![
                vec![
                    Fixture::Text("Round"),
                    Fixture::Text("Handling costs"),
                    Fixture::Text("Handling costs"),
                ],
                vec![Fixture::Number(1.0), Fixture::Number(10.0), Fixture::Number(20.0)],
            ],
        )],
    );

    let table = XlsxReader::read_sheet_file(&path, None).unwrap();
    assert_eq!(table.columns(), &["Round", "Handling costs", "Handling costs"]);
    assert_eq!(table.cell(0, 2), &CellValue::Number(20.0));
}

#[test]
fn test_gaps_are_empty_and_blank_rows_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_fixture_path(&dir, "gaps.xlsx");
    write_workbook(
        &path,
        &[(
            "Sheet1",
            vec![
                vec![Fixture::Text("Round"), Fixture::Text("Name"), Fixture::Text("Supply")],
                vec![Fixture::Number(1.0), Fixture::Blank, Fixture::Text("Mango & Açaí")],
                vec![Fixture::Blank, Fixture::Blank, Fixture::Blank],
                vec![Fixture::Number(2.0), Fixture::Text("Bolt"), Fixture::Blank],
            ],
        )],
    );

    let table = XlsxReader::read_sheet_file(&path, None).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 1), &CellValue::Empty);
    assert_eq!(table.cell(0, 2), &CellValue::text("Mango & Açaí"));
    assert_eq!(table.cell(1, 2), &CellValue::Empty);
}
