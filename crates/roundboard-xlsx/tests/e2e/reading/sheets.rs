//! Sheet listing and selection.

use crate::{temp_fixture_path, write_workbook, Fixture};
use roundboard_core::Tabular;
use roundboard_xlsx::{XlsxError, XlsxReader};

fn two_sheet_workbook(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = temp_fixture_path(dir, "Supplier report.xlsx");
    write_workbook(
        &path,
        &[
            (
                "Supplier - Component",
                vec![
                    vec![Fixture::Text("Round"), Fixture::Text("Supplier")],
                    vec![Fixture::Number(1.0), Fixture::Text("Acme")],
                ],
            ),
            (
                "Component",
                vec![
                    vec![Fixture::Text("Round"), Fixture::Text("Component")],
                    vec![Fixture::Number(1.0), Fixture::Text("PET")],
                    vec![Fixture::Number(2.0), Fixture::Text("Orange")],
                ],
            ),
        ],
    );
    path
}

#[test]
fn test_sheet_names_in_workbook_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_workbook(&dir);

    let names = XlsxReader::sheet_names_from_file(&path).unwrap();
    assert_eq!(names, vec!["Supplier - Component", "Component"]);
}

#[test]
fn test_default_sheet_is_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_workbook(&dir);

    let table = XlsxReader::read_sheet_file(&path, None).unwrap();
    assert_eq!(table.source().sheet, "Supplier - Component");
    assert_eq!(table.source().file, path);
    assert_eq!(table.columns(), &["Round", "Supplier"]);
}

#[test]
fn test_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_workbook(&dir);

    let table = XlsxReader::read_sheet_file(&path, Some("Component")).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_index("Component"), Some(1));
}

#[test]
fn test_missing_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_workbook(&dir);

    let err = XlsxReader::read_sheet_file(&path, Some("Mixers")).unwrap_err();
    assert!(matches!(err, XlsxError::SheetNotFound(ref name) if name == "Mixers"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_fixture_path(&dir, "nope.xlsx");

    let err = XlsxReader::read_sheet_file(&path, None).unwrap_err();
    assert!(matches!(err, XlsxError::Io(_)));
}
