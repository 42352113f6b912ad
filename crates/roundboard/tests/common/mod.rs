//! Workbook fixtures written on the fly

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// One cell of a fixture sheet
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    Blank,
}

pub use Cell::{Blank, Number as N, Text as T};

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut col = col;
    loop {
        letters.push((b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    format!("{}{}", letters.into_iter().collect::<String>(), row + 1)
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference(r, c),
                    escape(text)
                )),
                Cell::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference(r, c), n))
                }
                Cell::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Write a minimal `.xlsx` with the given sheets
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
    )
    .unwrap();

    let mut workbook = String::from(
        r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (idx, (name, _)) in sheets.iter().enumerate() {
        let id = idx + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            id,
            id
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            id, id
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(rels.as_bytes()).unwrap();
    for (idx, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
            .unwrap();
        zip.write_all(sheet_xml(rows).as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Finance report with rounds 0 and 1 as columns
pub fn finance_report() -> Vec<Vec<Cell>> {
    vec![
        vec![Blank, T("Round 0"), T("Round 1")],
        vec![T("ROI"), N(0.25), N(0.5)],
        vec![T("Operating profit"), N(1200.0), N(1500.0)],
        vec![T("Gross margin"), N(4000.0), N(4200.0)],
        vec![T("Investment"), N(10000.0), N(12000.0)],
        vec![T("Investment - Investment - Fixed"), N(4000.0), N(4000.0)],
        vec![T("Investment - Investment - Stock"), N(3000.0), N(5000.0)],
        vec![T("Investment - Investment - Machines"), N(2000.0), N(2000.0)],
        vec![T("Investment - Investment - Payment terms"), N(1000.0), N(1000.0)],
        vec![T("Realized revenue"), N(20000.0), N(25000.0)],
        vec![
            T("Gross margin - Cost of goods sold - Purchase value"),
            N(5000.0),
            N(10000.0),
        ],
        vec![
            T("Operating profit - Indirect cost - Administration costs - Orders"),
            N(-100.0),
            N(-120.0),
        ],
        vec![
            T("Operating profit - Indirect cost - Administration costs - Orders"),
            N(-50.0),
            N(-60.0),
        ],
    ]
}
