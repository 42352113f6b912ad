//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::grid::SparseGrid;
use roundboard_core::{CellAddress, CellValue, RawTable, SharedString, TableSource};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not an escape: emit what was consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

/// A sheet listed in workbook.xml, with its resolved part path
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// Cell being assembled between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    addr: CellAddress,
    cell_type: Option<String>,
    text: String,
    inline: bool,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// List the sheet names of a workbook file, in workbook order
    pub fn sheet_names_from_file<P: AsRef<Path>>(path: P) -> XlsxResult<Vec<String>> {
        let file = File::open(path)?;
        Self::sheet_names(BufReader::new(file))
    }

    /// List the sheet names of a workbook, in workbook order
    pub fn sheet_names<R: Read + Seek>(reader: R) -> XlsxResult<Vec<String>> {
        let mut archive = Self::open_archive(reader)?;
        let entries = Self::read_sheet_entries(&mut archive)?;
        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    /// Read one sheet of a workbook file.
    ///
    /// `sheet = None` selects the first sheet in workbook order.
    pub fn read_sheet_file<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> XlsxResult<RawTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read_sheet(BufReader::new(file), path, sheet)
    }

    /// Read one sheet from a reader; `file` is recorded as the table source
    pub fn read_sheet<R: Read + Seek>(
        reader: R,
        file: &Path,
        sheet: Option<&str>,
    ) -> XlsxResult<RawTable> {
        let mut archive = Self::open_archive(reader)?;
        let entries = Self::read_sheet_entries(&mut archive)?;

        let entry = match sheet {
            Some(name) => entries
                .iter()
                .find(|entry| entry.name == name)
                .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?,
            None => entries
                .first()
                .ok_or_else(|| XlsxError::NotAWorkbook("workbook has no sheets".into()))?,
        };

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let grid = Self::read_worksheet(&mut archive, &entry.path, &shared_strings)?;
        let rows = grid.into_rows()?;

        tracing::debug!(
            file = %file.display(),
            sheet = %entry.name,
            rows = rows.len(),
            "read xlsx sheet"
        );

        Ok(RawTable::from_grid(
            TableSource::new(file, entry.name.clone()),
            rows,
        ))
    }

    fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<zip::ZipArchive<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::NotAWorkbook(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Sheets from workbook.xml joined with their paths from the rels part
    fn read_sheet_entries<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetEntry>> {
        let sheet_info = Self::read_workbook_xml(archive)?;
        let sheet_paths = Self::read_workbook_rels(archive)?;

        Ok(sheet_info
            .into_iter()
            .filter_map(|(name, r_id)| {
                sheet_paths
                    .get(&r_id)
                    .map(|path| SheetEntry {
                        name,
                        path: path.clone(),
                    })
            })
            .collect())
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(SharedString::new(""));
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(SharedString::new(decode_excel_escapes(&current_string)));
                        current_string.clear();
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = Self::attr(&e, b"name");
                    let r_id = Self::attr(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = Self::attr(&e, b"Id");
                    let target = Self::attr(&e, b"Target");
                    let rel_type = Self::attr(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cell values of one worksheet part
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[SharedString],
    ) -> XlsxResult<SparseGrid> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut grid = SparseGrid::new();

        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        // Rows and cells may omit their `r` attribute; positions then follow on
        let mut current_row: u32 = 0;
        let mut next_row: u32 = 0;
        let mut next_col: u16 = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(next_row);
                        next_col = 0;
                    }
                    b"c" => {
                        in_cell = true;
                        cell = Self::pending_cell(&e, current_row, next_col)?;
                    }
                    b"v" if in_cell => {
                        in_value = true;
                    }
                    b"is" if in_cell => {
                        in_inline_str = true;
                    }
                    b"t" if in_inline_str => {
                        in_inline_text = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(next_row);
                        next_row = current_row + 1;
                    }
                    b"c" => {
                        // Empty cell element (style only)
                        let empty = Self::pending_cell(&e, current_row, next_col)?;
                        next_col = empty.addr.col.saturating_add(1);
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    cell.text.push_str(&e.unescape()?);
                    if in_inline_text {
                        cell.inline = true;
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        let pending = std::mem::take(&mut cell);
                        next_col = pending.addr.col.saturating_add(1);
                        let addr = pending.addr;
                        grid.insert(addr, Self::cell_value(pending, shared_strings)?);
                        in_cell = false;
                    }
                    b"v" => {
                        in_value = false;
                    }
                    b"is" => {
                        in_inline_str = false;
                    }
                    b"t" if in_inline_str => {
                        in_inline_text = false;
                    }
                    b"row" => {
                        next_row = current_row + 1;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Start a cell from its `<c>` attributes
    fn pending_cell(e: &BytesStart, row: u32, next_col: u16) -> XlsxResult<PendingCell> {
        let addr = match Self::attr(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::BadCell(format!("Invalid cell reference '{}': {}", cell_ref, err))
            })?,
            None => CellAddress::new(row, next_col),
        };

        Ok(PendingCell {
            addr,
            cell_type: Self::attr(e, b"t"),
            text: String::new(),
            inline: false,
        })
    }

    /// 0-based row index from a `<row r="...">` element
    fn row_index(e: &BytesStart) -> Option<u32> {
        Self::attr(e, b"r")
            .and_then(|s| s.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1))
    }

    /// Convert the collected text of a cell according to its type
    fn cell_value(cell: PendingCell, shared_strings: &[SharedString]) -> XlsxResult<CellValue> {
        if cell.inline {
            return Ok(CellValue::text(decode_excel_escapes(&cell.text)));
        }

        let value = cell.text.as_str();
        if value.is_empty() {
            return Ok(CellValue::Empty);
        }

        let cell_value = match cell.cell_type.as_deref() {
            // Shared string
            Some("s") => {
                let idx: usize = value.parse().map_err(|_| {
                    XlsxError::BadCell(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::BadCell(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::Text(s.clone())
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Error literal
            Some("e") => CellValue::Error(value.into()),

            // Formula string result
            Some("str") | Some("inlineStr") => CellValue::text(decode_excel_escapes(value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::text(value),
            },

            // ISO dates and unknown types are kept as text
            Some(_) => CellValue::text(value),
        };

        Ok(cell_value)
    }

    /// Unescaped value of one attribute
    fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == key)
            .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes_carriage_return() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_plain_underscores() {
        assert_eq!(decode_excel_escapes("AVG_order_size"), "AVG_order_size");
        assert_eq!(decode_excel_escapes("Trade_unit"), "Trade_unit");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        // Incomplete sequences should be left as-is
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d"); // missing trailing _
    }

    fn workbook_bytes(sheets: &[(&str, &str)], shared_strings: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"></Types>"#).unwrap();

            let mut workbook = String::from(r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
            let mut rels = String::from(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
            for (idx, (name, _)) in sheets.iter().enumerate() {
                workbook.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    idx + 1,
                    idx + 1
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    idx + 1,
                    idx + 1
                ));
            }
            workbook.push_str("</sheets></workbook>");
            rels.push_str("</Relationships>");

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook.as_bytes()).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();

            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            for (idx, (_, sheet_data)) in sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
                    .unwrap();
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                        sheet_data
                    )
                    .as_bytes(),
                )
                .unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_empty_sheet() {
        let bytes = workbook_bytes(&[("Sheet1", "")], None);
        let table = XlsxReader::read_sheet(Cursor::new(bytes), Path::new("mem.xlsx"), None).unwrap();

        assert_eq!(table.source().sheet, "Sheet1");
        assert_eq!(roundboard_core::Tabular::row_count(&table), 0);
    }

    #[test]
    fn test_read_typed_cells() {
        let sst = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Component</t></si><si><r><t>Pack</t></r><r><t>1L</t></r></si></sst>"#;
        let data = concat!(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Stock</t></is></c><c r="C1" t="inlineStr"><is><t>Ok</t></is></c></row>"#,
            r#"<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><f>SUM(1,2)</f><v>3</v></c><c r="C2" t="b"><v>1</v></c></row>"#,
            r#"<row r="3"><c r="A3" t="str"><v>Mango</v></c><c r="B3" t="e"><v>#DIV/0!</v></c><c r="C3" s="1"/></row>"#,
        );
        let bytes = workbook_bytes(&[("Component", data)], Some(sst));
        let table =
            XlsxReader::read_sheet(Cursor::new(bytes), Path::new("mem.xlsx"), Some("Component"))
                .unwrap();

        assert_eq!(roundboard_core::Tabular::columns(&table), &["Component", "Stock", "Ok"]);
        assert_eq!(table.rows()[0][0], CellValue::text("Pack1L"));
        assert_eq!(table.rows()[0][1], CellValue::Number(3.0));
        assert_eq!(table.rows()[0][2], CellValue::Boolean(true));
        assert_eq!(table.rows()[1][0], CellValue::text("Mango"));
        assert_eq!(table.rows()[1][1], CellValue::Error("#DIV/0!".into()));
        assert_eq!(table.rows()[1][2], CellValue::Empty);
    }

    #[test]
    fn test_cells_without_references_follow_on() {
        let data = r#"<row><c t="inlineStr"><is><t>a</t></is></c><c t="inlineStr"><is><t>b</t></is></c></row><row><c><v>1</v></c><c><v>2</v></c></row>"#;
        let bytes = workbook_bytes(&[("S", data)], None);
        let table = XlsxReader::read_sheet(Cursor::new(bytes), Path::new("mem.xlsx"), None).unwrap();

        assert_eq!(roundboard_core::Tabular::columns(&table), &["a", "b"]);
        assert_eq!(table.rows()[0], vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
    }

    #[test]
    fn test_sheet_selection_and_listing() {
        let first = r#"<row r="1"><c r="A1"><v>1</v></c></row>"#;
        let second = r#"<row r="1"><c r="A1"><v>2</v></c></row>"#;
        let bytes = workbook_bytes(&[("Customer", first), ("Product", second)], None);

        let names = XlsxReader::sheet_names(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(names, vec!["Customer".to_string(), "Product".to_string()]);

        let table =
            XlsxReader::read_sheet(Cursor::new(bytes.clone()), Path::new("mem.xlsx"), Some("Product"))
                .unwrap();
        assert_eq!(roundboard_core::Tabular::columns(&table), &["2"]);

        let missing =
            XlsxReader::read_sheet(Cursor::new(bytes), Path::new("mem.xlsx"), Some("Mixers"));
        assert!(matches!(missing, Err(XlsxError::SheetNotFound(name)) if name == "Mixers"));
    }

    #[test]
    fn test_not_a_workbook() {
        let result = XlsxReader::read_sheet(
            Cursor::new(b"Round,ROI\n1,0.2\n".to_vec()),
            Path::new("mem.xlsx"),
            None,
        );
        assert!(matches!(result, Err(XlsxError::Zip(_))));
    }
}
