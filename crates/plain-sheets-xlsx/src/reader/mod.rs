//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::attributes::Attributes;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Location, XlsxError, XlsxResult};
use crate::parts::{
    worksheet_part, CONTENT_TYPES_PART, SHARED_STRINGS_PART, WORKBOOK_PART, WORKBOOK_RELS_PART,
};
use crate::path::resolve_target;
use crate::shared_strings::{decode_excel_escapes, read_shared_strings_xml, SharedStringTable};
use plain_sheets_core::{Cell, Decimal, Workbook, Worksheet};

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    ///
    /// The path is recorded as the workbook's source path.
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => XlsxError::FileNotFound(path.to_path_buf()),
            _ => XlsxError::Io(e),
        })?;
        let mut workbook = Self::read_package(BufReader::new(file), Some(path))?;
        workbook.set_source_path(path);
        Ok(workbook)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        Self::read_package(reader, None)
    }

    fn read_package<R: Read + Seek>(reader: R, source: Option<&Path>) -> XlsxResult<Workbook> {
        let mut archive = ZipArchive::new(reader)?;
        let source = source.map(Path::to_path_buf);

        if read_part(&mut archive, CONTENT_TYPES_PART)?.is_none() {
            return Err(XlsxError::MissingPart(CONTENT_TYPES_PART.to_string()));
        }

        let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(data) => {
                SharedStringTable::from_entries(read_shared_strings_xml(data.as_slice())?)
            }
            None => {
                log::debug!("no {} part, using an empty table", SHARED_STRINGS_PART);
                SharedStringTable::new()
            }
        };

        let workbook_data = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| XlsxError::MissingPart(WORKBOOK_PART.to_string()))?;
        let workbook_location = Location::part(source.clone(), WORKBOOK_PART);
        let entries = read_workbook_xml(workbook_data.as_slice(), &workbook_location)?;

        let targets = match read_part(&mut archive, WORKBOOK_RELS_PART)? {
            Some(data) => read_workbook_rels(data.as_slice())?,
            None => HashMap::new(),
        };

        log::debug!(
            "reading {} sheet(s), {} shared string(s)",
            entries.len(),
            shared_strings.unique_count()
        );

        let mut worksheets = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let part = entry.part_name(&targets, &workbook_location)?;
            let location = Location::part(source.clone(), part.as_str())
                .with_sheet(index, entry.name.as_str());

            let data = read_part(&mut archive, &part)?
                .ok_or_else(|| location.error(format!("worksheet part {} not found", part)))?;

            log::trace!("reading sheet \"{}\" from {}", entry.name, part);
            let mut sheet = Worksheet::new(entry.name);
            read_worksheet_xml(data.as_slice(), &mut sheet, &shared_strings, &location)?;
            worksheets.push(sheet);
        }

        Ok(Workbook::from_worksheets(worksheets)?)
    }
}

/// Read a zip entry fully; `None` when the entry does not exist
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> XlsxResult<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// One `<sheet>` entry of `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq)]
struct SheetEntry {
    name: String,
    sheet_id: Option<usize>,
    rel_id: Option<String>,
}

impl SheetEntry {
    /// Part name holding this sheet: the relationship target when there is
    /// one, `xl/worksheets/sheet{sheetId}.xml` otherwise
    fn part_name(
        &self,
        targets: &HashMap<String, String>,
        location: &Location,
    ) -> XlsxResult<String> {
        if let Some(target) = self.rel_id.as_ref().and_then(|id| targets.get(id)) {
            return Ok(target.clone());
        }

        let sheet_id = self.sheet_id.ok_or_else(|| {
            location.error(format!(
                "sheet \"{}\" has no relationship target and no sheetId",
                self.name
            ))
        })?;
        let part = worksheet_part(sheet_id);
        log::warn!(
            "sheet \"{}\" has no relationship target, falling back to {}",
            self.name,
            part
        );
        Ok(part)
    }
}

fn attribute(attributes: Attributes<'_>, local_name: &[u8]) -> XlsxResult<Option<String>> {
    for attr in attributes {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local_name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse the `sheets/sheet` list of `xl/workbook.xml`
fn read_workbook_xml(data: &[u8], location: &Location) -> XlsxResult<Vec<SheetEntry>> {
    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut saw_sheets = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sheets" => saw_sheets = true,
                b"sheet" if saw_sheets => {
                    let mut name = None;
                    let mut sheet_id = None;
                    let mut rel_id = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?;
                        match attr.key.local_name().as_ref() {
                            b"name" => name = Some(value.into_owned()),
                            b"sheetId" => sheet_id = value.trim().parse::<usize>().ok(),
                            b"id" => rel_id = Some(value.into_owned()),
                            _ => {}
                        }
                    }
                    let name = name.ok_or_else(|| {
                        location.error(format!("sheet {} has no name", entries.len() + 1))
                    })?;
                    entries.push(SheetEntry {
                        name,
                        sheet_id,
                        rel_id,
                    });
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_sheets {
        return Err(location.error("sheet list not found"));
    }
    if entries.is_empty() {
        return Err(location.error("workbook has no sheets"));
    }
    Ok(entries)
}

/// Map worksheet relationship ids of `xl/_rels/workbook.xml.rels` to part names
fn read_workbook_rels(data: &[u8]) -> XlsxResult<HashMap<String, String>> {
    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut rel_type = None;
                let mut target = None;
                let mut external = false;
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value == "External",
                        _ => {}
                    }
                }

                if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                    if rel_type.ends_with("/worksheet") && !external {
                        targets.insert(id, resolve_target(WORKBOOK_PART, &target));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// A `<c>` element being read
#[derive(Debug, Default)]
struct PendingCell {
    reference: String,
    cell_type: Option<String>,
    value: Option<String>,
}

/// Fill `sheet` from a worksheet part
fn read_worksheet_xml(
    data: &[u8],
    sheet: &mut Worksheet,
    shared_strings: &SharedStringTable,
    location: &Location,
) -> XlsxResult<()> {
    let mut xml_reader = Reader::from_reader(data);
    // Inline string text keeps its whitespace.
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut in_sheet_data = false;
    let mut current_row: Option<String> = None;
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_inline_text = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = true,
                b"row" if in_sheet_data => {
                    let row = row_reference(e.attributes(), location)?;
                    sheet.insert_row(&row);
                    current_row = Some(row);
                }
                b"c" if in_sheet_data => {
                    let row = current_row
                        .as_deref()
                        .ok_or_else(|| location.error("cell outside of a row"))?;
                    let row_location = location.with_row(Some(row));
                    let mut cell = PendingCell::default();
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.local_name().as_ref() {
                            b"r" => cell.reference = attr.unescape_value()?.into_owned(),
                            b"t" => cell.cell_type = Some(attr.unescape_value()?.into_owned()),
                            _ => {}
                        }
                    }
                    if cell.reference.is_empty() {
                        return Err(row_location.error("cell has no reference"));
                    }
                    pending = Some(cell);
                }
                b"v" if pending.is_some() => {
                    in_value = true;
                    start_value(&mut pending);
                }
                b"is" if pending.is_some() => {
                    in_inline = true;
                    start_value(&mut pending);
                }
                b"rPh" if in_inline => in_phonetic = true,
                b"t" if in_inline && !in_phonetic => in_inline_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" if in_sheet_data => {
                    let row = row_reference(e.attributes(), location)?;
                    sheet.insert_row(&row);
                }
                b"c" if in_sheet_data => {
                    let row = current_row
                        .as_deref()
                        .ok_or_else(|| location.error("cell outside of a row"))?;
                    let reference = attribute(e.attributes(), b"r")?
                        .filter(|r| !r.is_empty())
                        .ok_or_else(|| location.with_row(Some(row)).error("cell has no reference"))?;
                    sheet.set_cell(row, &reference, Cell::new());
                }
                b"v" if pending.is_some() => start_value(&mut pending),
                _ => {}
            },
            Event::Text(e) if in_value || in_inline_text => {
                if let Some(value) = pending.as_mut().and_then(|c| c.value.as_mut()) {
                    value.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) if in_value || in_inline_text => {
                if let Some(value) = pending.as_mut().and_then(|c| c.value.as_mut()) {
                    value.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = false,
                b"row" => current_row = None,
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let (Some(cell), Some(row)) = (pending.take(), current_row.as_deref()) {
                        let cell_location =
                            location.with_row(Some(row)).with_cell(Some(&cell.reference));
                        let value = build_cell(&cell, shared_strings, &cell_location)?;
                        sheet.set_cell(row, &cell.reference, value);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn start_value(pending: &mut Option<PendingCell>) {
    if let Some(cell) = pending.as_mut() {
        cell.value.get_or_insert_with(String::new);
    }
}

fn row_reference(attributes: Attributes<'_>, location: &Location) -> XlsxResult<String> {
    attribute(attributes, b"r")?
        .filter(|r| !r.is_empty())
        .ok_or_else(|| location.error("row has no reference"))
}

/// Turn a completed `<c>` element into a cell
fn build_cell(
    cell: &PendingCell,
    shared_strings: &SharedStringTable,
    location: &Location,
) -> XlsxResult<Cell> {
    let raw = cell
        .value
        .as_deref()
        .ok_or_else(|| location.error("cell has no value"))?;

    match cell.cell_type.as_deref() {
        Some("s") => {
            let index: usize = raw
                .trim()
                .parse()
                .map_err(|_| location.error(format!("invalid shared string index \"{}\"", raw)))?;
            let text = shared_strings.get(index).ok_or_else(|| {
                location.error(format!(
                    "shared string index {} out of range ({} entries)",
                    index,
                    shared_strings.unique_count()
                ))
            })?;
            Ok(Cell::string(text))
        }
        None | Some("n") => {
            let trimmed = raw.trim();
            let n = Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| location.error(format!("invalid number \"{}\"", raw)))?;
            Ok(Cell::number(n))
        }
        Some("b") => match raw.trim() {
            "1" | "true" => Ok(Cell::number(1)),
            "0" | "false" => Ok(Cell::number(0)),
            other => Err(location.error(format!("invalid boolean \"{}\"", other))),
        },
        Some("inlineStr") | Some("str") | Some("e") => Ok(Cell::string(decode_excel_escapes(raw))),
        Some(other) => Err(location.error(format!("unknown cell type \"{}\"", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts;
    use plain_sheets_core::{CellKind, CellValue};
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const NS: &str = r#"xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn build_package(entries: &[(&str, String)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options = SimpleFileOptions::default();
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    fn sheet_xml(rows: &str) -> String {
        format!(r#"<?xml version="1.0"?><worksheet {NS}><sheetData>{rows}</sheetData></worksheet>"#)
    }

    /// A one-sheet package with the given sheet data and optional shared strings
    fn single_sheet(rows: &str, shared: Option<&str>) -> Vec<u8> {
        let mut entries = vec![
            (parts::CONTENT_TYPES_PART, parts::content_types_xml(1)),
            (parts::WORKBOOK_PART, parts::workbook_xml(&["Sheet1"])),
            (parts::WORKBOOK_RELS_PART, parts::workbook_rels_xml(1)),
            ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
        ];
        if let Some(si) = shared {
            entries.push((
                parts::SHARED_STRINGS_PART,
                format!(r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{si}</sst>"#),
            ));
        }
        build_package(&entries)
    }

    fn read(bytes: Vec<u8>) -> XlsxResult<Workbook> {
        XlsxReader::read(Cursor::new(bytes))
    }

    #[test]
    fn test_read_shared_and_numeric_cells() {
        let bytes = single_sheet(
            r#"<row r="1"><c r="A1" t="s"><v>1</v></c><c r="B1"><v>2.5</v></c></row>"#,
            Some("<si><t>zero</t></si><si><t>one</t></si>"),
        );
        let wb = read(bytes).unwrap();
        let sheet = wb.default_worksheet();

        let a1 = sheet.cell("1", "A1").unwrap();
        assert_eq!(a1.kind(), CellKind::SharedString);
        assert_eq!(a1.as_str(), Some("one"));
        assert_eq!(sheet.cell("1", "B").unwrap().decimal().unwrap(), Decimal::new(25, 1));
    }

    #[test]
    fn test_missing_shared_strings_part() {
        let bytes = single_sheet(r#"<row r="1"><c r="A1"><v>7</v></c></row>"#, None);
        let wb = read(bytes).unwrap();
        assert_eq!(wb.default_worksheet().cell("1", "A1").unwrap().i32().unwrap(), 7);
    }

    #[test]
    fn test_malformed_shared_strings_part() {
        let bytes = single_sheet(
            r#"<row r="1"><c r="A1"><v>7</v></c></row>"#,
            Some("<si><t>broken</si>"),
        );
        let err = read(bytes).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_scientific_and_typed_values() {
        let bytes = single_sheet(
            r#"<row r="1">
                <c r="A1"><v>1.5E3</v></c>
                <c r="B1" t="n"><v>-4</v></c>
                <c r="C1" t="b"><v>1</v></c>
                <c r="D1" t="inlineStr"><is><t xml:space="preserve"> in line </t></is></c>
                <c r="E1" t="str"><f>A1*2</f><v>formula text</v></c>
                <c r="F1" t="e"><v>#DIV/0!</v></c>
            </row>"#,
            None,
        );
        let wb = read(bytes).unwrap();
        let sheet = wb.default_worksheet();

        assert_eq!(sheet.cell("1", "A1").unwrap().i64().unwrap(), 1500);
        assert_eq!(sheet.cell("1", "B1").unwrap().i32().unwrap(), -4);
        assert_eq!(sheet.cell("1", "C1").unwrap().i32().unwrap(), 1);
        assert_eq!(sheet.cell("1", "D1").unwrap().as_str(), Some(" in line "));
        assert_eq!(sheet.cell("1", "E1").unwrap().as_str(), Some("formula text"));
        assert_eq!(sheet.cell("1", "F1").unwrap().as_str(), Some("#DIV/0!"));
    }

    #[test]
    fn test_empty_cells_and_rows() {
        let bytes = single_sheet(r#"<row r="1"><c r="A1"/></row><row r="2"/>"#, None);
        let wb = read(bytes).unwrap();
        let sheet = wb.default_worksheet();

        let a1 = sheet.cell("1", "A1").unwrap();
        assert!(a1.is_empty());
        assert_eq!(a1.decimal().unwrap(), Cell::UNSET_NUMBER);
        assert!(sheet.contains_row("2"));
        assert_eq!(sheet.row("2").unwrap().len(), 0);
    }

    #[test]
    fn test_open_cell_without_value_fails() {
        let bytes = single_sheet(r#"<row r="3"><c r="B3" s="1"></c></row>"#, None);
        let err = read(bytes).unwrap_err();
        match err {
            XlsxError::Structure { location, detail } => {
                assert_eq!(detail, "cell has no value");
                assert_eq!(location.sheet, Some((0, "Sheet1".to_string())));
                assert_eq!(location.row.as_deref(), Some("3"));
                assert_eq!(location.cell.as_deref(), Some("B3"));
                assert_eq!(location.part, "xl/worksheets/sheet1.xml");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_shared_entries_keep_positions() {
        let bytes = single_sheet(
            r#"<row r="1"><c r="A1" t="s"><v>2</v></c><c r="B1" t="s"><v>0</v></c></row>"#,
            Some("<si><t>dup</t></si><si><t>other</t></si><si><t>dup</t></si>"),
        );
        let wb = read(bytes).unwrap();
        let sheet = wb.default_worksheet();
        assert_eq!(sheet.cell("1", "A1").unwrap().as_str(), Some("dup"));
        assert_eq!(sheet.cell("1", "B1").unwrap().as_str(), Some("dup"));
    }

    #[test]
    fn test_shared_index_out_of_range() {
        let bytes = single_sheet(
            r#"<row r="1"><c r="A1" t="s"><v>5</v></c></row>"#,
            Some("<si><t>only</t></si>"),
        );
        let err = read(bytes).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_invalid_number() {
        let bytes = single_sheet(r#"<row r="1"><c r="A1"><v>abc</v></c></row>"#, None);
        assert!(matches!(read(bytes), Err(XlsxError::Structure { .. })));
    }

    #[test]
    fn test_sheets_resolved_through_relationships() {
        let workbook = format!(
            r#"<workbook {NS}><sheets>
                <sheet name="First" sheetId="7" r:id="rId2"/>
                <sheet name="Second" sheetId="3" r:id="rId1"/>
            </sheets></workbook>"#
        );
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/data.xml"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/summary.xml"/>
        </Relationships>"#;

        let bytes = build_package(&[
            (parts::CONTENT_TYPES_PART, parts::content_types_xml(2)),
            (parts::WORKBOOK_PART, workbook),
            (parts::WORKBOOK_RELS_PART, rels.to_string()),
            ("xl/worksheets/summary.xml", sheet_xml(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#)),
            ("xl/worksheets/data.xml", sheet_xml(r#"<row r="1"><c r="A1"><v>2</v></c></row>"#)),
        ]);

        let wb = read(bytes).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().name(), "First");
        assert_eq!(wb.worksheet(0).unwrap().cell("1", "A1").unwrap().i32().unwrap(), 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Second");
        assert_eq!(wb.worksheet(1).unwrap().cell("1", "A1").unwrap().i32().unwrap(), 2);
    }

    #[test]
    fn test_positional_fallback_without_relationships() {
        let workbook = format!(
            r#"<workbook {NS}><sheets><sheet name="Only" sheetId="4" r:id="rId1"/></sheets></workbook>"#
        );
        let bytes = build_package(&[
            (parts::CONTENT_TYPES_PART, parts::content_types_xml(1)),
            (parts::WORKBOOK_PART, workbook),
            ("xl/worksheets/sheet4.xml", sheet_xml(r#"<row r="2"><c r="C2"><v>9</v></c></row>"#)),
        ]);

        let wb = read(bytes).unwrap();
        assert_eq!(wb.default_worksheet().cell("2", "C").unwrap().i32().unwrap(), 9);
    }

    #[test]
    fn test_missing_sheet_part() {
        let bytes = build_package(&[
            (parts::CONTENT_TYPES_PART, parts::content_types_xml(1)),
            (parts::WORKBOOK_PART, parts::workbook_xml(&["Gone"])),
            (parts::WORKBOOK_RELS_PART, parts::workbook_rels_xml(1)),
        ]);

        let err = read(bytes).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("sheet[0] \"Gone\""));
    }

    #[test]
    fn test_empty_sheet_list() {
        let bytes = build_package(&[
            (parts::CONTENT_TYPES_PART, parts::content_types_xml(0)),
            (parts::WORKBOOK_PART, parts::workbook_xml(&[])),
        ]);
        let err = read(bytes).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("no sheets"));
    }

    #[test]
    fn test_missing_workbook_part() {
        let bytes = build_package(&[(parts::CONTENT_TYPES_PART, parts::content_types_xml(0))]);
        assert!(matches!(read(bytes), Err(XlsxError::MissingPart(p)) if p == "xl/workbook.xml"));
    }

    #[test]
    fn test_missing_content_types_part() {
        let bytes = build_package(&[
            (parts::WORKBOOK_PART, parts::workbook_xml(&["Sheet1"])),
            ("xl/worksheets/sheet1.xml", sheet_xml("")),
        ]);
        let err = read(bytes).unwrap_err();
        assert!(matches!(&err, XlsxError::MissingPart(p) if p == "[Content_Types].xml"));
        assert!(err.is_structural());
    }

    #[test]
    fn test_not_a_zip() {
        let err = read(b"definitely not a zip archive".to_vec()).unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
        assert!(err.is_structural());
    }

    #[test]
    fn test_read_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, single_sheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#, None)).unwrap();

        let wb = XlsxReader::read_file(&path).unwrap();
        assert_eq!(wb.source_path(), Some(path.as_path()));
    }

    #[test]
    fn test_read_file_nonexistent() {
        let err = XlsxReader::read_file("/nonexistent/book.xlsx").unwrap_err();
        assert!(
            matches!(&err, XlsxError::FileNotFound(p) if p == Path::new("/nonexistent/book.xlsx"))
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_escaped_shared_strings() {
        let bytes = single_sheet(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#,
            Some("<si><t>line_x000D_break &amp; more</t></si>"),
        );
        let wb = read(bytes).unwrap();
        assert_eq!(
            wb.default_worksheet().cell("1", "A1").unwrap().value(),
            Some(&CellValue::String("line\rbreak & more".to_string()))
        );
    }
}
