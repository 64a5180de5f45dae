//! XLSX writer

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use chrono::{DateTime, Datelike, Timelike, Utc};
use quick_xml::escape::escape;

use crate::error::{XlsxError, XlsxResult};
use crate::options::XlsxWriteOptions;
use crate::parts::{self, RELATIONSHIPS_NS, SPREADSHEET_NS};
use crate::shared_strings::SharedStringTable;
use crate::styles::STYLES_XML;
use plain_sheets_core::{Cell, CellKind, CellValue, Workbook, Worksheet};

/// One rendered part of a package
#[derive(Debug, Clone, PartialEq)]
pub struct PackagePart {
    /// Zip entry name (e.g. `xl/workbook.xml`)
    pub name: String,
    /// XML content
    pub xml: String,
}

impl PackagePart {
    fn new<S: Into<String>>(name: S, xml: String) -> Self {
        Self {
            name: name.into(),
            xml,
        }
    }
}

/// XLSX file writer
///
/// Saving happens in two steps: every part is rendered to a string first
/// (this is where the shared-string table is built and where inconsistent
/// cells are rejected), then the parts are packed into the zip archive.
/// Nothing is written to the destination until rendering has succeeded.
#[derive(Debug, Clone, Default)]
pub struct XlsxWriter {
    options: XlsxWriteOptions,
}

impl XlsxWriter {
    /// Create a writer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given options
    pub fn with_options(options: XlsxWriteOptions) -> Self {
        Self { options }
    }

    /// The writer's options
    pub fn options(&self) -> &XlsxWriteOptions {
        &self.options
    }

    /// Write a workbook to a file path using default options
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        Self::new().save(workbook, path)
    }

    /// Write a workbook to a writer using default options
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        Self::new().write_to(workbook, writer)
    }

    /// Write a workbook to a file path, replacing any existing file
    pub fn save<P: AsRef<Path>>(&self, workbook: &Workbook, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        let mut buf = Cursor::new(Vec::new());
        self.write_to(workbook, &mut buf)?;
        fs::write(path, buf.into_inner())?;
        log::debug!("saved {} sheet(s) to {}", workbook.sheet_count(), path.display());
        Ok(())
    }

    /// Write a workbook to a writer
    pub fn write_to<W: Write + Seek>(&self, workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let created = self.options.created.unwrap_or_else(Utc::now);
        let package = self.render_at(workbook, created)?;
        self.pack(&package, created, writer)
    }

    /// Render every part of the package without writing anything
    pub fn render(&self, workbook: &Workbook) -> XlsxResult<Vec<PackagePart>> {
        self.render_at(workbook, self.options.created.unwrap_or_else(Utc::now))
    }

    fn render_at(
        &self,
        workbook: &Workbook,
        created: DateTime<Utc>,
    ) -> XlsxResult<Vec<PackagePart>> {
        let names: Vec<&str> = workbook.worksheets().map(Worksheet::name).collect();
        let sheet_count = names.len();

        let mut package = vec![
            PackagePart::new(parts::CONTENT_TYPES_PART, parts::content_types_xml(sheet_count)),
            PackagePart::new(parts::ROOT_RELS_PART, parts::root_rels_xml()),
            PackagePart::new(parts::APP_PART, parts::app_xml(&names, &self.options)),
            PackagePart::new(
                parts::CORE_PART,
                parts::core_xml(&self.options.creator, created),
            ),
            PackagePart::new(
                parts::WORKBOOK_RELS_PART,
                parts::workbook_rels_xml(sheet_count),
            ),
            PackagePart::new(parts::STYLES_PART, STYLES_XML.to_string()),
            PackagePart::new(parts::WORKBOOK_PART, parts::workbook_xml(&names)),
        ];

        // The table must see every sheet before its part is rendered.
        let mut shared_strings = SharedStringTable::new();
        for (i, sheet) in workbook.worksheets().enumerate() {
            let xml = Self::worksheet_xml(sheet, i, &mut shared_strings)?;
            package.push(PackagePart::new(parts::worksheet_part(i + 1), xml));
        }

        log::debug!(
            "rendered {} sheet(s), {} shared string(s) from {} reference(s)",
            sheet_count,
            shared_strings.unique_count(),
            shared_strings.count()
        );
        package.push(PackagePart::new(
            parts::SHARED_STRINGS_PART,
            shared_strings.to_xml(),
        ));

        Ok(package)
    }

    fn pack<W: Write + Seek>(
        &self,
        package: &[PackagePart],
        created: DateTime<Utc>,
        writer: W,
    ) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        let mut options = zip::write::SimpleFileOptions::default()
            .compression_method(self.options.compression.method());
        if let Some(stamp) = zip_timestamp(created) {
            options = options.last_modified_time(stamp);
        }

        for part in package {
            log::trace!("writing {} ({} bytes)", part.name, part.xml.len());
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(part.xml.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Render one worksheet part, interning its strings into `shared_strings`
    fn worksheet_xml(
        sheet: &Worksheet,
        index: usize,
        shared_strings: &mut SharedStringTable,
    ) -> XlsxResult<String> {
        let dimension = sheet.dimension().unwrap_or_else(|| "A1".to_string());
        let tab_selected = if index == 0 { r#" tabSelected="1""# } else { "" };

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}" xmlns:r="{}">
    <dimension ref="{}"/>
    <sheetViews>
        <sheetView{} workbookViewId="0"/>
    </sheetViews>
    <sheetFormatPr defaultRowHeight="15"/>
    <sheetData>"#,
            SPREADSHEET_NS,
            RELATIONSHIPS_NS,
            escape(dimension.as_str()),
            tab_selected
        );

        for (row, cells) in sheet.rows() {
            if row.is_empty() {
                return Err(XlsxError::Consistency(format!(
                    "sheet \"{}\" has a row with an empty address",
                    sheet.name()
                )));
            }
            if cells.is_empty() {
                content.push_str(&format!("\n        <row r=\"{}\"/>", escape(row)));
                continue;
            }

            content.push_str(&format!("\n        <row r=\"{}\">", escape(row)));
            for (cell_ref, cell) in cells {
                if cell_ref.is_empty() {
                    return Err(XlsxError::Consistency(format!(
                        "row {} on sheet \"{}\" has a cell with an empty address",
                        row,
                        sheet.name()
                    )));
                }
                Self::write_cell(&mut content, sheet, cell_ref, cell, shared_strings)?;
            }
            content.push_str("\n        </row>");
        }

        content.push_str(
            r#"
    </sheetData>
    <pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
</worksheet>"#,
        );

        Ok(content)
    }

    fn write_cell(
        content: &mut String,
        sheet: &Worksheet,
        cell_ref: &str,
        cell: &Cell,
        shared_strings: &mut SharedStringTable,
    ) -> XlsxResult<()> {
        let cell_ref = escape(cell_ref);
        match (cell.kind(), cell.value()) {
            (CellKind::SharedString, Some(CellValue::String(s))) => {
                let index = shared_strings.intern(s);
                content.push_str(&format!(
                    "\n            <c r=\"{}\" t=\"s\"><v>{}</v></c>",
                    cell_ref, index
                ));
            }
            (CellKind::Numeric, Some(CellValue::Number(n))) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"><v>{}</v></c>",
                    cell_ref, n
                ));
            }
            // A cell that never received a value.
            (CellKind::Numeric, None) => {
                content.push_str(&format!("\n            <c r=\"{}\"/>", cell_ref));
            }
            (kind, value) => {
                return Err(XlsxError::Consistency(format!(
                    "cell {} on sheet \"{}\" is tagged {:?} but holds {}",
                    cell_ref,
                    sheet.name(),
                    kind,
                    value.map_or("no value", CellValue::type_name)
                )));
            }
        }
        Ok(())
    }
}

fn zip_timestamp(t: DateTime<Utc>) -> Option<zip::DateTime> {
    zip::DateTime::from_date_and_time(
        u16::try_from(t.year()).ok()?,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    )
    .ok()
}
