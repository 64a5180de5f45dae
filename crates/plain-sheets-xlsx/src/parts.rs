//! Fixed package parts
//!
//! Every function here is a pure function of the workbook metadata it is
//! given, so the same input always renders the same XML.

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::options::XlsxWriteOptions;

/// SpreadsheetML main namespace
pub const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
/// Office document relationships namespace (`r:` prefix)
pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships namespace (`.rels` parts)
pub const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const APP_PART: &str = "docProps/app.xml";
pub const CORE_PART: &str = "docProps/core.xml";
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const STYLES_PART: &str = "xl/styles.xml";
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Part name of the n-th worksheet (1-based)
pub fn worksheet_part(n: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", n)
}

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `[Content_Types].xml`: every part the writer emits, by exact name
pub fn content_types_xml(sheet_count: usize) -> String {
    let mut content = format!(
        r#"{XML_DECLARATION}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/{WORKBOOK_PART}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/{STYLES_PART}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/{SHARED_STRINGS_PART}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
    <Override PartName="/{CORE_PART}" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/{APP_PART}" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    );

    for n in 1..=sheet_count {
        content.push_str(&format!(
            r#"
    <Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            worksheet_part(n)
        ));
    }

    content.push_str("\n</Types>");
    content
}

/// `_rels/.rels`: workbook plus the two document-property parts
pub fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{PACKAGE_RELATIONSHIPS_NS}">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="{WORKBOOK_PART}"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="{CORE_PART}"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="{APP_PART}"/>
</Relationships>"#
    )
}

/// `docProps/app.xml`: application info and the sheet titles
pub fn app_xml(sheet_names: &[&str], options: &XlsxWriteOptions) -> String {
    let count = sheet_names.len();
    let titles: String = sheet_names
        .iter()
        .map(|name| format!("\n                <vt:lpstr>{}</vt:lpstr>", escape(name)))
        .collect();

    format!(
        r#"{XML_DECLARATION}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>{application}</Application>
    <DocSecurity>0</DocSecurity>
    <ScaleCrop>false</ScaleCrop>
    <HeadingPairs>
        <vt:vector size="2" baseType="variant">
            <vt:variant>
                <vt:lpstr>Worksheets</vt:lpstr>
            </vt:variant>
            <vt:variant>
                <vt:i4>{count}</vt:i4>
            </vt:variant>
        </vt:vector>
    </HeadingPairs>
    <TitlesOfParts>
        <vt:vector size="{count}" baseType="lpstr">{titles}
        </vt:vector>
    </TitlesOfParts>
    <Company></Company>
    <LinksUpToDate>false</LinksUpToDate>
    <SharedDoc>false</SharedDoc>
    <HyperlinksChanged>false</HyperlinksChanged>
    <AppVersion>{app_version}</AppVersion>
</Properties>"#,
        application = escape(&options.application),
        app_version = escape(&options.app_version),
    )
}

/// `docProps/core.xml`: creator and W3CDTF creation stamp
pub fn core_xml(creator: &str, created: DateTime<Utc>) -> String {
    format!(
        r#"{XML_DECLARATION}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:creator>{}</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
</cp:coreProperties>"#,
        escape(creator),
        created.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

/// `xl/_rels/workbook.xml.rels`.
///
/// Sheets take `rId1..=n` in order, styles `rId{n+1}` and shared strings
/// `rId{n+2}`.
pub fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut content = format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{PACKAGE_RELATIONSHIPS_NS}">"#
    );

    for n in 1..=sheet_count {
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }

    content.push_str(&format!(
        r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#,
        sheet_count + 1,
        sheet_count + 2
    ));

    content
}

/// `xl/workbook.xml`: the sheet list, with `sheetId` and `r:id` both equal
/// to the sheet's 1-based position
pub fn workbook_xml(sheet_names: &[&str]) -> String {
    let mut content = format!(
        r#"{XML_DECLARATION}
<workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{RELATIONSHIPS_NS}">
    <workbookPr/>
    <bookViews>
        <workbookView tabRatio="600"/>
    </bookViews>
    <sheets>"#
    );

    for (i, name) in sheet_names.iter().enumerate() {
        content.push_str(&format!(
            r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            i + 1,
            i + 1
        ));
    }

    content.push_str(
        r#"
    </sheets>
</workbook>"#,
    );
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_content_types_lists_every_sheet() {
        let xml = content_types_xml(3);
        for n in 1..=3 {
            assert!(xml.contains(&format!(r#"PartName="/xl/worksheets/sheet{n}.xml""#)));
        }
        assert!(!xml.contains("sheet4.xml"));
        assert!(xml.contains(r#"PartName="/xl/sharedStrings.xml""#));
        assert!(xml.contains(r#"PartName="/docProps/core.xml""#));
    }

    #[test]
    fn test_workbook_rels_ids() {
        let xml = workbook_rels_xml(2);
        assert!(xml.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml""#));
        assert!(xml.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml""#));
        assert!(xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
        assert!(xml.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings""#));
    }

    #[test]
    fn test_workbook_xml_escapes_names() {
        let xml = workbook_xml(&["Plain", "R&D \"Q1\""]);
        assert!(xml.contains(r#"<sheet name="Plain" sheetId="1" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<sheet name="R&amp;D &quot;Q1&quot;" sheetId="2" r:id="rId2"/>"#));
    }

    #[test]
    fn test_app_xml_titles() {
        let xml = app_xml(&["One", "Two"], &XlsxWriteOptions::default());
        assert!(xml.contains("<vt:i4>2</vt:i4>"));
        assert!(xml.contains(r#"<vt:vector size="2" baseType="lpstr">"#));
        assert!(xml.contains("<vt:lpstr>Two</vt:lpstr>"));
    }

    #[test]
    fn test_core_xml_timestamp() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let xml = core_xml("tester", created);
        assert!(xml.contains("<dc:creator>tester</dc:creator>"));
        assert!(xml.contains(">2024-03-09T07:05:01Z</dcterms:created>"));
    }

    #[test]
    fn test_parts_are_deterministic() {
        assert_eq!(workbook_xml(&["A"]), workbook_xml(&["A"]));
        assert_eq!(content_types_xml(1), content_types_xml(1));
    }
}
