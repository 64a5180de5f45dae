//! Shared-string table (`xl/sharedStrings.xml`)
//!
//! On save the table is built fresh: every string cell is interned in
//! worksheet, row, cell order and gets the index of the string's first
//! occurrence. On load the part is read once into an ordered list and cells
//! resolve `t="s"` indices against it.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::parts::SPREADSHEET_NS;

/// Deduplicating string pool with first-occurrence indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedStringTable {
    entries: Vec<String>,
    index: HashMap<String, usize>,
    references: usize,
}

impl SharedStringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from the entries of an existing part
    ///
    /// Duplicate entries keep their own positions; lookups by string return
    /// the first one.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, s) in entries.iter().enumerate() {
            index.entry(s.clone()).or_insert(i);
        }
        Self {
            entries,
            index,
            references: 0,
        }
    }

    /// Record one reference to `s` and return its index
    pub fn intern(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.entries.len();
        self.entries.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }

    /// Look up an entry by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Index of a string, if present
    pub fn position(&self, s: &str) -> Option<usize> {
        self.index.get(s).copied()
    }

    /// Total references recorded by [`SharedStringTable::intern`] (`count`)
    pub fn count(&self) -> usize {
        self.references
    }

    /// Number of distinct entries (`uniqueCount`)
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Render the `xl/sharedStrings.xml` part
    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{}" count="{}" uniqueCount="{}">"#,
            SPREADSHEET_NS,
            self.count(),
            self.unique_count()
        );

        for s in &self.entries {
            let encoded = encode_excel_escapes(s);
            let space = if needs_space_preserve(s) {
                r#" xml:space="preserve""#
            } else {
                ""
            };
            xml.push_str(&format!(
                "\n    <si><t{}>{}</t></si>",
                space,
                escape(encoded.as_str())
            ));
        }

        xml.push_str("\n</sst>");
        xml
    }
}

/// Parse a shared-strings part into its entries, one per `<si>`.
///
/// Plain items (`si/t`) and rich-text runs (`si/r/t`) are both read; the
/// runs of one item are concatenated. Phonetic hints (`rPh`) are skipped.
pub fn read_shared_strings_xml<R: BufRead>(reader: R) -> XlsxResult<Vec<String>> {
    let mut xml_reader = Reader::from_reader(reader);
    // Whitespace inside <t> is significant.
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_rph = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" if in_si => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current));
                    current.clear();
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(e) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry verbatim:
/// - `_x000d_` = CR (carriage return)
/// - `_x0001_` and other C0 control characters
/// - `_x005f_` = Underscore (escaped underscore)
pub fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match parse_escape(candidate) {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Encode a string so [`decode_excel_escapes`] restores it exactly.
///
/// Control characters become `_xHHHH_`, and an underscore that would
/// otherwise start a valid escape is written as `_x005F_`.
pub fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, c) in s.char_indices() {
        match c {
            '_' if parse_escape(&s[i..]).is_some() => result.push_str("_x005F_"),
            '\t' | '\n' => result.push(c),
            c if (c as u32) < 0x20 => result.push_str(&format!("_x{:04X}_", c as u32)),
            c => result.push(c),
        }
    }

    result
}

/// Parse `_xHHHH_` at the start of `s`.
fn parse_escape(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || &bytes[..2] != b"_x" || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) || s.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intern_first_occurrence_order() {
        let mut table = SharedStringTable::new();
        assert_eq!(table.intern("b"), 0);
        assert_eq!(table.intern("a"), 1);
        assert_eq!(table.intern("b"), 0);
        assert_eq!(table.intern("c"), 2);
        assert_eq!(table.intern("a"), 1);

        assert_eq!(table.count(), 5);
        assert_eq!(table.unique_count(), 3);
        assert_eq!(table.entries(), &["b", "a", "c"]);
        assert_eq!(table.position("c"), Some(2));
    }

    #[test]
    fn test_from_entries_with_duplicates() {
        let table = SharedStringTable::from_entries(vec![
            "dup".to_string(),
            "other".to_string(),
            "dup".to_string(),
        ]);

        assert_eq!(table.unique_count(), 3);
        assert_eq!(table.count(), 0);
        assert_eq!(table.get(0), Some("dup"));
        assert_eq!(table.get(2), Some("dup"));
        assert_eq!(table.get(3), None);
        assert_eq!(table.position("dup"), Some(0));
        assert_eq!(table.position("other"), Some(1));
    }

    #[test]
    fn test_to_xml() {
        let mut table = SharedStringTable::new();
        table.intern("hello");
        table.intern("a < b & c");
        table.intern("hello");
        table.intern(" padded ");

        let xml = table.to_xml();
        assert!(xml.contains(r#"count="4" uniqueCount="3""#));
        assert!(xml.contains("<si><t>hello</t></si>"));
        assert!(xml.contains("<si><t>a &lt; b &amp; c</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded </t></si>"#));
    }

    #[test]
    fn test_empty_table_xml() {
        let xml = SharedStringTable::new().to_xml();
        assert!(xml.contains(r#"count="0" uniqueCount="0""#));
        assert!(xml.ends_with("</sst>"));
    }

    #[test]
    fn test_read_plain_and_rich_items() {
        let xml = r#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>plain</t></si>
  <si><r><rPr><b/></rPr><t>bold</t></r><r><t xml:space="preserve"> tail</t></r></si>
  <si><t>base</t><rPh sb="0" eb="1"><t>hint</t></rPh></si>
  <si/>
</sst>"#;

        let entries = read_shared_strings_xml(xml.as_bytes()).unwrap();
        assert_eq!(entries, vec!["plain", "bold tail", "base", ""]);
    }

    #[test]
    fn test_read_is_inverse_of_write() {
        let mut table = SharedStringTable::new();
        for s in ["one", "two\r\nlines", "_x000D_ literal", "\u{1}ctl", "  "] {
            table.intern(s);
        }

        let entries = read_shared_strings_xml(table.to_xml().as_bytes()).unwrap();
        assert_eq!(entries, table.entries());
    }

    #[test]
    fn test_read_malformed_fails() {
        let xml = "<sst><si><t>open</si></sst>";
        assert!(read_shared_strings_xml(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
    }

    #[test]
    fn test_encode_excel_escapes() {
        assert_eq!(encode_excel_escapes("a\rb"), "a_x000D_b");
        assert_eq!(encode_excel_escapes("tab\tnl\n"), "tab\tnl\n");
        assert_eq!(encode_excel_escapes("_x0041_"), "_x005F_x0041_");
        assert_eq!(encode_excel_escapes("snake_case"), "snake_case");
        assert_eq!(
            decode_excel_escapes(&encode_excel_escapes("_x0041_")),
            "_x0041_"
        );
    }
}
