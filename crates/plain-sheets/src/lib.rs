//! # plain-sheets
//!
//! A small Rust library for reading, writing, and editing XLSX spreadsheets.
//!
//! Worksheets are maps of rows to cells, addressed by the same strings the
//! file format uses. Cells hold either a decimal number or a string; strings
//! are stored through the workbook's shared-string table on save.
//!
//! ## Example
//!
//! ```rust
//! use plain_sheets::prelude::*;
//!
//! let mut workbook = Workbook::create("Sheet1").unwrap();
//! let sheet = workbook.default_worksheet_mut();
//!
//! sheet.cell_mut("1", "A").set_string("hello");
//! sheet.cell_mut("1", "B").set_i32(42);
//!
//! assert_eq!(sheet.cell("1", "A1").unwrap().kind(), CellKind::SharedString);
//! assert_eq!(sheet.cell("1", "B").unwrap().i32().unwrap(), 42);
//!
//! // workbook.save_as("output.xlsx").unwrap();
//! ```

pub mod prelude;

// Re-export core types
pub use plain_sheets_core::{
    Cell, CellAddress, CellKind, CellRange, CellValue, Decimal, Error, Result, RowCells,
    Workbook, Worksheet, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use plain_sheets_xlsx::{
    Compression, Location, SharedStringTable, XlsxError, XlsxReader, XlsxResult,
    XlsxWriteOptions, XlsxWriter,
};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Load a workbook from an XLSX file
    fn load<P: AsRef<Path>>(path: P) -> XlsxResult<Self>;

    /// Save the workbook to an XLSX file, replacing any existing file
    fn save_as<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()>;

    /// Save with explicit writer options
    fn save_as_with<P: AsRef<Path>>(&self, path: P, options: XlsxWriteOptions) -> XlsxResult<()>;
}

impl WorkbookExt for Workbook {
    fn load<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        XlsxReader::read_file(path)
    }

    fn save_as<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        XlsxWriter::write_file(self, path)
    }

    fn save_as_with<P: AsRef<Path>>(&self, path: P, options: XlsxWriteOptions) -> XlsxResult<()> {
        XlsxWriter::with_options(options).save(self, path)
    }
}
