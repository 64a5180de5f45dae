//! # plain-sheets-core
//!
//! Core data structures for the plain-sheets workbook model.
//!
//! This crate provides the in-memory document types:
//! - [`Cell`] - A single value (decimal or string) with its type tag
//! - [`Worksheet`] - A sparse, insertion-ordered grid of cells
//! - [`Workbook`] - An ordered, never-empty list of worksheets
//! - [`CellAddress`] and [`CellRange`] - A1-style references
//!
//! ## Example
//!
//! ```rust
//! use plain_sheets_core::{CellKind, Workbook};
//!
//! let mut workbook = Workbook::create("Sheet1").unwrap();
//! let sheet = workbook.default_worksheet_mut();
//!
//! sheet.cell_mut("1", "A").set_string("hello");
//! sheet.cell_mut("1", "B").set_i32(42);
//!
//! assert_eq!(sheet.cell("1", "A1").unwrap().kind(), CellKind::SharedString);
//! assert_eq!(sheet.cell("1", "B1").unwrap().i32().unwrap(), 42);
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellKind, CellRange, CellValue};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::{RowCells, Worksheet};

pub use rust_decimal::Decimal;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
