//! # plain-sheets-xlsx
//!
//! XLSX (Office Open XML) package reader and writer for plain-sheets.
//!
//! [`XlsxReader`] turns a package into a [`plain_sheets_core::Workbook`];
//! [`XlsxWriter`] does the reverse. String cells go through a
//! [`SharedStringTable`] that is rebuilt on every save and every load.

pub mod error;
pub mod options;
pub mod parts;
pub mod reader;
pub mod shared_strings;
pub mod writer;

mod path;
mod styles;

pub use error::{Location, XlsxError, XlsxResult};
pub use options::{Compression, XlsxWriteOptions};
pub use reader::XlsxReader;
pub use shared_strings::SharedStringTable;
pub use writer::{PackagePart, XlsxWriter};
