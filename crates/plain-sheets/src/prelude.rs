//! Prelude module - common imports for plain-sheets users
//!
//! ```rust
//! use plain_sheets::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellAddress,
    CellKind,
    CellRange,
    CellValue,
    Decimal,

    // Error types
    Error,
    Result,
    XlsxError,
    XlsxResult,

    // Main types
    Workbook,
    Worksheet,

    // Extension traits
    WorkbookExt,

    // I/O types
    XlsxReader,
    XlsxWriteOptions,
    XlsxWriter,
};
