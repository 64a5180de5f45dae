//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A value holder with its type tag
//! - [`CellValue`] - The value stored in a cell (decimal or string)
//! - [`CellKind`] - The type tag (numeric or shared string)
//! - [`CellAddress`] / [`CellRange`] - Parsed A1-style references

mod address;
mod value;

pub use address::{is_column_label, split_reference, CellAddress, CellRange};
pub use value::{Cell, CellKind, CellValue};
