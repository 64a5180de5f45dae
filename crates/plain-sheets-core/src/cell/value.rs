//! Cell value types

use std::borrow::Cow;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// The value stored in a cell
///
/// A cell holds either a decimal number or a string, never both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Numeric value, kept in decimal precision
    Number(Decimal),

    /// String value (written through the shared-string table)
    String(String),
}

impl CellValue {
    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::String(_) => None,
        }
    }

    /// Try to get the value as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

/// The type tag a cell is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    /// Untyped cell, the value is a raw decimal (`<c>` without `t`)
    #[default]
    Numeric,
    /// Shared-string cell (`t="s"`), the value is an index into the string table
    SharedString,
}

impl CellKind {
    /// The `t` attribute this kind is written with, if any
    pub fn xlsx_type(&self) -> Option<&'static str> {
        match self {
            CellKind::Numeric => None,
            CellKind::SharedString => Some("s"),
        }
    }
}

/// A single addressable value holder.
///
/// Setting a string switches the kind to [`CellKind::SharedString`]; any
/// numeric setter switches it back to [`CellKind::Numeric`]. A cell that has
/// never been given a value reads as the number `-1`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    value: Option<CellValue>,
    kind: CellKind,
}

impl Cell {
    /// Numeric reading of a cell with no value.
    pub const UNSET_NUMBER: Decimal = Decimal::NEGATIVE_ONE;

    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a numeric cell
    pub fn number<N: Into<Decimal>>(n: N) -> Self {
        let mut cell = Self::new();
        cell.set_number(n.into());
        cell
    }

    /// Create a string cell
    pub fn string<S: Into<String>>(s: S) -> Self {
        let mut cell = Self::new();
        cell.set_string(s);
        cell
    }

    /// Store a decimal value and tag the cell numeric
    pub fn set_number(&mut self, n: Decimal) {
        self.value = Some(CellValue::Number(n));
        self.kind = CellKind::Numeric;
    }

    /// Store a 32-bit integer (widened to decimal)
    pub fn set_i32(&mut self, n: i32) {
        self.set_number(Decimal::from(n));
    }

    /// Store a 64-bit integer (widened to decimal)
    pub fn set_i64(&mut self, n: i64) {
        self.set_number(Decimal::from(n));
    }

    /// Store a string and tag the cell as a shared string
    pub fn set_string<S: Into<String>>(&mut self, s: S) {
        self.value = Some(CellValue::String(s.into()));
        self.kind = CellKind::SharedString;
    }

    /// Drop the stored value, keeping the current type tag.
    ///
    /// Clearing a string cell leaves it tagged as a shared string with no
    /// text; such a cell cannot be saved.
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// The stored value, if any
    pub fn value(&self) -> Option<&CellValue> {
        self.value.as_ref()
    }

    /// The type tag
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Whether no value has been stored
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Whether the cell is tagged as a shared string
    pub fn is_shared_string(&self) -> bool {
        self.kind == CellKind::SharedString
    }

    /// Numeric view of the cell.
    ///
    /// Returns [`Cell::UNSET_NUMBER`] when no value has been stored and an
    /// [`Error::InvalidValueType`] when the cell holds a string.
    pub fn decimal(&self) -> Result<Decimal> {
        match &self.value {
            None => Ok(Self::UNSET_NUMBER),
            Some(CellValue::Number(n)) => Ok(*n),
            Some(other) => Err(Error::InvalidValueType {
                expected: "number",
                actual: other.type_name(),
            }),
        }
    }

    /// Truncating 32-bit view of [`Cell::decimal`]. Out-of-range values wrap.
    pub fn i32(&self) -> Result<i32> {
        Ok(truncate(self.decimal()?) as i32)
    }

    /// Truncating 64-bit view of [`Cell::decimal`]. Out-of-range values wrap.
    pub fn i64(&self) -> Result<i64> {
        Ok(truncate(self.decimal()?) as i64)
    }

    /// Textual view of the cell; numbers render in decimal notation.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match &self.value {
            None => None,
            Some(CellValue::String(s)) => Some(Cow::Borrowed(s)),
            Some(CellValue::Number(n)) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// The stored string, if the value is a string
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(CellValue::as_str)
    }
}

// Decimal's range (about ±7.9e28) always fits in i128.
fn truncate(n: Decimal) -> i128 {
    n.trunc().to_i128().unwrap_or_default()
}

impl From<Decimal> for Cell {
    fn from(n: Decimal) -> Self {
        Cell::number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::string(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::string(s)
    }
}
