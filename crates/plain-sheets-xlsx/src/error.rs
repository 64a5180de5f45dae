//! XLSX error types

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error (including "not a zip archive")
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The package file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A required node is absent or a value cannot be parsed
    #[error("{detail} ({location})")]
    Structure {
        /// Where in the package the problem was found
        location: Location,
        /// What was wrong
        detail: String,
    },

    /// The in-memory model violates an invariant the writer relies on
    #[error("Inconsistent workbook: {0}")]
    Consistency(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] plain_sheets_core::Error),
}

impl XlsxError {
    /// Whether the error describes a broken or incomplete package
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            XlsxError::FileNotFound(_)
                | XlsxError::Zip(_)
                | XlsxError::Xml(_)
                | XlsxError::MissingPart(_)
                | XlsxError::Structure { .. }
        )
    }
}

impl From<quick_xml::events::attributes::AttrError> for XlsxError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        XlsxError::Xml(e.into())
    }
}

/// Position inside a package, attached to structural errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// File the package was read from
    pub source: Option<PathBuf>,
    /// Part (zip entry) being read
    pub part: String,
    /// 0-based sheet index and sheet name
    pub sheet: Option<(usize, String)>,
    /// Row address
    pub row: Option<String>,
    /// Cell address
    pub cell: Option<String>,
}

impl Location {
    /// Location of a whole part
    pub fn part<S: Into<String>>(source: Option<PathBuf>, part: S) -> Self {
        Self {
            source,
            part: part.into(),
            ..Self::default()
        }
    }

    /// Narrow to a sheet
    pub fn with_sheet<S: Into<String>>(mut self, index: usize, name: S) -> Self {
        self.sheet = Some((index, name.into()));
        self
    }

    /// Narrow to a row
    pub fn with_row(&self, row: Option<&str>) -> Self {
        Self {
            row: row.map(str::to_string),
            cell: None,
            ..self.clone()
        }
    }

    /// Narrow to a cell
    pub fn with_cell(&self, cell: Option<&str>) -> Self {
        Self {
            cell: cell.map(str::to_string),
            ..self.clone()
        }
    }

    /// Build a structural error at this location
    pub fn error<S: Into<String>>(&self, detail: S) -> XlsxError {
        XlsxError::Structure {
            location: self.clone(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(path) => write!(f, "file \"{}\"", path.display())?,
            None => f.write_str("<stream>")?,
        }
        write!(f, " -> {}", self.part)?;
        if let Some((index, name)) = &self.sheet {
            write!(f, " -> sheet[{}] \"{}\"", index, name)?;
        }
        if let Some(row) = &self.row {
            write!(f, " -> row \"{}\"", row)?;
        }
        if let Some(cell) = &self.cell {
            write!(f, " -> cell \"{}\"", cell)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::part(Some(PathBuf::from("book.xlsx")), "xl/worksheets/sheet2.xml")
            .with_sheet(1, "Data")
            .with_row(Some("4"))
            .with_cell(Some("C4"));

        assert_eq!(
            loc.to_string(),
            "file \"book.xlsx\" -> xl/worksheets/sheet2.xml -> sheet[1] \"Data\" -> row \"4\" -> cell \"C4\""
        );
    }

    #[test]
    fn test_missing_file_is_structural() {
        let err = XlsxError::FileNotFound(PathBuf::from("gone.xlsx"));
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "File not found: gone.xlsx");

        let io = XlsxError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!io.is_structural());
    }

    #[test]
    fn test_structure_error_message() {
        let err = Location::part(None, "xl/workbook.xml").error("sheet list not found");
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "sheet list not found (<stream> -> xl/workbook.xml)"
        );
    }
}
