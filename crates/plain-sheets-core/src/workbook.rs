//! Workbook type - the main document structure

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// An ordered, never-empty list of worksheets. The first worksheet is the
/// default sheet. A workbook is a plain in-memory value; reading and writing
/// packages lives in `plain-sheets-xlsx`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
    /// File this workbook was loaded from, if any
    source_path: Option<PathBuf>,
}

impl Workbook {
    /// Create a workbook with a single empty worksheet
    ///
    /// # Example
    /// ```
    /// use plain_sheets_core::Workbook;
    ///
    /// let wb = Workbook::create("Sheet1").unwrap();
    /// assert_eq!(wb.default_worksheet().name(), "Sheet1");
    /// assert!(Workbook::create("   ").is_err());
    /// ```
    pub fn create(default_sheet_name: &str) -> Result<Self> {
        validate_sheet_name(default_sheet_name)?;
        Ok(Self {
            worksheets: vec![Worksheet::new(default_sheet_name)],
            source_path: None,
        })
    }

    /// Assemble a workbook from already-built worksheets.
    ///
    /// Names are taken as given; only an empty list is rejected.
    pub fn from_worksheets(worksheets: Vec<Worksheet>) -> Result<Self> {
        if worksheets.is_empty() {
            return Err(Error::NoWorksheets);
        }
        Ok(Self {
            worksheets,
            source_path: None,
        })
    }

    /// The file this workbook was loaded from
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Record the file this workbook was loaded from
    pub fn set_source_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.source_path = Some(path.into());
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// The first worksheet
    pub fn default_worksheet(&self) -> &Worksheet {
        &self.worksheets[0]
    }

    /// The first worksheet, mutably
    pub fn default_worksheet_mut(&mut self) -> &mut Worksheet {
        &mut self.worksheets[0]
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    /// Append a new empty worksheet and return its index
    pub fn add_worksheet(&mut self, name: &str) -> Result<usize> {
        validate_sheet_name(name)?;
        let lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.len() - 1)
    }

    /// Remove a worksheet by index. The last remaining sheet cannot be removed.
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        if self.worksheets.len() == 1 {
            return Err(Error::LastWorksheet);
        }
        Ok(self.worksheets.remove(index))
    }
}

/// Check a name for a new worksheet
fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSheetName(name.into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(name.into()));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if name.contains(INVALID_CHARS) {
        return Err(Error::InvalidSheetName(name.into()));
    }

    Ok(())
}
