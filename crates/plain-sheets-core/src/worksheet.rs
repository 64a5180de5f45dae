//! Worksheet type

use indexmap::IndexMap;

use crate::cell::{is_column_label, Cell, CellAddress, CellRange};

/// The cells of one row, keyed by cell address in insertion order
pub type RowCells = IndexMap<String, Cell>;

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored sparsely as `row address -> cell address -> Cell`.
/// Both levels are [`IndexMap`]s: rows and cells are written back out in the
/// order they were first inserted, not in numeric or lexical order.
///
/// Addresses are not validated. A column given as bare letters (`"B"`) is
/// stored under the full reference (`"B3"` for row `"3"`); any other column
/// string is used as-is.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Row address -> cells of that row
    rows: IndexMap<String, RowCells>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    ///
    /// Name validation happens in [`crate::Workbook`].
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: IndexMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Get a cell for modification, creating the row and cell if absent.
    ///
    /// This is the indexer: it never fails, and calling it has the side
    /// effect of making the address exist. Use [`Worksheet::cell`] or
    /// [`Worksheet::contains_cell`] to look without creating.
    pub fn cell_mut(&mut self, row: &str, col: &str) -> &mut Cell {
        let key = cell_key(row, col);
        self.rows
            .entry(row.to_string())
            .or_default()
            .entry(key)
            .or_default()
    }

    /// Store a cell at an address, replacing any cell already there.
    ///
    /// `None` is a no-op. The row is created if it does not exist yet.
    pub fn set_cell<C: Into<Option<Cell>>>(&mut self, row: &str, col: &str, cell: C) {
        if let Some(cell) = cell.into() {
            let key = cell_key(row, col);
            self.rows
                .entry(row.to_string())
                .or_default()
                .insert(key, cell);
        }
    }

    /// Get a cell without creating it
    pub fn cell(&self, row: &str, col: &str) -> Option<&Cell> {
        self.rows.get(row)?.get(&cell_key(row, col))
    }

    /// Get the cells of a row without creating it
    pub fn row(&self, row: &str) -> Option<&RowCells> {
        self.rows.get(row)
    }

    /// Ensure a row exists (possibly with no cells) and return its cells
    pub fn insert_row(&mut self, row: &str) -> &mut RowCells {
        self.rows.entry(row.to_string()).or_default()
    }

    /// Check whether a row address exists
    pub fn contains_row(&self, row: &str) -> bool {
        self.rows.contains_key(row)
    }

    /// Check whether a cell address exists
    pub fn contains_cell(&self, row: &str, col: &str) -> bool {
        self.rows
            .get(row)
            .map_or(false, |cells| cells.contains_key(&cell_key(row, col)))
    }

    /// Remove a cell, keeping the order of the remaining cells
    pub fn remove_cell(&mut self, row: &str, col: &str) -> Option<Cell> {
        let key = cell_key(row, col);
        self.rows.get_mut(row)?.shift_remove(&key)
    }

    /// Remove a whole row, keeping the order of the remaining rows
    pub fn remove_row(&mut self, row: &str) -> Option<RowCells> {
        self.rows.shift_remove(row)
    }

    /// Iterate rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &RowCells)> {
        self.rows.iter().map(|(r, cells)| (r.as_str(), cells))
    }

    /// Iterate all cells row by row, in insertion order
    pub fn iter_cells(&self) -> impl Iterator<Item = (&str, &str, &Cell)> {
        self.rows.iter().flat_map(|(r, cells)| {
            cells
                .iter()
                .map(move |(c, cell)| (r.as_str(), c.as_str(), cell))
        })
    }

    /// Number of rows (including rows with no cells)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells across all rows
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(IndexMap::len).sum()
    }

    /// Whether the sheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// The sheet's used range as written to `<dimension ref>`.
    ///
    /// This is the bounding box of every cell address when all of them are
    /// A1 references. If any address is not, the first cell's address is
    /// returned unchanged. `None` for a sheet without cells.
    pub fn dimension(&self) -> Option<String> {
        let mut cells = self.iter_cells().map(|(_, c, _)| c);
        let first = cells.next()?;

        let Ok(addr) = CellAddress::parse(first) else {
            return Some(first.to_string());
        };
        let mut range = CellRange::single(addr);
        for key in cells {
            match CellAddress::parse(key) {
                Ok(addr) => range.extend(addr),
                Err(_) => return Some(first.to_string()),
            }
        }
        Some(range.to_a1_string())
    }
}

/// The map key a `(row, col)` pair is stored under.
fn cell_key(row: &str, col: &str) -> String {
    if is_column_label(col) && !row.is_empty() {
        format!("{}{}", col, row)
    } else {
        col.to_string()
    }
}
