//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Storage is sparse: only cells holding a value are kept, keyed row-major.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Range reference the file declared for this sheet (e.g. "A1:D20"),
    /// which may disagree with where the cells actually are
    dimension: Option<String>,
    /// Cell storage
    cells: BTreeMap<CellAddress, CellValue>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            dimension: None,
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared range reference, if the source file carried one
    pub fn declared_range(&self) -> Option<&str> {
        self.dimension.as_deref()
    }

    /// Set the declared range reference
    pub fn set_dimension<S: Into<String>>(&mut self, reference: Option<S>) {
        self.dimension = reference.map(Into::into);
    }

    // === Cell Access ===

    /// Get a cell value by row and column indices
    pub fn value_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&CellAddress::new(row, col))
    }

    /// Get a cell value by address string (e.g., "A1")
    pub fn value(&self, address: &str) -> Result<Option<&CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(&addr))
    }

    /// Iterate over defined cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &CellValue)> + '_ {
        self.cells.iter().map(|(addr, value)| (*addr, value))
    }

    /// Number of defined cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    ///
    /// Storing [`CellValue::Empty`] clears the cell.
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let addr = CellAddress::new(row, col);
        match value.into() {
            CellValue::Empty => {
                self.cells.remove(&addr);
            }
            value => {
                self.cells.insert(addr, value);
            }
        }
        Ok(())
    }

    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut ws = Worksheet::new("Data");
        ws.set_value("B2", "x").unwrap();
        ws.set_value_at(0, 0, 1.5).unwrap();

        assert_eq!(ws.value("B2").unwrap(), Some(&CellValue::string("x")));
        assert_eq!(ws.value_at(0, 0), Some(&CellValue::Number(1.5)));
        assert_eq!(ws.value_at(5, 5), None);
        assert_eq!(ws.cell_count(), 2);
    }

    #[test]
    fn test_empty_value_clears_cell() {
        let mut ws = Worksheet::new("Data");
        ws.set_value("A1", "x").unwrap();
        ws.set_value("A1", CellValue::Empty).unwrap();
        assert!(ws.is_empty());

        // An empty string is still a value
        ws.set_value("A1", "").unwrap();
        assert_eq!(ws.cell_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Data");
        assert!(matches!(
            ws.set_value_at(MAX_ROWS, 0, 1),
            Err(Error::RowOutOfBounds(..))
        ));
        assert!(matches!(
            ws.set_value_at(0, MAX_COLS, 1),
            Err(Error::ColumnOutOfBounds(..))
        ));
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let mut ws = Worksheet::new("Data");
        ws.set_value("B2", 1).unwrap();
        ws.set_value("C1", 2).unwrap();
        ws.set_value("A2", 3).unwrap();

        let order: Vec<String> = ws.cells().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, ["C1", "A2", "B2"]);
    }

    #[test]
    fn test_declared_range() {
        let mut ws = Worksheet::new("Data");
        assert_eq!(ws.declared_range(), None);
        ws.set_dimension(Some("A1:C3"));
        assert_eq!(ws.declared_range(), Some("A1:C3"));
    }
}
