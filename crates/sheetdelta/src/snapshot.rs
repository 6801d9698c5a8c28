//! Workbook snapshots
//!
//! A [`Snapshot`] is the normalized, diffable view of a workbook: for each
//! sheet, a sparse map from cell address to the cell's text. Cells holding
//! no value ([`CellValue::Empty`]) are left out of the map; a cell holding an
//! empty string is kept as the value `""`.
//!
//! [`CellValue::Empty`]: sheetdelta_core::CellValue::Empty

use std::collections::BTreeMap;

use sheetdelta_core::{CellAddress, CellRange, Workbook, Worksheet};

use crate::error::Result;

/// Normalized cells of one sheet, ordered row-major
pub type CellMap = BTreeMap<CellAddress, String>;

/// Build a [`CellMap`] from `(A1, value)` pairs
///
/// # Example
///
/// ```rust
/// use sheetdelta::snapshot::cell_map;
///
/// let cells = cell_map([("B2", "x"), ("A1", "1")]).unwrap();
/// assert_eq!(cells.keys().next().unwrap().to_string(), "A1");
/// ```
pub fn cell_map<'a, I>(pairs: I) -> Result<CellMap>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(address, value)| Ok((CellAddress::parse(address)?, value.to_string())))
        .collect()
}

/// Per-sheet cell maps of one workbook, in workbook sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    sheets: Vec<(String, CellMap)>,
}

impl Snapshot {
    /// A snapshot with no sheets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert a sheet, replacing the cells of an existing sheet with the same
    /// name in place
    pub fn insert_sheet<S: Into<String>>(&mut self, name: S, cells: CellMap) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = cells,
            None => self.sheets.push((name, cells)),
        }
    }

    /// Cells of a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&CellMap> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, cells)| cells)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    /// Sheets with their cells, in workbook order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &CellMap)> {
        self.sheets.iter().map(|(name, cells)| (name.as_str(), cells))
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Total number of populated cells across all sheets
    pub fn cell_count(&self) -> usize {
        self.sheets.iter().map(|(_, cells)| cells.len()).sum()
    }

    /// True when there are no sheets or no sheet has a populated cell
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

impl<S: Into<String>> FromIterator<(S, CellMap)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (S, CellMap)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::empty();
        for (name, cells) in iter {
            snapshot.insert_sheet(name, cells);
        }
        snapshot
    }
}

/// Which cells of a sheet the builder considers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Every defined cell, regardless of the sheet's declared dimension
    #[default]
    DefinedCells,
    /// Only defined cells inside the declared dimension (A1 when undeclared)
    DeclaredRange,
}

/// Turns parsed workbooks into snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotBuilder {
    strategy: ScanStrategy,
}

impl SnapshotBuilder {
    /// Create a builder with the given scan strategy
    pub fn new(strategy: ScanStrategy) -> Self {
        Self { strategy }
    }

    /// The scan strategy in use
    pub fn strategy(&self) -> ScanStrategy {
        self.strategy
    }

    /// Build a snapshot of every sheet in the workbook
    pub fn build(&self, workbook: &Workbook) -> Result<Snapshot> {
        let mut snapshot = Snapshot::empty();
        for worksheet in workbook.worksheets() {
            let cells = self.scan(worksheet)?;
            log::debug!(
                "snapshot sheet '{}': {} populated cells",
                worksheet.name(),
                cells.len()
            );
            snapshot.insert_sheet(worksheet.name(), cells);
        }
        Ok(snapshot)
    }

    fn scan(&self, worksheet: &Worksheet) -> Result<CellMap> {
        let bound = match self.strategy {
            ScanStrategy::DefinedCells => None,
            ScanStrategy::DeclaredRange => {
                Some(CellRange::parse_declared(worksheet.declared_range())?)
            }
        };

        let cells = worksheet
            .cells()
            .filter(|(address, _)| bound.map_or(true, |range| range.contains(address)))
            .filter_map(|(address, value)| value.normalize().map(|text| (address, text)))
            .collect();
        Ok(cells)
    }
}

/// One side of a file comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    /// The file does not exist on this side
    Missing,
    /// The file exists but has no populated cell
    Empty,
    /// The file exists and has at least one populated cell
    Populated(Snapshot),
}

impl SnapshotState {
    /// Classify an existing file's snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        if snapshot.is_empty() {
            SnapshotState::Empty
        } else {
            SnapshotState::Populated(snapshot)
        }
    }

    /// True unless the file is missing
    pub fn exists(&self) -> bool {
        !matches!(self, SnapshotState::Missing)
    }

    /// The snapshot to diff against; empty for `Missing` and `Empty`
    pub fn snapshot(&self) -> Snapshot {
        match self {
            SnapshotState::Populated(snapshot) => snapshot.clone(),
            SnapshotState::Missing | SnapshotState::Empty => Snapshot::empty(),
        }
    }

    /// Borrow the snapshot, if populated
    pub fn as_snapshot(&self) -> Option<&Snapshot> {
        match self {
            SnapshotState::Populated(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
