//! Cell-level differences between two snapshots

use std::cmp::Ordering;
use std::fmt;

use sheetdelta_core::CellAddress;

use crate::snapshot::{CellMap, Snapshot};

/// Classification of a single cell difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffKind::Added => "added",
            DiffKind::Removed => "removed",
            DiffKind::Changed => "changed",
        })
    }
}

/// What happened to a cell's value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Change {
    /// Only present after
    Added { to: String },
    /// Only present before
    Removed { from: String },
    /// Present on both sides with different text
    Changed { from: String, to: String },
}

/// One cell that differs between the two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellDiff {
    pub sheet: String,
    pub address: CellAddress,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub change: Change,
}

impl CellDiff {
    pub fn kind(&self) -> DiffKind {
        match self.change {
            Change::Added { .. } => DiffKind::Added,
            Change::Removed { .. } => DiffKind::Removed,
            Change::Changed { .. } => DiffKind::Changed,
        }
    }

    /// Value before the change, absent for added cells
    pub fn from(&self) -> Option<&str> {
        match &self.change {
            Change::Removed { from } | Change::Changed { from, .. } => Some(from),
            Change::Added { .. } => None,
        }
    }

    /// Value after the change, absent for removed cells
    pub fn to(&self) -> Option<&str> {
        match &self.change {
            Change::Added { to } | Change::Changed { to, .. } => Some(to),
            Change::Removed { .. } => None,
        }
    }
}

/// Ordered collection of cell differences
///
/// Sheets appear in the order [`diff`] visits them and cells within a sheet
/// are row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DiffSet {
    diffs: Vec<CellDiff>,
}

impl DiffSet {
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellDiff> {
        self.diffs.iter()
    }

    /// Diffs belonging to one sheet, in order
    pub fn for_sheet<'a>(&'a self, sheet: &'a str) -> impl Iterator<Item = &'a CellDiff> + 'a {
        self.diffs.iter().filter(move |d| d.sheet == sheet)
    }

    /// Names of sheets with at least one diff, in first-appearance order
    pub fn sheets(&self) -> Vec<&str> {
        let mut sheets: Vec<&str> = Vec::new();
        for d in &self.diffs {
            if !sheets.contains(&d.sheet.as_str()) {
                sheets.push(&d.sheet);
            }
        }
        sheets
    }

    pub fn count_for(&self, sheet: &str) -> usize {
        self.for_sheet(sheet).count()
    }
}

impl FromIterator<CellDiff> for DiffSet {
    fn from_iter<I: IntoIterator<Item = CellDiff>>(iter: I) -> Self {
        Self {
            diffs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DiffSet {
    type Item = CellDiff;
    type IntoIter = std::vec::IntoIter<CellDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiffSet {
    type Item = &'a CellDiff;
    type IntoIter = std::slice::Iter<'a, CellDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}

/// Compare two snapshots cell by cell
///
/// Sheets are visited in `before` order, followed by sheets that only exist
/// in `after`. A sheet missing from one side compares against an empty map.
///
/// # Example
///
/// ```rust
/// use sheetdelta::diff::{diff, DiffKind};
/// use sheetdelta::snapshot::{cell_map, Snapshot};
///
/// let before: Snapshot = [("S", cell_map([("A1", "1")]).unwrap())].into_iter().collect();
/// let after: Snapshot = [("S", cell_map([("A1", "2")]).unwrap())].into_iter().collect();
///
/// let diffs = diff(&before, &after);
/// assert_eq!(diffs.len(), 1);
/// assert_eq!(diffs.iter().next().unwrap().kind(), DiffKind::Changed);
/// ```
pub fn diff(before: &Snapshot, after: &Snapshot) -> DiffSet {
    let empty = CellMap::new();
    let mut diffs = Vec::new();

    for sheet in sheet_union(before, after) {
        let old = before.sheet(sheet).unwrap_or(&empty);
        let new = after.sheet(sheet).unwrap_or(&empty);
        diff_cells(sheet, old, new, &mut diffs);
    }

    DiffSet { diffs }
}

fn sheet_union<'a>(before: &'a Snapshot, after: &'a Snapshot) -> Vec<&'a str> {
    let mut names: Vec<&str> = before.sheet_names().collect();
    for name in after.sheet_names() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Merge walk over two row-major maps
fn diff_cells(sheet: &str, before: &CellMap, after: &CellMap, out: &mut Vec<CellDiff>) {
    let mut old = before.iter().peekable();
    let mut new = after.iter().peekable();

    loop {
        let (address, change) = match (old.peek().copied(), new.peek().copied()) {
            (None, None) => break,
            (Some((&address, from)), None) => {
                old.next();
                (address, Change::Removed { from: from.clone() })
            }
            (None, Some((&address, to))) => {
                new.next();
                (address, Change::Added { to: to.clone() })
            }
            (Some((&a, from)), Some((&b, to))) => match a.cmp(&b) {
                Ordering::Less => {
                    old.next();
                    (a, Change::Removed { from: from.clone() })
                }
                Ordering::Greater => {
                    new.next();
                    (b, Change::Added { to: to.clone() })
                }
                Ordering::Equal => {
                    old.next();
                    new.next();
                    if from == to {
                        continue;
                    }
                    (
                        a,
                        Change::Changed {
                            from: from.clone(),
                            to: to.clone(),
                        },
                    )
                }
            },
        };

        out.push(CellDiff {
            sheet: sheet.to_string(),
            address,
            change,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::cell_map;
    use pretty_assertions::assert_eq;

    fn snapshot(sheets: &[(&str, &[(&str, &str)])]) -> Snapshot {
        sheets
            .iter()
            .map(|(name, cells)| (*name, cell_map(cells.iter().copied()).unwrap()))
            .collect()
    }

    fn summary(diffs: &DiffSet) -> Vec<String> {
        diffs
            .iter()
            .map(|d| {
                format!(
                    "{}!{} {} {:?} {:?}",
                    d.sheet,
                    d.address,
                    d.kind(),
                    d.from(),
                    d.to()
                )
            })
            .collect()
    }

    #[test]
    fn test_classifies_each_kind() {
        let before = snapshot(&[("Sheet1", &[("A1", "1"), ("B1", "x")])]);
        let after = snapshot(&[("Sheet1", &[("A1", "2"), ("C1", "y")])]);

        let diffs = diff(&before, &after);
        assert_eq!(
            summary(&diffs),
            vec![
                "Sheet1!A1 changed Some(\"1\") Some(\"2\")",
                "Sheet1!B1 removed Some(\"x\") None",
                "Sheet1!C1 added None Some(\"y\")",
            ]
        );
    }

    #[test]
    fn test_identical_snapshots() {
        let side = snapshot(&[("S", &[("A1", "1"), ("Z9", "")])]);
        assert!(diff(&side, &side).is_empty());
    }

    #[test]
    fn test_empty_string_differs_from_absent() {
        let before = snapshot(&[("S", &[])]);
        let after = snapshot(&[("S", &[("A1", "")])]);
        let diffs = diff(&before, &after);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs.iter().next().unwrap().to(), Some(""));
    }

    #[test]
    fn test_sheet_union_order() {
        let before = snapshot(&[("B", &[("A1", "1")]), ("A", &[("A1", "1")])]);
        let after = snapshot(&[("C", &[("A1", "3")]), ("A", &[("A1", "2")])]);

        let diffs = diff(&before, &after);
        assert_eq!(diffs.sheets(), vec!["B", "A", "C"]);
        assert_eq!(diffs.count_for("B"), 1);
        assert_eq!(diffs.for_sheet("B").next().unwrap().kind(), DiffKind::Removed);
        assert_eq!(diffs.for_sheet("C").next().unwrap().kind(), DiffKind::Added);
    }

    #[test]
    fn test_row_major_order() {
        let before = snapshot(&[("S", &[("B2", "x"), ("AA1", "y")])]);
        let after = snapshot(&[("S", &[("A3", "z"), ("C1", "w")])]);

        let order: Vec<String> = diff(&before, &after)
            .iter()
            .map(|d| d.address.to_string())
            .collect();
        assert_eq!(order, vec!["C1", "AA1", "B2", "A3"]);
    }

    #[test]
    fn test_from_empty_side() {
        let after = snapshot(&[("S", &[("A1", "a"), ("A2", "b")])]);
        let diffs = diff(&Snapshot::empty(), &after);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| d.kind() == DiffKind::Added));
    }
}
