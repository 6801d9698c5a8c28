//! Row and column touch counts for a sheet's diffs

use std::hash::Hash;

use ahash::AHashMap;

use crate::diff::DiffSet;

/// How often each row and column of one sheet was touched by a diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TouchSummary {
    pub sheet: String,
    /// 1-based row numbers with counts, in first-occurrence order
    pub rows: Vec<(u32, usize)>,
    /// Column letters with counts, in first-occurrence order
    pub cols: Vec<(String, usize)>,
}

impl TouchSummary {
    /// The `n` most touched rows; ties keep first-occurrence order
    pub fn top_rows(&self, n: usize) -> Vec<(u32, usize)> {
        top(&self.rows, n)
    }

    /// The `n` most touched columns; ties keep first-occurrence order
    pub fn top_cols(&self, n: usize) -> Vec<(String, usize)> {
        top(&self.cols, n)
    }

    pub fn total_row_touches(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    pub fn total_col_touches(&self) -> usize {
        self.cols.iter().map(|(_, count)| count).sum()
    }
}

/// Count touched rows and columns among the diffs of `sheet`
pub fn summarize(diffs: &DiffSet, sheet: &str) -> TouchSummary {
    let mut rows = Tally::default();
    let mut cols = Tally::default();

    for d in diffs.for_sheet(sheet) {
        rows.bump(d.address.display_row());
        cols.bump(d.address.column_letters());
    }

    TouchSummary {
        sheet: sheet.to_string(),
        rows: rows.counts,
        cols: cols.counts,
    }
}

fn top<K: Clone>(counts: &[(K, usize)], n: usize) -> Vec<(K, usize)> {
    let mut sorted = counts.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(n);
    sorted
}

/// Insertion-ordered counter
struct Tally<K> {
    index: AHashMap<K, usize>,
    counts: Vec<(K, usize)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: AHashMap::new(),
            counts: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> Tally<K> {
    fn bump(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::snapshot::{cell_map, Snapshot};
    use pretty_assertions::assert_eq;

    fn diffs() -> DiffSet {
        let before: Snapshot = [("S", cell_map([("C5", "x"), ("A3", "1")]).unwrap())]
            .into_iter()
            .collect();
        let after: Snapshot = [
            (
                "S",
                cell_map([("C3", "new"), ("A3", "2"), ("C5", "y")]).unwrap(),
            ),
            ("Other", cell_map([("Z1", "z")]).unwrap()),
        ]
        .into_iter()
        .collect();
        diff(&before, &after)
    }

    #[test]
    fn test_first_occurrence_order() {
        let summary = summarize(&diffs(), "S");
        // Diff order is A3, C3, C5
        assert_eq!(summary.rows, vec![(3, 2), (5, 1)]);
        assert_eq!(
            summary.cols,
            vec![("A".to_string(), 1), ("C".to_string(), 2)]
        );
    }

    #[test]
    fn test_top_is_stable_descending() {
        let summary = summarize(&diffs(), "S");
        assert_eq!(summary.top_cols(10), vec![("C".to_string(), 2), ("A".to_string(), 1)]);
        assert_eq!(summary.top_rows(1), vec![(3, 2)]);

        let tied = TouchSummary {
            sheet: "S".into(),
            rows: vec![(9, 1), (2, 3), (4, 1), (1, 3)],
            cols: Vec::new(),
        };
        assert_eq!(tied.top_rows(3), vec![(2, 3), (1, 3), (9, 1)]);
        assert!(tied.top_cols(5).is_empty());
    }

    #[test]
    fn test_totals_match_sheet_diffs() {
        let diffs = diffs();
        for sheet in ["S", "Other", "Missing"] {
            let summary = summarize(&diffs, sheet);
            assert_eq!(summary.total_row_touches(), diffs.count_for(sheet));
            assert_eq!(summary.total_col_touches(), diffs.count_for(sheet));
        }
    }
}
