//! Compact mode: one table row per changed cell

use super::{code_span, table_text};
use crate::diff::{CellDiff, Change, DiffSet};

/// Change table for one sheet, truncated to `max_rows` rows
pub fn table(sheet: &str, diffs: &DiffSet, max_rows: usize) -> Vec<String> {
    let mut lines = vec!["| Cell | Change |".to_string(), "|---|---|".to_string()];

    let total = diffs.count_for(sheet);
    lines.extend(diffs.for_sheet(sheet).take(max_rows).map(row));

    if total > max_rows {
        lines.push(format!(
            "_…and {} more cells (see artifact for full list)._",
            total - max_rows
        ));
    }
    lines
}

fn row(d: &CellDiff) -> String {
    format!(
        "| {}!{} | {} |",
        table_text(&d.sheet),
        d.address,
        change_text(&d.change)
    )
}

fn change_text(change: &Change) -> String {
    let value = |text: &str| table_text(&code_span(text));
    match change {
        Change::Changed { from, to } => format!("{} → {}", value(from), value(to)),
        Change::Added { to } => format!("⊕ {}", value(to)),
        Change::Removed { from } => format!("⊖ {}", value(from)),
    }
}
