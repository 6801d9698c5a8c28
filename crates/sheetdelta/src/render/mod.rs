//! Markdown rendering of a sheet's diffs
//!
//! Each sheet with at least one diff becomes a `### Sheet` subsection: an
//! optional touch summary followed by either a compact change table or a
//! visual grid, depending on [`RenderMode`].

pub mod compact;
pub mod visual;

use crate::diff::DiffSet;
use crate::options::{RenderMode, ReportOptions};
use crate::snapshot::Snapshot;
use crate::summary::{summarize, TouchSummary};

/// Render the subsection for one sheet
///
/// The snapshots are only consulted in visual mode, where unchanged cells
/// fill in the grid around the changes.
pub fn sheet_section(
    sheet: &str,
    diffs: &DiffSet,
    before: &Snapshot,
    after: &Snapshot,
    options: &ReportOptions,
) -> Vec<String> {
    let mut lines = vec![format!("### Sheet: {}", code_span(sheet))];

    if options.include_summary {
        lines.extend(summary_lines(&summarize(diffs, sheet), options.top_n));
    }
    lines.push(String::new());

    match options.mode {
        RenderMode::Compact => {
            lines.extend(compact::table(sheet, diffs, options.max_table_rows));
        }
        RenderMode::Visual => {
            lines.extend(visual::grid(
                sheet,
                diffs,
                before.sheet(sheet),
                after.sheet(sheet),
                &options.palette,
            ));
        }
    }
    lines.push(String::new());
    lines
}

/// The two "touched" lines for a sheet
pub fn summary_lines(summary: &TouchSummary, top_n: usize) -> [String; 2] {
    let rows = join_counts(summary.top_rows(top_n));
    let cols = join_counts(summary.top_cols(top_n));
    [
        format!("**Rows touched (top {top_n}):** {rows}"),
        format!("**Cols touched (top {top_n}):** {cols}"),
    ]
}

fn join_counts<K: std::fmt::Display>(counts: Vec<(K, usize)>) -> String {
    if counts.is_empty() {
        return "—".to_string();
    }
    counts
        .iter()
        .map(|(key, count)| format!("{key}({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inline code span that survives backticks inside the text
pub(crate) fn code_span(text: &str) -> String {
    if text.is_empty() {
        return "` `".to_string();
    }

    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let fence = "`".repeat(longest + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

/// Text safe to place in a Markdown table cell
///
/// Table rows cannot span lines and an unescaped pipe starts a new column,
/// even inside a code span.
pub(crate) fn table_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '|' => out.push_str("\\|"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('↵');
            }
            '\n' => out.push('↵'),
            c => out.push(c),
        }
    }
    out
}
