//! Multi-file Markdown report

use crate::diff::{diff, DiffSet};
use crate::options::{RenderMode, ReportOptions};
use crate::render::{code_span, sheet_section, visual};
use crate::snapshot::{Snapshot, SnapshotState};

/// How one file compares between the two sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Absent before, present after
    Added,
    /// Present before, absent after
    Removed,
    /// Absent on both sides
    MissingBoth,
    /// Present on both sides; `diffs` may be empty
    Compared {
        diffs: DiffSet,
        before: Snapshot,
        after: Snapshot,
    },
}

impl FileOutcome {
    /// Classify a pair of snapshot states, diffing when both sides exist
    pub fn compare(before: SnapshotState, after: SnapshotState) -> Self {
        match (before.exists(), after.exists()) {
            (false, false) => FileOutcome::MissingBoth,
            (false, true) => FileOutcome::Added,
            (true, false) => FileOutcome::Removed,
            (true, true) => {
                let before = before.snapshot();
                let after = after.snapshot();
                FileOutcome::Compared {
                    diffs: diff(&before, &after),
                    before,
                    after,
                }
            }
        }
    }

    /// Cell diffs, when both sides exist
    pub fn diffs(&self) -> Option<&DiffSet> {
        match self {
            FileOutcome::Compared { diffs, .. } => Some(diffs),
            _ => None,
        }
    }
}

/// One file's entry in the report
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: String,
    pub outcome: FileOutcome,
}

/// Collects file comparisons and renders them as one Markdown document
///
/// # Example
///
/// ```rust
/// use sheetdelta::prelude::*;
/// use sheetdelta::snapshot::cell_map;
///
/// let before: Snapshot = [("Sheet1", cell_map([("A1", "1")]).unwrap())].into_iter().collect();
/// let after: Snapshot = [("Sheet1", cell_map([("A1", "2")]).unwrap())].into_iter().collect();
///
/// let mut report = ReportBuilder::new(ReportOptions::default());
/// report.add_file(
///     "book.xlsx",
///     SnapshotState::from_snapshot(before),
///     SnapshotState::from_snapshot(after),
/// );
///
/// let markdown = report.render();
/// assert!(markdown.contains("| Sheet1!A1 | `1` → `2` |"));
/// ```
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    options: ReportOptions,
    files: Vec<FileReport>,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Compare one file and append it to the report
    pub fn add_file<S: Into<String>>(
        &mut self,
        path: S,
        before: SnapshotState,
        after: SnapshotState,
    ) -> &FileReport {
        let report = FileReport {
            path: path.into(),
            outcome: FileOutcome::compare(before, after),
        };
        if let Some(diffs) = report.outcome.diffs() {
            log::debug!("{}: {} cell changes", report.path, diffs.len());
        }
        self.files.push(report);
        &self.files[self.files.len() - 1]
    }

    pub fn files(&self) -> &[FileReport] {
        &self.files
    }

    /// Render the whole report; lines are joined with `\n`
    pub fn render(&self) -> String {
        let options = &self.options;
        let mut lines = vec![format!("# {}", options.title)];

        if let (Some(base), Some(head)) = (&options.base_label, &options.head_label) {
            lines.push(format!("Base: {} → Head: {}", code_span(base), code_span(head)));
        }
        lines.push(format!("Changed files: **{}**", self.files.len()));
        lines.push(String::new());

        if options.mode == RenderMode::Visual {
            lines.extend(visual::legend(&options.palette));
            lines.push(String::new());
        }

        for file in &self.files {
            lines.push(format!("## {}", file.path));
            match &file.outcome {
                FileOutcome::Added => lines.push("_Added file_".to_string()),
                FileOutcome::Removed => lines.push("_Removed file_".to_string()),
                FileOutcome::MissingBoth => lines.push("_Missing from both sides_".to_string()),
                FileOutcome::Compared { diffs, .. } if diffs.is_empty() => {
                    lines.push("No cell changes.".to_string())
                }
                FileOutcome::Compared {
                    diffs,
                    before,
                    after,
                } => {
                    lines.push(format!("**Total cell changes:** {}", diffs.len()));
                    lines.push(String::new());
                    for sheet in diffs.sheets() {
                        lines.extend(sheet_section(sheet, diffs, before, after, options));
                    }
                    // sheet sections already end with a blank line
                    continue;
                }
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}
