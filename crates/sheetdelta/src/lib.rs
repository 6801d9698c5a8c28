//! # sheetdelta
//!
//! Cell-level diffs of spreadsheet workbooks, rendered as Markdown reports
//! suitable for pull request comments.
//!
//! ## Pipeline
//!
//! - A [`SnapshotSource`] yields a file's bytes on one side (working tree,
//!   git revision), or reports that the file does not exist there
//! - The bytes are parsed (XLSX, CSV, TSV) and normalized into a [`Snapshot`]:
//!   per sheet, a sparse map from cell address to text
//! - [`diff`](diff::diff) compares two snapshots into a [`DiffSet`] of added,
//!   removed and changed cells
//! - [`ReportBuilder`] renders one or more file comparisons as Markdown, in
//!   compact (table) or visual (colored grid) mode
//!
//! ## Example
//!
//! ```rust
//! use sheetdelta::prelude::*;
//! use sheetdelta::snapshot::cell_map;
//!
//! let before: Snapshot = [("Sheet1", cell_map([("A1", "1"), ("B1", "x")]).unwrap())]
//!     .into_iter()
//!     .collect();
//! let after: Snapshot = [("Sheet1", cell_map([("A1", "2"), ("C1", "y")]).unwrap())]
//!     .into_iter()
//!     .collect();
//!
//! let diffs = diff(&before, &after);
//! assert_eq!(diffs.len(), 3);
//!
//! let summary = summarize(&diffs, "Sheet1");
//! assert_eq!(summary.rows, vec![(1, 3)]);
//! ```

pub mod diff;
pub mod error;
pub mod options;
pub mod prelude;
pub mod render;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod summary;

pub use diff::{diff, CellDiff, Change, DiffKind, DiffSet};
pub use error::{Error, ParseError, Result};
pub use options::{Palette, RenderMode, ReportOptions, Swatch};
pub use report::{FileOutcome, FileReport, ReportBuilder};
pub use snapshot::{CellMap, ScanStrategy, Snapshot, SnapshotBuilder, SnapshotState};
pub use source::{load_state, FsSource, GitSource, SnapshotSource, WorkbookFormat};
pub use summary::{summarize, TouchSummary};

// Re-export the workbook model
pub use sheetdelta_core::{CellAddress, CellRange, CellValue, Workbook, Worksheet};

// Re-export parser types
pub use sheetdelta_csv::{CsvError, CsvReadOptions, CsvReader};
pub use sheetdelta_xlsx::{XlsxError, XlsxReader};
