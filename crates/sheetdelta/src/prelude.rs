//! Prelude module - common imports for sheetdelta users
//!
//! ```rust
//! use sheetdelta::prelude::*;
//! ```

// Snapshots
pub use crate::{
    load_state, FsSource, GitSource, ScanStrategy, Snapshot, SnapshotBuilder, SnapshotSource,
    SnapshotState, WorkbookFormat,
};

// Diffing
pub use crate::{diff, summarize, CellDiff, Change, DiffKind, DiffSet, TouchSummary};

// Reporting
pub use crate::{FileOutcome, RenderMode, ReportBuilder, ReportOptions};

// Workbook model
pub use crate::{CellAddress, Workbook};

// Error types
pub use crate::{Error, Result};
