//! Error types for sheetdelta

use std::path::PathBuf;

use thiserror::Error;

use sheetdelta_csv::CsvError;
use sheetdelta_xlsx::XlsxError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading snapshots
///
/// Rendering never fails; everything here surfaces before a diff exists.
#[derive(Debug, Error)]
pub enum Error {
    /// Core error (bad address or declared range)
    #[error(transparent)]
    Core(#[from] sheetdelta_core::Error),

    /// The bytes for a file could not be interpreted as a workbook at all
    #[error("Malformed workbook '{}': {source}", path.display())]
    MalformedWorkbook {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// No parser for this file extension
    #[error("Unsupported workbook format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The snapshot source failed for a reason other than the file being absent
    #[error("Snapshot source '{label}' failed for '{}': {message}", path.display())]
    SnapshotSource {
        label: String,
        path: PathBuf,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure from one of the workbook parsers
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    #[error(transparent)]
    Csv(#[from] CsvError),
}
