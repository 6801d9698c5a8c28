//! Where snapshot bytes come from
//!
//! A [`SnapshotSource`] answers one question per path: what were this file's
//! bytes on this side of the comparison, if it existed at all? Absence is a
//! normal answer (`Ok(None)`); only failures to ask are errors.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use sheetdelta_core::Workbook;
use sheetdelta_csv::{CsvReadOptions, CsvReader};
use sheetdelta_xlsx::XlsxReader;

use crate::error::{Error, ParseError, Result};
use crate::options::ReportOptions;
use crate::snapshot::{SnapshotBuilder, SnapshotState};

/// Provider of file contents for one side of a comparison
pub trait SnapshotSource {
    /// Bytes of the file at `path`, or `None` when it does not exist
    fn fetch(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Short description used in logs and errors
    fn label(&self) -> String;
}

/// Files on the local file system, relative to a root directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl SnapshotSource for FsSource {
    fn fetch(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn label(&self) -> String {
        self.root.display().to_string()
    }
}

/// Blobs at a revision of a git repository, read with `git show`
///
/// The revision is checked once, on the first fetch. An unknown revision or
/// a directory that is not a repository is an error for every path, never a
/// missing file.
#[derive(Debug, Clone)]
pub struct GitSource {
    repo: PathBuf,
    rev: String,
    verified: OnceLock<std::result::Result<(), String>>,
}

impl GitSource {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(repo: P, rev: S) -> Self {
        Self {
            repo: repo.into(),
            rev: rev.into(),
            verified: OnceLock::new(),
        }
    }

    pub fn rev(&self) -> &str {
        &self.rev
    }

    fn git(&self) -> Command {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.repo);
        command
    }

    fn verify_rev(&self, path: &Path) -> Result<()> {
        let outcome = self.verified.get_or_init(|| {
            let output = self
                .git()
                .args(["rev-parse", "--verify", "--quiet"])
                .arg(format!("{}^{{commit}}", self.rev))
                .output()
                .map_err(|e| format!("failed to run git: {e}"))?;

            if output.status.success() {
                return Ok(());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut message = format!(
                "'{}' is not a commit in '{}'",
                self.rev,
                self.repo.display()
            );
            if !stderr.trim().is_empty() {
                message.push_str(": ");
                message.push_str(stderr.trim());
            }
            Err(message)
        });

        outcome.clone().map_err(|message| Error::SnapshotSource {
            label: self.label(),
            path: path.to_path_buf(),
            message,
        })
    }
}

impl SnapshotSource for GitSource {
    fn fetch(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        self.verify_rev(path)?;

        // Tree paths always use forward slashes
        let object = format!(
            "{}:{}",
            self.rev,
            path.to_string_lossy().replace('\\', "/")
        );

        let output = self
            .git()
            .arg("show")
            .arg(&object)
            .output()
            .map_err(|e| Error::SnapshotSource {
                label: self.label(),
                path: path.to_path_buf(),
                message: format!("failed to run git: {e}"),
            })?;

        if !output.status.success() {
            log::debug!(
                "git show {} failed, treating as missing: {}",
                object,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }

    fn label(&self) -> String {
        format!("git:{}", self.rev)
    }
}

/// Workbook file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Csv,
    Tsv,
}

impl WorkbookFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(WorkbookFormat::Xlsx),
            "csv" => Ok(WorkbookFormat::Csv),
            "tsv" => Ok(WorkbookFormat::Tsv),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse file bytes in this format
    pub fn parse(self, bytes: &[u8]) -> std::result::Result<Workbook, ParseError> {
        let workbook = match self {
            WorkbookFormat::Xlsx => XlsxReader::read_bytes(bytes)?,
            WorkbookFormat::Csv => CsvReader::read_bytes(bytes, &CsvReadOptions::default())?,
            WorkbookFormat::Tsv => CsvReader::read_bytes(bytes, &CsvReadOptions::tsv())?,
        };
        Ok(workbook)
    }
}

/// Fetch, parse and snapshot one side of a file comparison
pub fn load_state(
    source: &dyn SnapshotSource,
    path: &Path,
    options: &ReportOptions,
) -> Result<SnapshotState> {
    let format = WorkbookFormat::from_path(path)?;

    let Some(bytes) = source.fetch(path)? else {
        log::debug!("{} not present in {}", path.display(), source.label());
        return Ok(SnapshotState::Missing);
    };

    let workbook = format
        .parse(&bytes)
        .map_err(|e| Error::MalformedWorkbook {
            path: path.to_path_buf(),
            source: e,
        })?;

    let snapshot = SnapshotBuilder::new(options.scan).build(&workbook)?;
    log::debug!(
        "loaded {} from {}: {} sheets, {} cells",
        path.display(),
        source.label(),
        snapshot.sheet_count(),
        snapshot.cell_count()
    );
    Ok(SnapshotState::from_snapshot(snapshot))
}
