//! sheetdelta CLI - Markdown diff reports for spreadsheets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sheetdelta::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetdelta")]
#[command(
    author,
    version,
    about = "Cell-level spreadsheet diffs rendered as Markdown"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two workbook files on disk
    Files {
        /// Workbook before the change (xlsx, xlsm, csv, tsv); may not exist
        before: PathBuf,

        /// Workbook after the change; may not exist
        after: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Compare workbooks between two git revisions
    Git {
        /// Base revision
        #[arg(long)]
        base: String,

        /// Head revision
        #[arg(long)]
        head: String,

        /// Repository to read from
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Workbook paths relative to the repository root
        #[arg(env = "SHEETDELTA_FILES", value_delimiter = '\n')]
        files: Vec<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Per-sheet rendering
    #[arg(long, value_enum, default_value_t = Mode::Compact)]
    mode: Mode,

    /// Maximum table rows per sheet in compact mode
    #[arg(long, default_value_t = 200)]
    max_rows: usize,

    /// Rows and columns listed in each touch summary
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Leave out the row/column touch summary
    #[arg(long)]
    no_summary: bool,

    /// Which cells of each sheet are compared
    #[arg(long, value_enum, default_value_t = Scan::Defined)]
    scan: Scan,

    /// Report heading
    #[arg(long)]
    title: Option<String>,

    /// Output Markdown file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write every cell diff as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Compact,
    Visual,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scan {
    /// Every defined cell
    Defined,
    /// Only cells inside each sheet's declared dimension
    Declared,
}

impl ReportArgs {
    fn options(&self) -> ReportOptions {
        let mut options = ReportOptions::default()
            .with_mode(match self.mode {
                Mode::Compact => RenderMode::Compact,
                Mode::Visual => RenderMode::Visual,
            })
            .with_max_table_rows(self.max_rows)
            .with_top_n(self.top)
            .with_summary(!self.no_summary)
            .with_scan(match self.scan {
                Scan::Defined => ScanStrategy::DefinedCells,
                Scan::Declared => ScanStrategy::DeclaredRange,
            });
        if let Some(title) = &self.title {
            options = options.with_title(title.as_str());
        }
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Files {
            before,
            after,
            report,
        } => compare_files(&before, &after, &report),
        Commands::Git {
            base,
            head,
            repo,
            files,
            report,
        } => compare_revisions(&repo, &base, &head, &files, &report),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(io::stderr)
        .init();
}

fn compare_files(before: &Path, after: &Path, args: &ReportArgs) -> Result<()> {
    let options = args.options();
    let source = FsSource::new(".");

    let old = load_state(&source, before, &options)
        .with_context(|| format!("Failed to load '{}'", before.display()))?;
    let new = load_state(&source, after, &options)
        .with_context(|| format!("Failed to load '{}'", after.display()))?;

    let mut report = ReportBuilder::new(options);
    report.add_file(after.display().to_string(), old, new);
    emit(&report, args)
}

fn compare_revisions(
    repo: &Path,
    base: &str,
    head: &str,
    files: &[PathBuf],
    args: &ReportArgs,
) -> Result<()> {
    let options = args.options().with_labels(base, head);
    let old_source = GitSource::new(repo, base);
    let new_source = GitSource::new(repo, head);

    let mut report = ReportBuilder::new(options.clone());
    for path in files.iter().filter(|p| !p.as_os_str().is_empty()) {
        let old = load_state(&old_source, path, &options)
            .with_context(|| format!("Failed to load '{}' at {}", path.display(), base))?;
        let new = load_state(&new_source, path, &options)
            .with_context(|| format!("Failed to load '{}' at {}", path.display(), head))?;
        report.add_file(path.display().to_string(), old, new);
    }

    if report.files().is_empty() {
        tracing::warn!("no workbook files given; pass paths or set SHEETDELTA_FILES");
    }
    emit(&report, args)
}

/// Write the Markdown report and, when requested, the JSON artifact
fn emit(report: &ReportBuilder, args: &ReportArgs) -> Result<()> {
    let markdown = report.render();

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &markdown)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        tracing::info!(
            "wrote report for {} files to '{}'",
            report.files().len(),
            output_path.display()
        );
    } else {
        io::stdout()
            .write_all(markdown.as_bytes())
            .context("Failed to write to stdout")?;
    }

    if let Some(json_path) = &args.json {
        let json = serde_json::to_string_pretty(&artifact(report))
            .context("Failed to serialize diff artifact")?;
        std::fs::write(json_path, json)
            .with_context(|| format!("Failed to write '{}'", json_path.display()))?;
        tracing::info!("wrote diff artifact to '{}'", json_path.display());
    }

    Ok(())
}

/// Full, untruncated diff listing for one file
#[derive(Serialize)]
struct FileArtifact<'a> {
    path: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    diffs: Option<&'a DiffSet>,
    summaries: Vec<TouchSummary>,
}

fn artifact(report: &ReportBuilder) -> Vec<FileArtifact<'_>> {
    report
        .files()
        .iter()
        .map(|file| {
            let diffs = file.outcome.diffs();
            let status = match &file.outcome {
                FileOutcome::Added => "added",
                FileOutcome::Removed => "removed",
                FileOutcome::MissingBoth => "missing",
                FileOutcome::Compared { diffs, .. } if diffs.is_empty() => "unchanged",
                FileOutcome::Compared { .. } => "changed",
            };
            let summaries = diffs
                .map(|d| d.sheets().into_iter().map(|s| summarize(d, s)).collect())
                .unwrap_or_default();
            FileArtifact {
                path: &file.path,
                status,
                diffs,
                summaries,
            }
        })
        .collect()
}
