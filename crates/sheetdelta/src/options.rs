//! Report options

use crate::snapshot::ScanStrategy;

/// How each sheet's changes are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Markdown table with one row per changed cell
    #[default]
    Compact,
    /// HTML grid of the sheet with changed cells colored
    Visual,
}

/// Legend label plus the colors used for one kind of change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    /// Name shown in the legend
    pub label: String,
    /// Cell background color
    pub background: String,
    /// Color of the highlighted value text
    pub text: String,
}

impl Swatch {
    pub fn new(label: &str, background: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            background: background.to_string(),
            text: text.to_string(),
        }
    }
}

/// Colors for the visual grid and its legend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub modified: Swatch,
    pub added: Swatch,
    pub removed: Swatch,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            modified: Swatch::new("Yellow", "yellow", "orange"),
            added: Swatch::new("Green", "green", "green"),
            removed: Swatch::new("Red", "red", "red"),
        }
    }
}

/// Options for building and rendering a report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Report heading
    pub title: String,
    pub mode: RenderMode,
    /// Maximum table rows per sheet in compact mode
    pub max_table_rows: usize,
    /// Entries shown in each touch summary line
    pub top_n: usize,
    /// Emit the row/column touch summary for each sheet
    pub include_summary: bool,
    /// Which cells snapshots are built from
    pub scan: ScanStrategy,
    pub palette: Palette,
    /// Name of the "before" revision, shown when both labels are set
    pub base_label: Option<String>,
    /// Name of the "after" revision, shown when both labels are set
    pub head_label: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Spreadsheet Diff Report".to_string(),
            mode: RenderMode::Compact,
            max_table_rows: 200,
            top_n: 10,
            include_summary: true,
            scan: ScanStrategy::DefinedCells,
            palette: Palette::default(),
            base_label: None,
            head_label: None,
        }
    }
}

impl ReportOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report heading
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    /// Set the render mode
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the compact table row limit
    pub fn with_max_table_rows(mut self, rows: usize) -> Self {
        self.max_table_rows = rows;
        self
    }

    /// Set how many rows and columns the touch summary lists
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Enable or disable the touch summary
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    /// Set the scan strategy
    pub fn with_scan(mut self, scan: ScanStrategy) -> Self {
        self.scan = scan;
        self
    }

    /// Set the color palette
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Label the two sides of the comparison
    pub fn with_labels<B: Into<String>, H: Into<String>>(mut self, base: B, head: H) -> Self {
        self.base_label = Some(base.into());
        self.head_label = Some(head.into());
        self
    }
}
