//! # sheetdelta-core
//!
//! Core data structures for the sheetdelta spreadsheet diff tool.
//!
//! This crate provides the fundamental types used throughout sheetdelta:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and range bounds
//! - [`CellValue`] - Tagged cell values and their normalization to text
//! - [`Workbook`], [`Worksheet`] - The parsed document that snapshots are built from
//!
//! ## Example
//!
//! ```rust
//! use sheetdelta_core::{CellAddress, CellValue, Workbook};
//!
//! let mut workbook = Workbook::empty();
//! let idx = workbook.add_worksheet_with_name("Sheet1").unwrap();
//! let sheet = workbook.worksheet_mut(idx).unwrap();
//!
//! sheet.set_value("A1", "Hello").unwrap();
//! sheet.set_value_at(0, 1, CellValue::Number(42.0)).unwrap();
//!
//! let addr = CellAddress::parse("B1").unwrap();
//! assert_eq!(sheet.value_at(addr.row, addr.col).and_then(|v| v.normalize()), Some("42".into()));
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellRange, CellValue, SharedString};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
