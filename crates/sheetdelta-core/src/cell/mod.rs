//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular bound (e.g., "A1:B10")
//! - [`CellValue`] - The value stored in a cell, before normalization

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellError, CellValue, SharedString};
