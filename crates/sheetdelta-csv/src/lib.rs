//! # sheetdelta-csv
//!
//! CSV reader for sheetdelta. A CSV file becomes a workbook with one sheet.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
