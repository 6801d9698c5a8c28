//! # sheetdelta-xlsx
//!
//! XLSX (Office Open XML) reader for sheetdelta. Produces a
//! [`sheetdelta_core::Workbook`] holding sheet names, declared ranges and
//! cell values; styles, formulas and other parts are not read.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
