//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheetdelta_core::{CellValue, Error, Workbook, Worksheet, MAX_COLS, MAX_ROWS};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a single-sheet workbook
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV bytes into a single-sheet workbook
    pub fn read_bytes(bytes: &[u8], options: &CsvReadOptions) -> CsvResult<Workbook> {
        Self::read(bytes, options)
    }

    /// Read CSV from a reader into a single-sheet workbook
    ///
    /// Every record, including the first line, is a row; there is no header
    /// handling because a header row is ordinary content to a diff.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(options.sheet_name.as_str());

        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx)
                .map_err(|_| Error::RowOutOfBounds(u32::MAX, MAX_ROWS - 1))?;

            for (col_idx, field) in record.iter().enumerate() {
                let col = u16::try_from(col_idx)
                    .map_err(|_| Error::ColumnOutOfBounds(col_idx as u32, MAX_COLS - 1))?;

                let value = if options.auto_detect_types {
                    Self::detect_type(field)
                } else if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::string(field)
                };

                worksheet.set_value_at(row, col, value)?;
            }
        }

        let mut workbook = Workbook::empty();
        workbook.add_existing_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Detect the type of a field value
    ///
    /// A field is typed only when the typed value normalizes back to the
    /// exact field text, so distinct texts never collapse into one value.
    fn detect_type(field: &str) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }

        let typed = match field {
            "true" => CellValue::Boolean(true),
            "false" => CellValue::Boolean(false),
            _ => match field.parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                _ => return CellValue::string(field),
            },
        };

        if typed.normalize().as_deref() == Some(field) {
            typed
        } else {
            CellValue::string(field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cells(workbook: &Workbook) -> Vec<(String, CellValue)> {
        workbook
            .worksheet(0)
            .unwrap()
            .cells()
            .map(|(addr, v)| (addr.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_read_rows_and_types() {
        let data = "name,qty,active\nwidget,3,true\n,2.5,\n";
        let workbook = CsvReader::read_bytes(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(workbook.sheet_names(), ["Sheet1"]);
        assert_eq!(
            cells(&workbook),
            vec![
                ("A1".to_string(), CellValue::string("name")),
                ("B1".to_string(), CellValue::string("qty")),
                ("C1".to_string(), CellValue::string("active")),
                ("A2".to_string(), CellValue::string("widget")),
                ("B2".to_string(), CellValue::Number(3.0)),
                ("C2".to_string(), CellValue::Boolean(true)),
                ("B3".to_string(), CellValue::Number(2.5)),
            ]
        );
    }

    #[test]
    fn test_detect_type_keeps_non_numeric_text() {
        for text in ["inf", "NaN", " 1", "1 ", "1e", "12abc", "-"] {
            assert_eq!(CsvReader::detect_type(text), CellValue::string(text), "{text:?}");
        }
        assert_eq!(CsvReader::detect_type("-4"), CellValue::Number(-4.0));
        assert_eq!(CsvReader::detect_type("0.25"), CellValue::Number(0.25));
        assert_eq!(CsvReader::detect_type("false"), CellValue::Boolean(false));
    }

    #[test]
    fn test_detect_type_keeps_text_that_would_not_survive() {
        for text in [
            "12345678901234567890",
            "0.10",
            "007",
            "+4",
            "-0",
            "1e3",
            ".5",
            "TRUE",
            "False",
        ] {
            assert_eq!(CsvReader::detect_type(text), CellValue::string(text), "{text:?}");
        }
    }

    #[test]
    fn test_text_mode_and_ragged_rows() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            sheet_name: "data".into(),
            ..CsvReadOptions::default()
        };
        let workbook = CsvReader::read_bytes(b"1,2,3\n4\n", &options).unwrap();

        assert_eq!(workbook.sheet_names(), ["data"]);
        assert_eq!(
            cells(&workbook),
            vec![
                ("A1".to_string(), CellValue::string("1")),
                ("B1".to_string(), CellValue::string("2")),
                ("C1".to_string(), CellValue::string("3")),
                ("A2".to_string(), CellValue::string("4")),
            ]
        );
    }

    #[test]
    fn test_tsv() {
        let workbook = CsvReader::read_bytes(b"a\tb\n", &CsvReadOptions::tsv()).unwrap();
        assert_eq!(workbook.worksheet(0).unwrap().cell_count(), 2);
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "x,\"quoted, comma\"\n").unwrap();

        let workbook = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();
        assert_eq!(
            workbook.worksheet(0).unwrap().value("B1").unwrap(),
            Some(&CellValue::string("quoted, comma"))
        );
    }
}
