//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetdelta_core::{CellAddress, CellError, CellValue, Workbook, Worksheet, MAX_COLS};

const CONTENT_TYPES: &str = "[Content_Types].xml";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);

    result
}

/// Read an attribute by local name (namespace prefix ignored)
fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.into_owned()))
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from an in-memory package
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Workbook> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name(CONTENT_TYPES).is_err() {
            return Err(XlsxError::InvalidFormat(format!(
                "Missing {}",
                CONTENT_TYPES
            )));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                // Chartsheets and dialog sheets have no cell grid
                log::debug!("Skipping sheet '{}': {} is not a worksheet", name, r_id);
                continue;
            };

            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(&mut archive, path, &mut worksheet, &shared_strings)?;
            log::debug!(
                "Read sheet '{}' from {}: {} cells, dimension {:?}",
                name,
                path,
                worksheet.cell_count(),
                worksheet.declared_range()
            );
            workbook.add_existing_worksheet(worksheet)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name(SHARED_STRINGS) {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) are annotations, not part of the text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e
                        .unescape()
                        .map_err(|err| XlsxError::xml(SHARED_STRINGS, err))?;
                    current_string.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    current_string.push_str(&String::from_utf8_lossy(&e));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::xml(SHARED_STRINGS, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name(WORKBOOK_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_PART.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    // `r:id`; the prefix varies between producers
                    match (attr_value(&e, b"name"), attr_value(&e, b"id")) {
                        (Some(name), Some(r_id)) => sheets.push((name, r_id)),
                        _ => log::warn!("Ignoring <sheet> without name or r:id"),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::xml(WORKBOOK_PART, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths keyed by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name(WORKBOOK_RELS)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_RELS.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            rels.insert(id, resolve_target(&target));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::xml(WORKBOOK_RELS, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part: declared dimension plus cell values
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut cursor = RowCursor::default();
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => cursor.start_row(attr_value(&e, b"r"))?,
                    b"c" => cell = Some(cursor.start_cell(&e)?),
                    b"v" if cell.is_some() => in_value = true,
                    b"is" if cell.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    b"dimension" => worksheet.set_dimension(attr_value(&e, b"ref")),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => cursor.start_row(attr_value(&e, b"r"))?,
                    // A valueless cell still occupies its column
                    b"c" => {
                        cursor.start_cell(&e)?;
                    }
                    b"dimension" => worksheet.set_dimension(attr_value(&e, b"ref")),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            pending.apply(worksheet, shared_strings)?;
                        }
                        in_value = false;
                        in_inline_str = false;
                        in_inline_text = false;
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    let text = e.unescape().map_err(|err| XlsxError::xml(path, err))?;
                    if let Some(pending) = cell.as_mut() {
                        let target = if in_value {
                            &mut pending.value
                        } else {
                            &mut pending.inline
                        };
                        target.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::xml(path, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

/// Resolve a relationship target (relative to `xl/`, or package-absolute)
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

/// Tracks the implicit position of cells that omit their `r` attribute
#[derive(Debug, Default)]
struct RowCursor {
    /// 0-based row of the current `<row>`
    row: Option<u32>,
    /// Column the next unaddressed cell lands in
    next_col: u32,
}

impl RowCursor {
    fn start_row(&mut self, r: Option<String>) -> XlsxResult<()> {
        let explicit = r.and_then(|r| r.parse::<u32>().ok()).map(|r| r.saturating_sub(1));
        let row = match (explicit, self.row) {
            (Some(row), _) => row,
            (None, Some(prev)) => prev.checked_add(1).ok_or_else(|| {
                let last = u64::from(prev) + 1;
                XlsxError::Parse(format!("Row index overflows after row {}", last))
            })?,
            (None, None) => 0,
        };
        self.row = Some(row);
        self.next_col = 0;
        Ok(())
    }

    fn start_cell(&mut self, e: &BytesStart<'_>) -> XlsxResult<PendingCell> {
        let address = match attr_value(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
            })?,
            None => {
                if self.next_col >= MAX_COLS as u32 {
                    return Err(XlsxError::Parse(
                        "Too many cells in row without references".into(),
                    ));
                }
                CellAddress::new(self.row.unwrap_or(0), self.next_col as u16)
            }
        };
        self.next_col = address.col as u32 + 1;

        Ok(PendingCell {
            address,
            cell_type: attr_value(e, b"t"),
            value: None,
            inline: None,
        })
    }
}

/// A `<c>` element collected until its end tag
#[derive(Debug)]
struct PendingCell {
    address: CellAddress,
    cell_type: Option<String>,
    /// Text of `<v>` (a formula's cached result for formula cells)
    value: Option<String>,
    /// Text of `<is><t>` for inline strings
    inline: Option<String>,
}

impl PendingCell {
    fn apply(self, worksheet: &mut Worksheet, shared_strings: &[String]) -> XlsxResult<()> {
        let Some(value) = self.decode(shared_strings)? else {
            return Ok(());
        };
        worksheet.set_value_at(self.address.row, self.address.col, value)?;
        Ok(())
    }

    fn decode(&self, shared_strings: &[String]) -> XlsxResult<Option<CellValue>> {
        if self.cell_type.as_deref() == Some("inlineStr") {
            return Ok(self
                .inline
                .as_deref()
                .or(self.value.as_deref())
                .map(|s| CellValue::string(decode_excel_escapes(s))));
        }

        let Some(value) = self.value.as_deref() else {
            return Ok(None);
        };

        let cell_value = match self.cell_type.as_deref() {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s)
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Error
            Some("e") => CellError::parse(value)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // Formula string result
            Some("str") => CellValue::string(decode_excel_escapes(value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            // ISO dates ("d") and unknown types keep their text
            Some(_) => CellValue::string(value),
        };

        Ok(Some(cell_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_excel_escapes_carriage_return() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        // _x005f_ is an escaped underscore
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        // Incomplete sequences should be left as-is
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000"), "_x000");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d"); // missing trailing _
        assert_eq!(decode_excel_escapes("a_xzzzz_b"), "a_xzzzz_b");
    }

    #[test]
    fn test_decode_excel_escapes_uppercase() {
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
        assert_eq!(decode_excel_escapes("_x000A_"), "\n");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn test_pending_cell_decoding() {
        let strings = vec!["shared".to_string()];
        let cell = |t: Option<&str>, v: Option<&str>| PendingCell {
            address: CellAddress::new(0, 0),
            cell_type: t.map(str::to_string),
            value: v.map(str::to_string),
            inline: None,
        };

        assert_eq!(
            cell(Some("s"), Some("0")).decode(&strings).unwrap(),
            Some(CellValue::string("shared"))
        );
        assert_eq!(
            cell(None, Some("1.5")).decode(&strings).unwrap(),
            Some(CellValue::Number(1.5))
        );
        assert_eq!(
            cell(Some("b"), Some("1")).decode(&strings).unwrap(),
            Some(CellValue::Boolean(true))
        );
        assert_eq!(
            cell(Some("e"), Some("#REF!")).decode(&strings).unwrap(),
            Some(CellValue::Error(CellError::Ref))
        );
        assert_eq!(
            cell(Some("d"), Some("2024-01-31T00:00:00")).decode(&strings).unwrap(),
            Some(CellValue::string("2024-01-31T00:00:00"))
        );
        assert_eq!(cell(Some("n"), None).decode(&strings).unwrap(), None);
        assert!(matches!(
            cell(Some("s"), Some("7")).decode(&strings),
            Err(XlsxError::Parse(_))
        ));
    }
}
