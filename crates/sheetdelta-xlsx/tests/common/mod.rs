//! In-memory XLSX fixtures.

use std::io::{Cursor, Write};

const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Builds a minimal XLSX package sheet by sheet.
#[derive(Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, String)>,
    shared_strings: Option<String>,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet whose `<worksheet>` body is `body`.
    pub fn sheet(mut self, name: &str, body: &str) -> Self {
        self.sheets.push((name.to_string(), body.to_string()));
        self
    }

    /// Set the `<sst>` body.
    pub fn shared_strings(mut self, body: &str) -> Self {
        self.shared_strings = Some(body.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();

            zip.start_file("_rels/.rels", options).unwrap();
            zip.write_all(ROOT_RELS.as_bytes()).unwrap();

            let mut sheets_xml = String::new();
            let mut rels_xml = String::new();
            for (idx, (name, _)) in self.sheets.iter().enumerate() {
                let n = idx + 1;
                sheets_xml.push_str(&format!(
                    r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#
                ));
                rels_xml.push_str(&format!(
                    r#"<Relationship Id="rId{n}" Type="{WORKSHEET_REL}" Target="worksheets/sheet{n}.xml"/>"#
                ));
            }

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(format!(r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets_xml}</sheets></workbook>"#).as_bytes()).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(format!(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels_xml}</Relationships>"#).as_bytes()).unwrap();

            if let Some(sst) = &self.shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(format!(r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{sst}</sst>"#).as_bytes()).unwrap();
            }

            for (idx, (_, body)) in self.sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
                    .unwrap();
                zip.write_all(format!(r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{body}</worksheet>"#).as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }
}
