//! Visual mode: the sheet as an HTML grid with changed cells colored

use std::collections::BTreeSet;

use ahash::AHashMap;
use sheetdelta_core::CellAddress;

use crate::diff::{CellDiff, Change, DiffSet};
use crate::options::{Palette, Swatch};
use crate::snapshot::CellMap;

/// Legend lines explaining the palette
pub fn legend(palette: &Palette) -> Vec<String> {
    vec![
        "**Legend:**".to_string(),
        format!(
            "- {} = Modified (~~old~~ → {})",
            palette.modified.label,
            tex_color(&palette.modified.text, "new")
        ),
        format!(
            "- {} = Added ({})",
            palette.added.label,
            tex_color(&palette.added.text, "new")
        ),
        format!(
            "- {} = Removed (~~{}~~)",
            palette.removed.label,
            tex_color(&palette.removed.text, "old")
        ),
    ]
}

/// HTML grid spanning every populated cell on either side of a sheet
///
/// Rows are ordered numerically and columns by index, so `AA` follows `Z`.
pub fn grid(
    sheet: &str,
    diffs: &DiffSet,
    before: Option<&CellMap>,
    after: Option<&CellMap>,
    palette: &Palette,
) -> Vec<String> {
    let mut rows = BTreeSet::new();
    let mut cols = BTreeSet::new();
    for address in before.into_iter().chain(after).flat_map(|cells| cells.keys()) {
        rows.insert(address.row);
        cols.insert(address.col);
    }

    if rows.is_empty() {
        return vec!["<p>No data</p>".to_string()];
    }

    let changed: AHashMap<CellAddress, &CellDiff> =
        diffs.for_sheet(sheet).map(|d| (d.address, d)).collect();

    let mut lines = vec!["<table>".to_string()];

    let mut header = String::from("<tr><th></th>");
    for &col in &cols {
        header.push_str(&format!("<th>{}</th>", CellAddress::column_to_letters(col)));
    }
    header.push_str("</tr>");
    lines.push(header);

    for &row in &rows {
        let mut line = format!("<tr><th>{}</th>", row + 1);
        for &col in &cols {
            let address = CellAddress::new(row, col);
            let cell = match changed.get(&address) {
                Some(d) => changed_cell(&d.change, palette),
                None => {
                    // Unchanged, so both sides agree wherever both are present
                    let value = after
                        .and_then(|cells| cells.get(&address))
                        .or_else(|| before.and_then(|cells| cells.get(&address)));
                    format!("<td>{}</td>", value.map(|v| html_escape(v)).unwrap_or_default())
                }
            };
            line.push_str(&cell);
        }
        line.push_str("</tr>");
        lines.push(line);
    }

    lines.push("</table>".to_string());
    lines
}

fn changed_cell(change: &Change, palette: &Palette) -> String {
    match change {
        Change::Changed { from, to } => styled(
            &palette.modified,
            &format!("<del>{}</del> → {}", html_escape(from), colored(&palette.modified, to)),
        ),
        Change::Added { to } => styled(&palette.added, &colored(&palette.added, to)),
        Change::Removed { from } => styled(
            &palette.removed,
            &format!("<del>{}</del>", colored(&palette.removed, from)),
        ),
    }
}

fn styled(swatch: &Swatch, content: &str) -> String {
    format!(
        "<td style=\"background-color:{}\">{}</td>",
        html_escape(&swatch.background),
        content
    )
}

fn colored(swatch: &Swatch, value: &str) -> String {
    let text = html_escape(value);
    if tex_safe(value) {
        tex_color(&swatch.text, &text)
    } else {
        // TeX would misread these characters; keep the value legible instead
        format!("<b>{text}</b>")
    }
}

fn tex_color(color: &str, text: &str) -> String {
    format!("$\\color{{{color}}}{{\\text{{{text}}}}}$")
}

fn tex_safe(value: &str) -> bool {
    !value.contains(|c: char| matches!(c, '\\' | '{' | '}' | '$' | '%' | '#' | '^' | '_' | '~'))
}

/// Escape text for an HTML element body or attribute
pub(crate) fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
