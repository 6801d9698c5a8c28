//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "AB12")
///
/// Column letters follow spreadsheet numbering (A-XFD) and rows are displayed
/// 1-based (1-1048576). Internally both are 0-based. Addresses order row-major,
/// so a `BTreeMap<CellAddress, _>` iterates A1, B1, ..., A2, B2, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Accepts `[A-Za-z]+[0-9]+` (surrounding whitespace is ignored). Letters are
    /// case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use sheetdelta_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 0));
    ///
    /// let addr = CellAddress::parse("ab12").unwrap();
    /// assert_eq!((addr.row, addr.col), (11, 27));
    ///
    /// assert!(CellAddress::parse("$A$1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let split = s
            .bytes()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(letters)?;

        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(
                u32::try_from(row - 1).unwrap_or(u32::MAX),
                MAX_ROWS - 1,
            ));
        }

        Ok(Self {
            row: (row - 1) as u32,
            col,
        })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = Vec::with_capacity(3);
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            result.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        result.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(col - 1, MAX_COLS - 1));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Column letters of this address ("AB" for AB12)
    pub fn column_letters(&self) -> String {
        Self::column_to_letters(self.col)
    }

    /// Row number as displayed (1-based)
    pub fn display_row(&self) -> u32 {
        self.row + 1
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", self.column_letters(), self.display_row())
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.display_row())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        // Normalize so start is top-left and end is bottom-right
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation (or a single cell reference)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = |e: Error| Error::InvalidRange(format!("'{}': {}", s, e));

        if let Some((start, end)) = s.split_once(':') {
            let start = CellAddress::parse(start).map_err(invalid)?;
            let end = CellAddress::parse(end).map_err(invalid)?;
            Ok(Self::new(start, end))
        } else {
            let addr = CellAddress::parse(s).map_err(invalid)?;
            Ok(Self::single(addr))
        }
    }

    /// Parse a sheet's declared range reference.
    ///
    /// A missing (or blank) reference yields the 1x1 bound `A1:A1`. That bound
    /// says nothing about where populated cells actually are, so callers that
    /// can enumerate defined cells should prefer doing so.
    pub fn parse_declared(reference: Option<&str>) -> Result<Self> {
        match reference.map(str::trim) {
            Some(r) if !r.is_empty() => Self::parse(r),
            _ => Ok(Self::single(CellAddress::new(0, 0))),
        }
    }

    /// First row (0-based, inclusive)
    pub fn row_start(&self) -> u32 {
        self.start.row
    }

    /// Last row (0-based, inclusive)
    pub fn row_end(&self) -> u32 {
        self.end.row
    }

    /// First column (0-based, inclusive)
    pub fn col_start(&self) -> u16 {
        self.start.col
    }

    /// Last column (0-based, inclusive)
    pub fn col_end(&self) -> u16 {
        self.end.col
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(1), "B");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(27), "AB");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD"); // Max Excel column
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 25);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(CellAddress::letters_to_column("AAA").unwrap(), 702);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("a").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);

        assert!(matches!(
            CellAddress::letters_to_column("XFE"),
            Err(Error::ColumnOutOfBounds(16384, 16383))
        ));
        assert!(CellAddress::letters_to_column("ZZZZZZZZZZZZ").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("B2").unwrap(), CellAddress::new(1, 1));
        assert_eq!(CellAddress::parse("AB12").unwrap(), CellAddress::new(11, 27));
        assert_eq!(CellAddress::parse(" c3 ").unwrap(), CellAddress::new(2, 2));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16383)
        );
    }

    #[test]
    fn test_cell_address_parse_errors() {
        for bad in ["", "A", "1", "A0", "1A", "A1B", "$A$1", "A-1", "A 1", "Ä1"] {
            assert!(
                matches!(CellAddress::parse(bad), Err(Error::InvalidAddress(_))),
                "{bad:?} should be an invalid address"
            );
        }
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::RowOutOfBounds(1_048_576, _))
        ));
        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::ColumnOutOfBounds(..))
        ));
        assert!(CellAddress::parse("A99999999999999999999999").is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(99, 2).to_string(), "C100");
        assert_eq!(CellAddress::new(11, 27).to_a1_string(), "AB12");
    }

    #[test]
    fn test_cell_address_ordering_is_row_major() {
        let mut addrs = vec![
            CellAddress::parse("B2").unwrap(),
            CellAddress::parse("A2").unwrap(),
            CellAddress::parse("AA1").unwrap(),
            CellAddress::parse("B1").unwrap(),
        ];
        addrs.sort();
        let text: Vec<_> = addrs.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["B1", "AA1", "A2", "B2"]);
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(1, 1));

        // Reversed corners are normalized
        let range = CellRange::parse("C5:A1").unwrap();
        assert_eq!(range.to_string(), "A1:C5");

        // Single cell
        let range = CellRange::parse("C3").unwrap();
        assert_eq!(range.start, CellAddress::new(2, 2));
        assert_eq!(range.end, CellAddress::new(2, 2));

        assert!(matches!(
            CellRange::parse("A1:"),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_parse_declared_defaults_to_single_cell() {
        for reference in [None, Some(""), Some("   ")] {
            let range = CellRange::parse_declared(reference).unwrap();
            assert_eq!(
                (range.row_start(), range.row_end(), range.col_start(), range.col_end()),
                (0, 0, 0, 0)
            );
        }

        let range = CellRange::parse_declared(Some("B2:D10")).unwrap();
        assert_eq!(
            (range.row_start(), range.row_end(), range.col_start(), range.col_end()),
            (1, 9, 1, 3)
        );
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(1, 1))); // B2
        assert!(range.contains(&CellAddress::new(3, 3))); // D4
        assert!(range.contains(&CellAddress::new(2, 2))); // C3

        assert!(!range.contains(&CellAddress::new(0, 0))); // A1
        assert!(!range.contains(&CellAddress::new(4, 1))); // B5
    }
}
