//! Property tests for the A1 address codec

use proptest::prelude::*;
use sheetdelta_core::{CellAddress, MAX_COLS, MAX_ROWS};

proptest! {
    #[test]
    fn encode_then_decode_is_identity(row in 0..MAX_ROWS, col in 0..MAX_COLS) {
        let text = CellAddress::new(row, col).to_string();
        let parsed = CellAddress::parse(&text).unwrap();
        prop_assert_eq!((parsed.row, parsed.col), (row, col));
    }

    #[test]
    fn decode_is_case_insensitive(row in 0..MAX_ROWS, col in 0..MAX_COLS) {
        let text = CellAddress::new(row, col).to_string().to_lowercase();
        prop_assert_eq!(CellAddress::parse(&text).unwrap(), CellAddress::new(row, col));
    }

    #[test]
    fn column_letters_round_trip(col in 0..MAX_COLS) {
        let letters = CellAddress::column_to_letters(col);
        prop_assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(CellAddress::letters_to_column(&letters).unwrap(), col);
    }

    #[test]
    fn text_without_digits_is_rejected(letters in "[A-Za-z]{0,4}") {
        prop_assert!(CellAddress::parse(&letters).is_err());
    }
}
