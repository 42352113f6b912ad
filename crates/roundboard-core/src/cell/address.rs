//! Cell positions

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Zero-based position of a cell in a sheet grid.
///
/// Sheet XML tags each cell with a reference like `C7`; `$` markers are
/// accepted and ignored. Ordering is row-major, which is the order cells
/// are laid out when a sparse sheet is densified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Read an A1-style reference
    ///
    /// ```
    /// use roundboard_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::parse("C7").unwrap(), CellAddress::new(6, 2));
    /// assert_eq!(CellAddress::parse("$B$2").unwrap(), CellAddress::new(1, 1));
    /// ```
    pub fn parse(reference: &str) -> Result<Self> {
        let text: String = reference.trim().chars().filter(|c| *c != '$').collect();
        let split = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (letters, digits) = text.split_at(split);

        if letters.is_empty() {
            return Err(Error::reference(reference, "missing column letters"));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::reference(reference, "missing row number"));
        }

        let col = letters_to_index(letters).ok_or_else(|| {
            Error::reference(reference, "column past the last sheet column")
        })?;
        let row = digits
            .parse::<u32>()
            .ok()
            .filter(|row| (1..=MAX_ROWS).contains(row))
            .ok_or_else(|| Error::reference(reference, "row outside the sheet"))?;

        Ok(Self { row: row - 1, col })
    }

    /// Column letters for this position (`0` → `A`, `26` → `AA`)
    pub fn column_letters(&self) -> String {
        let mut letters = Vec::new();
        let mut n = u32::from(self.col) + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

fn letters_to_index(letters: &str) -> Option<u16> {
    let col = letters.bytes().try_fold(0u32, |acc, b| {
        let next = acc * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
        (next <= u32::from(MAX_COLS)).then_some(next)
    })?;
    u16::try_from(col - 1).ok()
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
