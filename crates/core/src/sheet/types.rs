//! Spreadsheet addressing types: column letters, row ranges and rows.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SheetError;

/// Zero-based column index for a single-letter column reference.
///
/// `"A"` is 0, `"C"` is 2 and lower case is accepted (`"z"` is 25).
/// Returns `None` for anything that is not exactly one ASCII letter.
pub fn index_from_col(col_name: &str) -> Option<usize> {
    let mut chars = col_name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => None,
    }
}

/// A validated single-letter column reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(usize);

impl Column {
    /// Parse a column letter.
    pub fn from_letter(letter: &str) -> Result<Self, SheetError> {
        index_from_col(letter)
            .map(Column)
            .ok_or_else(|| SheetError::InvalidColumn(letter.to_string()))
    }

    /// Zero-based index of this column.
    pub fn index(self) -> usize {
        self.0
    }

    /// Upper-case letter of this column.
    pub fn letter(self) -> char {
        (b'A' + self.0 as u8) as char
    }
}

impl TryFrom<String> for Column {
    type Error = SheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Column::from_letter(value.trim())
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.letter().to_string()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 1-based inclusive span of spreadsheet rows, written as `"start:end"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowRange {
    start: u32,
    end: u32,
}

impl RowRange {
    /// Create a range, rejecting row 0 and reversed bounds.
    pub fn new(start: u32, end: u32) -> Result<Self, SheetError> {
        if start == 0 {
            return Err(SheetError::InvalidRange(format!(
                "{}:{} (rows are 1-based)",
                start, end
            )));
        }
        if start > end {
            return Err(SheetError::InvalidRange(format!(
                "{}:{} (start is after end)",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Always false; a valid range holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Row numbers in ascending order.
    pub fn rows(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl FromStr for RowRange {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| SheetError::InvalidRange(s.to_string()))?;

        let start: u32 = start
            .trim()
            .parse()
            .map_err(|_| SheetError::InvalidRange(s.to_string()))?;
        let end: u32 = end
            .trim()
            .parse()
            .map_err(|_| SheetError::InvalidRange(s.to_string()))?;

        RowRange::new(start, end)
    }
}

impl TryFrom<String> for RowRange {
    type Error = SheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RowRange> for String {
    fn from(range: RowRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Cell values of one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based row number.
    pub number: u32,
    /// Cell values left to right; trailing empty cells may be missing.
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(number: u32, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// Value of a cell, or an empty string past the end of the row.
    pub fn cell(&self, column: Column) -> &str {
        self.cells
            .get(column.index())
            .map(String::as_str)
            .unwrap_or("")
    }
}
