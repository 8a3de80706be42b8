//! Spreadsheet access.
//!
//! The batch runner reads item rows from a primary worksheet and, in the
//! owner-lookup variant, searches a secondary worksheet for owner
//! identifiers. Both go through the [`SheetSource`] trait so tests can
//! substitute an in-memory sheet.

mod google;
mod types;

pub use google::{GoogleSheetsClient, GoogleSheetsConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading spreadsheets.
#[derive(Debug, Error)]
pub enum SheetError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// No spreadsheet with the given name is visible to the credentials.
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// The spreadsheet has no worksheet at this index.
    #[error("Worksheet index {0} does not exist")]
    WorksheetNotFound(usize),

    /// The requested row lies outside the populated area of the worksheet.
    #[error("Row {row} is outside the populated range of worksheet {worksheet}")]
    RowOutOfRange { worksheet: usize, row: u32 },

    /// Column reference is not a single letter.
    #[error("Invalid column reference: {0:?}")]
    InvalidColumn(String),

    /// Row range is not `start:end` with 1 <= start <= end.
    #[error("Invalid row range: {0:?}")]
    InvalidRange(String),

    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API returned an error.
    #[error("Sheets API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Read access to the worksheets of one spreadsheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Read a single row (1-based) of the worksheet at `worksheet` (0-based).
    ///
    /// A blank row inside the data reads as a row with no cells. Fails with
    /// [`SheetError::RowOutOfRange`] when the row is beyond the
    /// populated area.
    async fn read_row(&self, worksheet: usize, row: u32) -> Result<Row, SheetError>;

    /// Find the first row whose `column` cell equals `value` exactly.
    async fn find_row(
        &self,
        worksheet: usize,
        column: Column,
        value: &str,
    ) -> Result<Option<Row>, SheetError>;
}
