//! Mock spreadsheet for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::sheet::{Column, Row, SheetError, SheetSource};

/// A recorded owner lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLookup {
    pub worksheet: usize,
    pub column: Column,
    pub value: String,
}

/// In-memory implementation of the SheetSource trait.
///
/// Worksheets are grids of strings; row 1 is the first inner vector. Rows
/// past the end of a worksheet are out of range.
///
/// # Example
///
/// ```rust,ignore
/// use sheet2jira_core::testing::MockSheetSource;
///
/// let sheet = MockSheetSource::new();
/// sheet.set_worksheet(0, vec![vec!["System", "Owner"], vec!["PayCore", "Jane Doe"]]).await;
///
/// let row = sheet.read_row(0, 2).await?;
/// assert_eq!(row.cells[0], "PayCore");
/// assert_eq!(sheet.rows_read().await, vec![(0, 2)]);
/// ```
#[derive(Debug)]
pub struct MockSheetSource {
    worksheets: Arc<RwLock<HashMap<usize, Vec<Vec<String>>>>>,
    reads: Arc<RwLock<Vec<(usize, u32)>>>,
    lookups: Arc<RwLock<Vec<RecordedLookup>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<SheetError>>>,
}

impl Default for MockSheetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSheetSource {
    pub fn new() -> Self {
        Self {
            worksheets: Arc::new(RwLock::new(HashMap::new())),
            reads: Arc::new(RwLock::new(Vec::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the contents of a worksheet.
    pub async fn set_worksheet(&self, index: usize, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|cells| cells.into_iter().map(str::to_string).collect())
            .collect();
        self.worksheets.write().await.insert(index, rows);
    }

    /// `(worksheet, row)` of every `read_row` call, in order.
    pub async fn rows_read(&self) -> Vec<(usize, u32)> {
        self.reads.read().await.clone()
    }

    /// Every `find_row` call, in order.
    pub async fn lookups(&self) -> Vec<RecordedLookup> {
        self.lookups.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: SheetError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<SheetError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl SheetSource for MockSheetSource {
    async fn read_row(&self, worksheet: usize, row: u32) -> Result<Row, SheetError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        self.reads.write().await.push((worksheet, row));

        let worksheets = self.worksheets.read().await;
        let rows = worksheets
            .get(&worksheet)
            .ok_or(SheetError::WorksheetNotFound(worksheet))?;

        row.checked_sub(1)
            .and_then(|index| rows.get(index as usize))
            .map(|cells| Row::new(row, cells.clone()))
            .ok_or(SheetError::RowOutOfRange { worksheet, row })
    }

    async fn find_row(
        &self,
        worksheet: usize,
        column: Column,
        value: &str,
    ) -> Result<Option<Row>, SheetError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        self.lookups.write().await.push(RecordedLookup {
            worksheet,
            column,
            value: value.to_string(),
        });

        let worksheets = self.worksheets.read().await;
        let rows = worksheets
            .get(&worksheet)
            .ok_or(SheetError::WorksheetNotFound(worksheet))?;

        Ok(rows
            .iter()
            .position(|cells| cells.get(column.index()).map(String::as_str) == Some(value))
            .map(|index| Row::new(index as u32 + 1, rows[index].clone())))
    }
}
