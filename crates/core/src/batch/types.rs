use std::time::Duration;

use thiserror::Error;

use crate::owner::OwnerLookupConfig;
use crate::sheet::{Column, RowRange, SheetError};

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Worksheet holding the items.
    pub primary_sheet: usize,
    pub item_column: Column,
    pub owner_column: Column,
    pub rows: RowRange,
    /// Resolve owners to mention ids; `None` renders owners as plain text.
    pub owner_lookup: Option<OwnerLookupConfig>,
    /// Pause before each row read. Applied only with owner lookup.
    pub row_delay: Duration,
    pub project_key: String,
    pub issue_type: String,
    pub epic_key: Option<String>,
    pub doc_url: String,
    pub plan_year: u32,
}

/// Failures that end the batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read row {row}: {source}")]
    ReadRow { row: u32, source: SheetError },

    #[error("Owner lookup failed on row {row}: {source}")]
    OwnerLookup { row: u32, source: SheetError },
}

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Ticket created, no epic configured.
    Created { key: String },
    /// Ticket created and filed under the epic.
    Linked { key: String, epic_key: String },
    /// Ticket created but filing it under the epic failed. The ticket stays.
    LinkFailed { key: String, error: String },
    /// Ticket creation failed.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row: u32,
    pub item_name: String,
    pub summary: String,
    pub status: RowStatus,
}

impl RowOutcome {
    /// Key of the created ticket, if one was created.
    pub fn ticket_key(&self) -> Option<&str> {
        match &self.status {
            RowStatus::Created { key }
            | RowStatus::Linked { key, .. }
            | RowStatus::LinkFailed { key, .. } => Some(key),
            RowStatus::Failed { .. } => None,
        }
    }

    /// Error message for the row, if any step failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RowStatus::LinkFailed { error, .. } | RowStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Outcomes of a completed batch, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.ticket_key().is_some())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error().is_some()).count()
    }
}
