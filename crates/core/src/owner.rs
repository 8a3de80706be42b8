//! Owner identifier lookup.
//!
//! Maps an owner's display name to the identifier Jira uses for mentions by
//! searching a secondary worksheet.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::sheet::{Column, SheetError, SheetSource};

/// Errors from owner lookup.
#[derive(Debug, Error)]
pub enum OwnerLookupError {
    /// No row of the lookup worksheet carries this owner name.
    #[error("Owner not found in lookup sheet: {0}")]
    NotFound(String),

    /// Reading the lookup worksheet failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Where owner identifiers live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerLookupConfig {
    /// Zero-based worksheet index.
    pub worksheet: usize,
    /// Column matched against the owner name.
    pub name_column: Column,
    /// Column holding the identifier.
    pub id_column: Column,
}

/// Resolves owner display names to identifiers.
pub struct OwnerResolver {
    sheet: Arc<dyn SheetSource>,
    config: OwnerLookupConfig,
}

impl OwnerResolver {
    pub fn new(sheet: Arc<dyn SheetSource>, config: OwnerLookupConfig) -> Self {
        Self { sheet, config }
    }

    /// Identifier of the first row whose name column equals `owner_name`.
    pub async fn resolve(&self, owner_name: &str) -> Result<String, OwnerLookupError> {
        if owner_name.is_empty() {
            return Err(OwnerLookupError::NotFound(owner_name.to_string()));
        }

        let row = self
            .sheet
            .find_row(self.config.worksheet, self.config.name_column, owner_name)
            .await?
            .ok_or_else(|| OwnerLookupError::NotFound(owner_name.to_string()))?;

        let id = row.cell(self.config.id_column).to_string();
        debug!(
            "Resolved owner {:?} to {:?} (row {})",
            owner_name, id, row.number
        );
        Ok(id)
    }
}
