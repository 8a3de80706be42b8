//! Testing utilities and mock implementations.
//!
//! Mocks for the spreadsheet and ticketing seams, so a whole batch can run
//! without Google or Jira.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheet2jira_core::testing::{fixtures, MockTicketService, RecordingReporter};
//!
//! let sheet = Arc::new(fixtures::items_sheet().await);
//! let tickets = Arc::new(MockTicketService::new());
//!
//! let runner = BatchRunner::new(config, sheet, tickets.clone());
//! runner.run(&RecordingReporter::default()).await?;
//!
//! assert_eq!(tickets.created().await.len(), 3);
//! ```

mod mock_sheet_source;
mod mock_ticket_service;

pub use mock_sheet_source::{MockSheetSource, RecordedLookup};
pub use mock_ticket_service::MockTicketService;

use std::sync::Mutex;

use crate::batch::{RowOutcome, RowReporter};

/// Reporter that keeps every outcome it is given.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    outcomes: Mutex<Vec<RowOutcome>>,
}

impl RecordingReporter {
    pub fn outcomes(&self) -> Vec<RowOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Row numbers reported, in order.
    pub fn rows(&self) -> Vec<u32> {
        self.outcomes().iter().map(|o| o.row).collect()
    }
}

impl RowReporter for RecordingReporter {
    fn report(&self, outcome: &RowOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(outcome.clone());
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use super::MockSheetSource;
    use crate::owner::OwnerLookupConfig;
    use crate::sheet::Column;

    /// Worksheet index of the items in [`items_sheet`].
    pub const ITEMS_WORKSHEET: usize = 0;
    /// Worksheet index of the owner directory in [`items_sheet`].
    pub const OWNERS_WORKSHEET: usize = 1;

    /// A spreadsheet with six item rows (header first, item name in A,
    /// owner in B) and an owner directory (team in A, name in B, account
    /// id in C). "Unknown Person" has no directory entry.
    pub async fn items_sheet() -> MockSheetSource {
        let sheet = MockSheetSource::new();
        sheet
            .set_worksheet(
                ITEMS_WORKSHEET,
                vec![
                    vec!["System", "Owner"],
                    vec!["PayCore", "Jane Doe"],
                    vec!["LedgerX", "John Roe"],
                    vec!["CardHub", "Ann Poe"],
                    vec!["RiskLens", "Jane Doe"],
                    vec!["Vault", "Unknown Person"],
                ],
            )
            .await;
        sheet
            .set_worksheet(
                OWNERS_WORKSHEET,
                vec![
                    vec!["Team", "Name", "Account"],
                    vec!["Payments", "Jane Doe", "acc123"],
                    vec!["Ledger", "John Roe", "acc456"],
                    vec!["Cards", "Ann Poe", "acc789"],
                ],
            )
            .await;
        sheet
    }

    /// Lookup settings matching the directory in [`items_sheet`].
    pub fn owner_lookup_config() -> OwnerLookupConfig {
        OwnerLookupConfig {
            worksheet: OWNERS_WORKSHEET,
            name_column: column("B"),
            id_column: column("C"),
        }
    }

    /// Parse a column letter known to be valid.
    pub fn column(letter: &str) -> Column {
        Column::from_letter(letter).unwrap_or_else(|e| panic!("{}", e))
    }
}
