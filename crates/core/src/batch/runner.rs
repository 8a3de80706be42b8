//! Batch runner implementation.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::document::{build_description, summary, OwnerRef, TemplateContext};
use crate::jira::{IssueRef, JiraError, TicketRequest, TicketService};
use crate::owner::{OwnerLookupError, OwnerResolver};
use crate::sheet::SheetSource;

use super::types::{BatchConfig, BatchError, BatchReport, RowOutcome, RowStatus};

/// Receives each row's outcome as soon as the row is finished.
pub trait RowReporter: Send + Sync {
    fn report(&self, outcome: &RowOutcome);
}

/// Drives the configured rows through ticket creation.
pub struct BatchRunner {
    config: BatchConfig,
    sheet: Arc<dyn SheetSource>,
    tickets: Arc<dyn TicketService>,
    resolver: Option<OwnerResolver>,
}

impl BatchRunner {
    pub fn new(
        config: BatchConfig,
        sheet: Arc<dyn SheetSource>,
        tickets: Arc<dyn TicketService>,
    ) -> Self {
        let resolver = config
            .owner_lookup
            .map(|lookup| OwnerResolver::new(Arc::clone(&sheet), lookup));

        Self {
            config,
            sheet,
            tickets,
            resolver,
        }
    }

    /// Process every row of the range in ascending order.
    ///
    /// Returns early only on sheet failures; ticket failures are recorded in
    /// the row's outcome and the next row proceeds.
    pub async fn run(&self, reporter: &dyn RowReporter) -> Result<BatchReport, BatchError> {
        let mut report = BatchReport::default();

        info!(
            "Processing rows {} ({} rows, owner lookup: {}, epic: {:?})",
            self.config.rows,
            self.config.rows.len(),
            self.resolver.is_some(),
            self.config.epic_key
        );

        for row in self.config.rows.rows() {
            let outcome = self.process_row(row).await?;
            reporter.report(&outcome);
            report.outcomes.push(outcome);
        }

        info!(
            "Batch finished: {} created, {} failed",
            report.created(),
            report.failed()
        );

        Ok(report)
    }

    async fn process_row(&self, row: u32) -> Result<RowOutcome, BatchError> {
        if self.resolver.is_some() && !self.config.row_delay.is_zero() {
            debug!("Pausing {:?} before reading row {}", self.config.row_delay, row);
            sleep(self.config.row_delay).await;
        }

        let cells = self
            .sheet
            .read_row(self.config.primary_sheet, row)
            .await
            .map_err(|source| BatchError::ReadRow { row, source })?;

        let item_name = cells.cell(self.config.item_column).to_string();
        let owner_name = cells.cell(self.config.owner_column).to_string();
        debug!("Row {}: item={:?}, owner={:?}", row, item_name, owner_name);

        let owner = self.owner_ref(row, owner_name).await?;

        let description = build_description(&TemplateContext {
            item_name: &item_name,
            owner,
            doc_url: &self.config.doc_url,
            plan_year: self.config.plan_year,
            include_control_rows: self.config.epic_key.is_some(),
        });

        let request = TicketRequest {
            project_key: self.config.project_key.clone(),
            summary: summary(&item_name, self.config.plan_year, self.resolver.is_some()),
            description,
            issue_type: self.config.issue_type.clone(),
            epic_key: self.config.epic_key.clone(),
        };

        let status = self.submit(row, &request).await;

        Ok(RowOutcome {
            row,
            item_name,
            summary: request.summary,
            status,
        })
    }

    async fn owner_ref(&self, row: u32, owner_name: String) -> Result<OwnerRef, BatchError> {
        let Some(resolver) = &self.resolver else {
            return Ok(OwnerRef::Plain(owner_name));
        };

        let id = match resolver.resolve(&owner_name).await {
            Ok(id) => id,
            Err(OwnerLookupError::NotFound(name)) => {
                warn!("Row {}: owner {:?} not found in lookup sheet", row, name);
                String::new()
            }
            Err(OwnerLookupError::Sheet(source)) => {
                return Err(BatchError::OwnerLookup { row, source });
            }
        };

        Ok(OwnerRef::Mention {
            id,
            display: owner_name,
        })
    }

    async fn submit(&self, row: u32, request: &TicketRequest) -> RowStatus {
        let created = match self.tickets.create_issue(request).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Row {}: ticket creation failed: {}", row, e);
                return RowStatus::Failed {
                    error: e.to_string(),
                };
            }
        };
        info!("Row {}: created {}", row, created.key);

        let Some(epic_key) = &request.epic_key else {
            return RowStatus::Created { key: created.key };
        };

        match self.link_to_epic(epic_key, &created.key).await {
            Ok(epic) => {
                info!("Row {}: {} filed under {}", row, created.key, epic.key);
                RowStatus::Linked {
                    key: created.key,
                    epic_key: epic.key,
                }
            }
            Err(e) => {
                warn!(
                    "Row {}: linking {} to {} failed: {}",
                    row, created.key, epic_key, e
                );
                RowStatus::LinkFailed {
                    key: created.key,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn link_to_epic(&self, epic_key: &str, issue_key: &str) -> Result<IssueRef, JiraError> {
        let epic = self.tickets.get_issue(epic_key).await?;
        self.tickets
            .add_issues_to_epic(&epic.key, &[issue_key.to_string()])
            .await?;
        Ok(epic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{Column, RowRange};
    use crate::testing::{fixtures, MockSheetSource, MockTicketService, RecordingReporter};
    use std::time::Duration;

    fn plain_config(rows: &str) -> BatchConfig {
        BatchConfig {
            primary_sheet: 0,
            item_column: Column::from_letter("A").unwrap(),
            owner_column: Column::from_letter("B").unwrap(),
            rows: rows.parse::<RowRange>().unwrap(),
            owner_lookup: None,
            row_delay: Duration::ZERO,
            project_key: "ITC".to_string(),
            issue_type: "Task".to_string(),
            epic_key: None,
            doc_url: "https://wiki.example.com/it-controls".to_string(),
            plan_year: 2021,
        }
    }

    #[tokio::test]
    async fn test_run_processes_range_in_order() {
        let sheet = Arc::new(fixtures::items_sheet().await);
        let tickets = Arc::new(MockTicketService::new());
        let reporter = RecordingReporter::default();

        let runner = BatchRunner::new(plain_config("3:5"), sheet.clone(), tickets.clone());
        let report = runner.run(&reporter).await.unwrap();

        let rows: Vec<u32> = report.outcomes.iter().map(|o| o.row).collect();
        assert_eq!(rows, vec![3, 4, 5]);
        assert_eq!(sheet.rows_read().await, vec![(0, 3), (0, 4), (0, 5)]);
        assert_eq!(reporter.rows(), vec![3, 4, 5]);
        assert_eq!(tickets.created().await.len(), 3);
    }

    #[tokio::test]
    async fn test_read_failure_ends_batch() {
        let sheet = Arc::new(fixtures::items_sheet().await);
        let tickets = Arc::new(MockTicketService::new());
        let reporter = RecordingReporter::default();

        // The fixture sheet has 6 rows.
        let runner = BatchRunner::new(plain_config("5:8"), sheet, tickets.clone());
        let err = runner.run(&reporter).await.unwrap_err();

        assert!(matches!(err, BatchError::ReadRow { row: 7, .. }));
        assert_eq!(reporter.rows(), vec![5, 6]);
        assert_eq!(tickets.created().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_with_owner_lookup() {
        let sheet = Arc::new(fixtures::items_sheet().await);
        let tickets = Arc::new(MockTicketService::new());

        let mut config = plain_config("2:4");
        config.row_delay = Duration::from_secs(2);

        let start = tokio::time::Instant::now();
        BatchRunner::new(config.clone(), sheet.clone(), tickets.clone())
            .run(&RecordingReporter::default())
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));

        config.owner_lookup = Some(fixtures::owner_lookup_config());
        let start = tokio::time::Instant::now();
        BatchRunner::new(config, sheet, tickets)
            .run(&RecordingReporter::default())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(6));
    }
}
