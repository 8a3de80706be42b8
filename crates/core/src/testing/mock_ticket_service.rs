//! Mock ticket service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::jira::{CreatedIssue, IssueRef, JiraError, TicketRequest, TicketService};

/// Mock implementation of the TicketService trait.
///
/// Provides controllable behavior for testing:
/// - Assigns sequential keys (`{project}-1`, `{project}-2`, ...)
/// - Records created tickets and epic links for assertions
/// - Fails creation for chosen items, or links, on demand
///
/// # Example
///
/// ```rust,ignore
/// use sheet2jira_core::testing::MockTicketService;
///
/// let tickets = MockTicketService::new();
/// tickets.add_issue("ITC-100", "10100").await;
/// tickets.fail_create_for("LedgerX", JiraError::ApiError { status: 400, message: "bad".into() }).await;
///
/// // ... run a batch ...
///
/// assert_eq!(tickets.created().await.len(), 2);
/// assert_eq!(tickets.epic_links().await[0].0, "ITC-100");
/// ```
#[derive(Debug)]
pub struct MockTicketService {
    created: Arc<RwLock<Vec<TicketRequest>>>,
    issues: Arc<RwLock<HashMap<String, IssueRef>>>,
    epic_links: Arc<RwLock<Vec<(String, Vec<String>)>>>,
    /// Creation fails once for a ticket whose summary contains the text.
    create_errors: Arc<RwLock<Vec<(String, JiraError)>>>,
    /// If set, the next create will fail with this error.
    next_error: Arc<RwLock<Option<JiraError>>>,
    /// If set, the next epic link will fail with this error.
    next_link_error: Arc<RwLock<Option<JiraError>>>,
}

impl Default for MockTicketService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketService {
    pub fn new() -> Self {
        Self {
            created: Arc::new(RwLock::new(Vec::new())),
            issues: Arc::new(RwLock::new(HashMap::new())),
            epic_links: Arc::new(RwLock::new(Vec::new())),
            create_errors: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_link_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Register an existing issue (an epic, usually).
    pub async fn add_issue(&self, key: &str, id: &str) {
        self.issues.write().await.insert(
            key.to_string(),
            IssueRef {
                id: id.to_string(),
                key: key.to_string(),
            },
        );
    }

    /// Tickets created so far, in order.
    pub async fn created(&self) -> Vec<TicketRequest> {
        self.created.read().await.clone()
    }

    /// `(epic key, issue keys)` of every link call.
    pub async fn epic_links(&self) -> Vec<(String, Vec<String>)> {
        self.epic_links.read().await.clone()
    }

    /// Fail the next creation whose summary contains `text`.
    pub async fn fail_create_for(&self, text: &str, error: JiraError) {
        self.create_errors
            .write()
            .await
            .push((text.to_string(), error));
    }

    /// Configure the next creation to fail with the given error.
    pub async fn set_next_error(&self, error: JiraError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next epic link to fail with the given error.
    pub async fn set_next_link_error(&self, error: JiraError) {
        *self.next_link_error.write().await = Some(error);
    }
}

#[async_trait]
impl TicketService for MockTicketService {
    async fn create_issue(&self, request: &TicketRequest) -> Result<CreatedIssue, JiraError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        {
            let mut errors = self.create_errors.write().await;
            if let Some(index) = errors
                .iter()
                .position(|(text, _)| request.summary.contains(text.as_str()))
            {
                return Err(errors.remove(index).1);
            }
        }

        let mut created = self.created.write().await;
        created.push(request.clone());
        let number = created.len();
        let key = format!("{}-{}", request.project_key, number);
        let id = (10_000 + number).to_string();

        self.issues.write().await.insert(
            key.clone(),
            IssueRef {
                id: id.clone(),
                key: key.clone(),
            },
        );

        Ok(CreatedIssue {
            self_url: format!("https://jira.test/rest/api/3/issue/{}", id),
            id,
            key,
        })
    }

    async fn get_issue(&self, key: &str) -> Result<IssueRef, JiraError> {
        self.issues
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| JiraError::NotFound(format!("{}: Issue does not exist", key)))
    }

    async fn add_issues_to_epic(
        &self,
        epic_key: &str,
        issue_keys: &[String],
    ) -> Result<(), JiraError> {
        if let Some(error) = self.next_link_error.write().await.take() {
            return Err(error);
        }
        self.epic_links
            .write()
            .await
            .push((epic_key.to_string(), issue_keys.to_vec()));
        Ok(())
    }
}
