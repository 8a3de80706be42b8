//! Jira ticket submission.
//!
//! [`TicketService`] is the seam between the batch runner and Jira;
//! [`JiraClient`] implements it over the REST API.

mod client;
mod types;

pub use client::{JiraClient, JiraConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to Jira.
#[derive(Debug, Error)]
pub enum JiraError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Credentials were rejected.
    #[error("Jira authentication failed: {0}")]
    Unauthorized(String),

    /// Issue or epic does not exist.
    #[error("Jira issue not found: {0}")]
    NotFound(String),

    /// API returned an error (validation failures and the like).
    #[error("Jira API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Operations the batch needs from the ticketing system.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Create a ticket, returning its key.
    async fn create_issue(&self, request: &TicketRequest) -> Result<CreatedIssue, JiraError>;

    /// Fetch an existing issue by key.
    async fn get_issue(&self, key: &str) -> Result<IssueRef, JiraError>;

    /// File issues under an epic.
    async fn add_issues_to_epic(
        &self,
        epic_key: &str,
        issue_keys: &[String],
    ) -> Result<(), JiraError>;
}
