//! Jira Cloud REST client.
//!
//! Issues are created through REST API v3 (which takes ADF descriptions);
//! epic membership goes through the Agile API. Every request uses basic auth
//! with the account e-mail and an API token. One client is built at startup
//! and shared by all rows.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{CreatedIssue, EpicIssuesBody, IssueRef, JiraErrorBody, TicketRequest};
use super::{JiraError, TicketService};

/// Jira client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Server URL (e.g., "https://example.atlassian.net").
    pub server_url: String,
    /// Account user name (e-mail for Jira Cloud).
    pub username: String,
    /// API token.
    pub api_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Jira REST API client.
pub struct JiraClient {
    client: Client,
    base_url: String,
    username: String,
    api_token: String,
}

impl JiraClient {
    /// Create a new Jira client.
    pub fn new(config: JiraConfig) -> Result<Self, JiraError> {
        if config.server_url.is_empty() {
            return Err(JiraError::NotConfigured(
                "Jira server URL is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            username: config.username,
            api_token: config.api_token,
        })
    }

    /// Server URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.username, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

#[async_trait]
impl TicketService for JiraClient {
    async fn create_issue(&self, request: &TicketRequest) -> Result<CreatedIssue, JiraError> {
        let url = format!("{}/rest/api/3/issue", self.base_url);

        debug!(
            "Jira create issue: project={}, summary='{}'",
            request.project_key, request.summary
        );

        let response = self
            .authed(self.client.post(&url))
            .json(&request.to_create_body())
            .send()
            .await?;

        parse_json(check_status(response, &request.project_key).await?).await
    }

    async fn get_issue(&self, key: &str) -> Result<IssueRef, JiraError> {
        let url = format!(
            "{}/rest/api/3/issue/{}",
            self.base_url,
            urlencoding::encode(key)
        );

        debug!("Jira get issue: key={}", key);

        let response = self
            .authed(self.client.get(&url))
            .query(&[("fields", "summary")])
            .send()
            .await?;

        parse_json(check_status(response, key).await?).await
    }

    async fn add_issues_to_epic(
        &self,
        epic_key: &str,
        issue_keys: &[String],
    ) -> Result<(), JiraError> {
        let url = format!(
            "{}/rest/agile/1.0/epic/{}/issue",
            self.base_url,
            urlencoding::encode(epic_key)
        );

        debug!("Jira add to epic: epic={}, issues={:?}", epic_key, issue_keys);

        let response = self
            .authed(self.client.post(&url))
            .json(&EpicIssuesBody { issues: issue_keys })
            .send()
            .await?;

        check_status(response, epic_key).await?;
        Ok(())
    }
}

/// Map non-success responses to errors. `subject` names the issue or
/// project the request was about.
async fn check_status(response: Response, subject: &str) -> Result<Response, JiraError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<JiraErrorBody>(&body)
        .ok()
        .and_then(|e| e.summary())
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JiraError::Unauthorized(message)),
        StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("{}: {}", subject, message))),
        _ => Err(JiraError::ApiError {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, JiraError> {
    response
        .json()
        .await
        .map_err(|e| JiraError::ParseError(e.to_string()))
}
