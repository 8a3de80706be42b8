//! Ticket request and Jira wire types.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A ticket to create.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRequest {
    pub project_key: String,
    pub summary: String,
    pub description: Document,
    pub issue_type: String,
    /// Epic the new ticket is filed under, if any.
    pub epic_key: Option<String>,
}

impl TicketRequest {
    /// Body for `POST /rest/api/3/issue`.
    pub fn to_create_body(&self) -> CreateIssueBody<'_> {
        CreateIssueBody {
            fields: CreateIssueFields {
                project: ProjectRef {
                    key: &self.project_key,
                },
                summary: &self.summary,
                description: &self.description,
                issuetype: IssueTypeRef {
                    name: &self.issue_type,
                },
            },
        }
    }
}

/// A ticket Jira has accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: String,
}

/// Minimal view of an existing issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: String,
    pub key: String,
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateIssueBody<'a> {
    pub fields: CreateIssueFields<'a>,
}

#[derive(Debug, Serialize)]
pub struct CreateIssueFields<'a> {
    pub project: ProjectRef<'a>,
    pub summary: &'a str,
    pub description: &'a Document,
    pub issuetype: IssueTypeRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct ProjectRef<'a> {
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IssueTypeRef<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EpicIssuesBody<'a> {
    pub issues: &'a [String],
}

// ============================================================================
// Error Body
// ============================================================================

/// Error payload Jira returns on 4xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraErrorBody {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: std::collections::BTreeMap<String, String>,
}

impl JiraErrorBody {
    /// Flatten into one line, field errors as `field: message`.
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = self
            .error_messages
            .iter()
            .cloned()
            .chain(
                self.errors
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message)),
            )
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
