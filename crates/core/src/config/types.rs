use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::batch::BatchConfig;
use crate::jira::JiraConfig;
use crate::owner::OwnerLookupConfig;
use crate::sheet::{Column, GoogleSheetsConfig, RowRange};

/// Root configuration.
///
/// Field names are the lower-cased environment variable names, so the same
/// struct reads from the environment and from a TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Spreadsheet document name.
    pub sheet_name: String,
    /// Worksheet index holding the items.
    pub primary_sheet: usize,
    /// Worksheet index holding owner identifiers.
    #[serde(default)]
    pub secondary_sheet: Option<usize>,
    /// Item name column.
    pub item_name: Column,
    /// Owner name column, in the primary sheet and in the lookup sheet.
    pub tool_owner: Column,
    /// Owner identifier column in the lookup sheet.
    #[serde(default)]
    pub owner_id: Option<Column>,
    /// Rows to process, `"start:end"`.
    pub data_range: RowRange,

    pub jira_server_url: String,
    pub jira_username: String,
    pub jira_oauth_token: String,
    pub jira_project_key: String,
    pub jira_ticket_type: String,
    #[serde(default)]
    pub jira_epic_key: Option<String>,

    /// Link embedded in every description.
    pub doc_url: String,

    /// OAuth bearer token for the Google APIs.
    pub google_api_token: String,
    #[serde(default)]
    pub google_sheets_url: Option<String>,
    #[serde(default)]
    pub google_drive_url: Option<String>,

    /// Pause before each row read when owners are looked up.
    #[serde(default = "default_row_delay_ms")]
    pub row_delay_ms: u64,
    #[serde(default = "default_plan_year")]
    pub plan_year: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_row_delay_ms() -> u64 {
    2000
}

fn default_plan_year() -> u32 {
    2021
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Owner lookup settings, when both the lookup sheet and id column are set.
    pub fn owner_lookup(&self) -> Option<OwnerLookupConfig> {
        match (self.secondary_sheet, self.owner_id) {
            (Some(worksheet), Some(id_column)) => Some(OwnerLookupConfig {
                worksheet,
                name_column: self.tool_owner,
                id_column,
            }),
            _ => None,
        }
    }

    /// Epic key, treating an empty value as unset.
    pub fn epic_key(&self) -> Option<&str> {
        self.jira_epic_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn jira_config(&self) -> JiraConfig {
        JiraConfig {
            server_url: self.jira_server_url.clone(),
            username: self.jira_username.clone(),
            api_token: self.jira_oauth_token.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn sheets_config(&self) -> GoogleSheetsConfig {
        GoogleSheetsConfig {
            access_token: self.google_api_token.clone(),
            sheets_base_url: self.google_sheets_url.clone(),
            drive_base_url: self.google_drive_url.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            primary_sheet: self.primary_sheet,
            item_column: self.item_name,
            owner_column: self.tool_owner,
            rows: self.data_range,
            owner_lookup: self.owner_lookup(),
            row_delay: Duration::from_millis(self.row_delay_ms),
            project_key: self.jira_project_key.clone(),
            issue_type: self.jira_ticket_type.clone(),
            epic_key: self.epic_key().map(str::to_string),
            doc_url: self.doc_url.clone(),
            plan_year: self.plan_year,
        }
    }
}

/// Config with secrets replaced by presence flags, for logging.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub sheet_name: String,
    pub primary_sheet: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_sheet: Option<usize>,
    pub item_name: Column,
    pub tool_owner: Column,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Column>,
    pub data_range: RowRange,
    pub jira_server_url: String,
    pub jira_username: String,
    pub jira_token_configured: bool,
    pub jira_project_key: String,
    pub jira_ticket_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira_epic_key: Option<String>,
    pub doc_url: String,
    pub google_token_configured: bool,
    pub row_delay_ms: u64,
    pub plan_year: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            primary_sheet: config.primary_sheet,
            secondary_sheet: config.secondary_sheet,
            item_name: config.item_name,
            tool_owner: config.tool_owner,
            owner_id: config.owner_id,
            data_range: config.data_range,
            jira_server_url: config.jira_server_url.clone(),
            jira_username: config.jira_username.clone(),
            jira_token_configured: !config.jira_oauth_token.is_empty(),
            jira_project_key: config.jira_project_key.clone(),
            jira_ticket_type: config.jira_ticket_type.clone(),
            jira_epic_key: config.epic_key().map(str::to_string),
            doc_url: config.doc_url.clone(),
            google_token_configured: !config.google_api_token.is_empty(),
            row_delay_ms: config.row_delay_ms,
            plan_year: config.plan_year,
        }
    }
}
