//! Google Sheets client.
//!
//! A spreadsheet is opened by its document name through the Drive v3 file
//! listing; rows are read through the Sheets v4 values API. Requests carry an
//! OAuth bearer token obtained outside this tool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Column, Row};
use super::{SheetError, SheetSource};

const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Google Sheets client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSheetsConfig {
    /// OAuth access token with spreadsheets and drive read scopes.
    pub access_token: String,
    /// Sheets API base URL (default: https://sheets.googleapis.com/v4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets_base_url: Option<String>,
    /// Drive API base URL (default: https://www.googleapis.com/drive/v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// An opened Google spreadsheet.
pub struct GoogleSheetsClient {
    client: Client,
    sheets_base_url: String,
    access_token: String,
    spreadsheet_id: String,
    /// Worksheet titles ordered by worksheet index.
    worksheet_titles: Vec<String>,
}

impl GoogleSheetsClient {
    /// Open the spreadsheet named `name`.
    ///
    /// Looks the document up by name and caches its worksheet titles, so
    /// later reads address worksheets by index without extra requests.
    pub async fn open(config: GoogleSheetsConfig, name: &str) -> Result<Self, SheetError> {
        if config.access_token.is_empty() {
            return Err(SheetError::Unauthorized(
                "Google API token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let sheets_base_url = config
            .sheets_base_url
            .unwrap_or_else(|| DEFAULT_SHEETS_URL.to_string());
        let drive_base_url = config
            .drive_base_url
            .unwrap_or_else(|| DEFAULT_DRIVE_URL.to_string());

        let spreadsheet_id =
            find_spreadsheet_id(&client, &drive_base_url, &config.access_token, name).await?;
        debug!("Spreadsheet '{}' has id {}", name, spreadsheet_id);

        let mut sheet = Self {
            client,
            sheets_base_url,
            access_token: config.access_token,
            spreadsheet_id,
            worksheet_titles: Vec::new(),
        };
        sheet.worksheet_titles = sheet.fetch_worksheet_titles().await?;
        debug!("Worksheets: {:?}", sheet.worksheet_titles);

        Ok(sheet)
    }

    /// Id of the opened spreadsheet.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Worksheet titles ordered by index.
    pub fn worksheet_titles(&self) -> &[String] {
        &self.worksheet_titles
    }

    async fn fetch_worksheet_titles(&self) -> Result<Vec<String>, SheetError> {
        let url = format!("{}/spreadsheets/{}", self.sheets_base_url, self.spreadsheet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties(title,index)")])
            .send()
            .await?;

        let metadata: SpreadsheetMetadata = parse_json(check_status(response).await?).await?;

        let mut properties: Vec<WorksheetProperties> =
            metadata.sheets.into_iter().map(|s| s.properties).collect();
        properties.sort_by_key(|p| p.index);

        Ok(properties.into_iter().map(|p| p.title).collect())
    }

    fn worksheet_title(&self, worksheet: usize) -> Result<&str, SheetError> {
        self.worksheet_titles
            .get(worksheet)
            .map(String::as_str)
            .ok_or(SheetError::WorksheetNotFound(worksheet))
    }

    /// Fetch an A1 range, returning the `values` matrix.
    async fn get_values(
        &self,
        range: &str,
        major_dimension: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        );

        debug!("Sheets read: range={}", range);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("majorDimension", major_dimension)])
            .send()
            .await?;

        let range: ValueRange = parse_json(check_status(response).await?).await?;
        Ok(range.values)
    }

    /// Number of rows up to and including the last populated one. The API
    /// trims trailing blank rows from a whole-worksheet read.
    async fn populated_rows(&self, title: &str) -> Result<usize, SheetError> {
        let rows = self.get_values(&quote_title(title), "ROWS").await?;
        Ok(rows.len())
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn read_row(&self, worksheet: usize, row: u32) -> Result<Row, SheetError> {
        let title = self.worksheet_title(worksheet)?;
        let range = format!("{}!{}:{}", quote_title(title), row, row);

        let values = match self.get_values(&range, "ROWS").await {
            Ok(values) => values,
            Err(SheetError::ApiError { status: 400, message })
                if message.contains("exceeds grid limits") =>
            {
                return Err(SheetError::RowOutOfRange { worksheet, row });
            }
            Err(e) => return Err(e),
        };

        if let Some(cells) = values.into_iter().next() {
            return Ok(Row::new(row, cells));
        }

        // Blank rows come back without values. Only rows past the last
        // populated one are out of range.
        let populated = self.populated_rows(title).await?;
        if (row as usize) <= populated {
            debug!("Row {} of worksheet {} is blank", row, worksheet);
            Ok(Row::new(row, Vec::new()))
        } else {
            Err(SheetError::RowOutOfRange { worksheet, row })
        }
    }

    async fn find_row(
        &self,
        worksheet: usize,
        column: Column,
        value: &str,
    ) -> Result<Option<Row>, SheetError> {
        // An empty name would match the first blank cell.
        if value.is_empty() {
            return Ok(None);
        }

        let title = self.worksheet_title(worksheet)?;
        let letter = column.letter();
        let range = format!("{}!{}:{}", quote_title(title), letter, letter);

        let columns = self.get_values(&range, "COLUMNS").await?;
        let position = columns
            .into_iter()
            .next()
            .and_then(|cells| cells.iter().position(|cell| cell == value));

        match position {
            Some(index) => {
                let row = index as u32 + 1;
                debug!("Found {:?} in column {} at row {}", value, letter, row);
                self.read_row(worksheet, row).await.map(Some)
            }
            None => Ok(None),
        }
    }
}

async fn find_spreadsheet_id(
    client: &Client,
    drive_base_url: &str,
    access_token: &str,
    name: &str,
) -> Result<String, SheetError> {
    let url = format!("{}/files", drive_base_url);
    let query = format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escape_query_literal(name),
        SPREADSHEET_MIME_TYPE
    );

    debug!("Drive lookup: name='{}'", name);

    let response = client
        .get(&url)
        .bearer_auth(access_token)
        .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
        .send()
        .await?;

    let listing: DriveFileList = parse_json(check_status(response).await?).await?;

    listing
        .files
        .into_iter()
        .next()
        .map(|file| file.id)
        .ok_or_else(|| SheetError::SpreadsheetNotFound(name.to_string()))
}

async fn check_status(response: Response) -> Result<Response, SheetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SheetError::Unauthorized(message));
    }

    Err(SheetError::ApiError {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, SheetError> {
    response
        .json()
        .await
        .map_err(|e| SheetError::ParseError(e.to_string()))
}

/// Quote a worksheet title for use in A1 notation.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Escape a string literal for a Drive `q` parameter.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<WorksheetEntry>,
}

#[derive(Debug, Deserialize)]
struct WorksheetEntry {
    properties: WorksheetProperties,
}

#[derive(Debug, Deserialize)]
struct WorksheetProperties {
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}
