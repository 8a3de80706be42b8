//! In-process stand-ins for the Jira and Google APIs.
//!
//! Each stub is an axum router served on an ephemeral localhost port, so the
//! real reqwest-based clients can be exercised end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// `Basic` credentials for bot@example.com / token.
pub const JIRA_AUTH: &str = "Basic Ym90QGV4YW1wbGUuY29tOnRva2Vu";
pub const JIRA_USER: &str = "bot@example.com";
pub const JIRA_TOKEN: &str = "token";
/// Epic that exists on the stub.
pub const EPIC_KEY: &str = "ITC-100";

pub const GOOGLE_TOKEN: &str = "google-token";
pub const SPREADSHEET_NAME: &str = "IT Controls 2021";
const SPREADSHEET_ID: &str = "sheet-abc";
/// Grid size of every stub worksheet.
const GRID_ROWS: usize = 8;

/// Serve a router on 127.0.0.1 and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

// ============================================================================
// Jira
// ============================================================================

/// A request the Jira stub accepted.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct JiraStub {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl JiraStub {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Bodies posted to the create-issue endpoint.
    pub fn created_bodies(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/rest/api/3/issue")
            .map(|r| r.body)
            .collect()
    }

    fn record(&self, path: String, body: Value) -> usize {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest { path, body });
        requests
            .iter()
            .filter(|r| r.path == "/rest/api/3/issue")
            .count()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/rest/api/3/issue", post(jira_create_issue))
            .route("/rest/api/3/issue/{key}", get(jira_get_issue))
            .route("/rest/agile/1.0/epic/{key}/issue", post(jira_add_to_epic))
            .with_state(self.clone())
    }
}

fn jira_unauthorized(headers: &HeaderMap) -> Option<Response> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == JIRA_AUTH)
        .unwrap_or(false);

    if authorized {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                "Client must be authenticated to access this resource.",
            )
                .into_response(),
        )
    }
}

async fn jira_create_issue(
    State(stub): State<JiraStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = jira_unauthorized(&headers) {
        return response;
    }

    if body["fields"]["project"]["key"] != "ITC" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "errorMessages": [],
                "errors": {"project": "valid project is required"}
            })),
        )
            .into_response();
    }

    let number = stub.record("/rest/api/3/issue".to_string(), body);
    let id = 10_000 + number;
    (
        StatusCode::CREATED,
        Json(json!({
            "id": id.to_string(),
            "key": format!("ITC-{}", number),
            "self": format!("http://jira.stub/rest/api/3/issue/{}", id)
        })),
    )
        .into_response()
}

async fn jira_get_issue(headers: HeaderMap, Path(key): Path<String>) -> Response {
    if let Some(response) = jira_unauthorized(&headers) {
        return response;
    }

    if key == EPIC_KEY {
        Json(json!({
            "id": "10100",
            "key": EPIC_KEY,
            "fields": {"summary": "2021 IT Controls"}
        }))
        .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "errorMessages": ["Issue does not exist or you do not have permission to see it."],
                "errors": {}
            })),
        )
            .into_response()
    }
}

async fn jira_add_to_epic(
    State(stub): State<JiraStub>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = jira_unauthorized(&headers) {
        return response;
    }
    stub.record(format!("/rest/agile/1.0/epic/{}/issue", key), body);
    StatusCode::NO_CONTENT.into_response()
}

// ============================================================================
// Google Sheets / Drive
// ============================================================================

/// Serves one spreadsheet with a `Systems` worksheet (index 0) and an
/// `Owners` worksheet (index 1).
#[derive(Clone)]
pub struct GoogleStub {
    worksheets: Arc<HashMap<String, Vec<Vec<String>>>>,
}

impl Default for GoogleStub {
    fn default() -> Self {
        let grid = |rows: &[&[&str]]| -> Vec<Vec<String>> {
            rows.iter()
                .map(|cells| cells.iter().map(|c| c.to_string()).collect())
                .collect()
        };

        let mut worksheets = HashMap::new();
        worksheets.insert(
            "Systems".to_string(),
            grid(&[
                &["System", "Owner"],
                &["PayCore", "Jane Doe"],
                &["LedgerX", "Nobody Known"],
                &[],
                &["Vault", "Jane Doe"],
            ]),
        );
        worksheets.insert(
            "Owners".to_string(),
            grid(&[
                &["Team", "Name", "Account"],
                &["Payments", "Jane Doe", "acc123"],
                &["Ledger", "John Roe", "acc456"],
                &["Vacant", "", "acc000"],
            ]),
        );

        Self {
            worksheets: Arc::new(worksheets),
        }
    }
}

impl GoogleStub {
    /// Router serving Drive under `/drive` and Sheets under `/sheets`.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/drive/files", get(drive_list_files))
            .route("/sheets/spreadsheets/{id}", get(sheets_metadata))
            .route("/sheets/spreadsheets/{id}/values/{range}", get(sheets_values))
            .with_state(self.clone())
    }
}

fn google_unauthorized(headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", GOOGLE_TOKEN);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if authorized {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {
                    "code": 401,
                    "message": "Request had invalid authentication credentials.",
                    "status": "UNAUTHENTICATED"
                }})),
            )
                .into_response(),
        )
    }
}

async fn drive_list_files(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = google_unauthorized(&headers) {
        return response;
    }

    let q = params.get("q").cloned().unwrap_or_default();
    let files = if q.contains(&format!("name = '{}'", SPREADSHEET_NAME))
        && q.contains("mimeType = 'application/vnd.google-apps.spreadsheet'")
    {
        json!([{"id": SPREADSHEET_ID, "name": SPREADSHEET_NAME}])
    } else {
        json!([])
    };

    Json(json!({ "files": files })).into_response()
}

async fn sheets_metadata(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Some(response) = google_unauthorized(&headers) {
        return response;
    }
    if id != SPREADSHEET_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    // Listed out of order on purpose; the client sorts by index.
    Json(json!({
        "sheets": [
            {"properties": {"title": "Owners", "index": 1}},
            {"properties": {"title": "Systems", "index": 0}}
        ]
    }))
    .into_response()
}

async fn sheets_values(
    State(stub): State<GoogleStub>,
    headers: HeaderMap,
    Path((id, range)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = google_unauthorized(&headers) {
        return response;
    }
    if id != SPREADSHEET_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Some((title, span)) = parse_range(&range) else {
        return bad_request(&format!("Unable to parse range: {}", range));
    };
    let Some(rows) = stub.worksheets.get(&title) else {
        return bad_request(&format!("Unable to parse range: {}", range));
    };

    let major = params.get("majorDimension").map(String::as_str);
    match (span, major) {
        (Span::Row(row), Some("ROWS")) => {
            if row == 0 || row > GRID_ROWS {
                return bad_request(&format!(
                    "Range ({}) exceeds grid limits. Max rows: {}, max columns: 26",
                    range, GRID_ROWS
                ));
            }
            match rows.get(row - 1).filter(|cells| !cells.is_empty()) {
                Some(cells) => Json(json!({
                    "range": range,
                    "majorDimension": "ROWS",
                    "values": [cells]
                }))
                .into_response(),
                None => Json(json!({"range": range, "majorDimension": "ROWS"})).into_response(),
            }
        }
        (Span::Sheet, Some("ROWS")) => {
            let mut values: Vec<Vec<String>> = rows.clone();
            while values.last().map(|r| r.is_empty()).unwrap_or(false) {
                values.pop();
            }
            Json(json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": values
            }))
            .into_response()
        }
        (Span::Column(index), Some("COLUMNS")) => {
            let mut cells: Vec<String> = rows
                .iter()
                .map(|r| r.get(index).cloned().unwrap_or_default())
                .collect();
            while cells.last().map(|c| c.is_empty()).unwrap_or(false) {
                cells.pop();
            }
            Json(json!({
                "range": range,
                "majorDimension": "COLUMNS",
                "values": [cells]
            }))
            .into_response()
        }
        _ => bad_request("unsupported request"),
    }
}

enum Span {
    Sheet,
    Row(usize),
    Column(usize),
}

/// Parse `'Title'`, `'Title'!N:N` or `'Title'!L:L`.
fn parse_range(range: &str) -> Option<(String, Span)> {
    let unquote = |title: &str| -> Option<String> {
        Some(title.strip_prefix('\'')?.strip_suffix('\'')?.replace("''", "'"))
    };

    let Some((title, span)) = range.rsplit_once('!') else {
        return Some((unquote(range)?, Span::Sheet));
    };
    let title = unquote(title)?;
    let (from, to) = span.split_once(':')?;
    if from != to {
        return None;
    }

    if let Ok(row) = from.parse::<usize>() {
        return Some((title, Span::Row(row)));
    }

    let mut chars = from.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => {
            Some((title, Span::Column((c as u8 - b'A') as usize)))
        }
        _ => None,
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {
            "code": 400,
            "message": message,
            "status": "INVALID_ARGUMENT"
        }})),
    )
        .into_response()
}
