use std::io::Write;
use std::net::TcpListener;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const CONFIG_KEYS: &[&str] = &[
    "SHEET_NAME",
    "PRIMARY_SHEET",
    "SECONDARY_SHEET",
    "ITEM_NAME",
    "TOOL_OWNER",
    "OWNER_ID",
    "DATA_RANGE",
    "JIRA_SERVER_URL",
    "JIRA_USERNAME",
    "JIRA_OAUTH_TOKEN",
    "JIRA_PROJECT_KEY",
    "JIRA_TICKET_TYPE",
    "JIRA_EPIC_KEY",
    "DOC_URL",
    "GOOGLE_API_TOKEN",
    "GOOGLE_SHEETS_URL",
    "GOOGLE_DRIVE_URL",
    "ROW_DELAY_MS",
    "PLAN_YEAR",
    "REQUEST_TIMEOUT_SECS",
];

/// Find a port nothing listens on
fn closed_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Run the binary with a clean configuration environment
fn run_with(config_path: &std::path::Path, extra_env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sheet2jira"));
    for key in CONFIG_KEYS {
        command.env_remove(key);
    }
    command
        .env("SHEET2JIRA_CONFIG", config_path)
        .env("RUST_LOG", "error");
    for (key, value) in extra_env {
        command.env(key, value);
    }
    command.output().expect("Failed to run sheet2jira")
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_with_google_at(url: &str) -> String {
    format!(
        r#"
sheet_name = "IT Controls 2021"
primary_sheet = 0
item_name = "A"
tool_owner = "B"
data_range = "2:3"
jira_server_url = "http://127.0.0.1:1"
jira_username = "bot@example.com"
jira_oauth_token = "secret"
jira_project_key = "ITC"
jira_ticket_type = "Task"
doc_url = "https://wiki.example.com/it-controls"
google_api_token = "token"
google_sheets_url = "{url}"
google_drive_url = "{url}"
request_timeout_secs = 2
"#
    )
}

#[test]
fn test_missing_config_file_exits_with_error() {
    let output = run_with(std::path::Path::new("/nonexistent/sheet2jira.toml"), &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"), "{}", stderr);
}

#[test]
fn test_invalid_config_exits_with_error() {
    let config = config_with_google_at("http://127.0.0.1:1");
    let file = write_config(&config);

    let output = run_with(file.path(), &[("JIRA_PROJECT_KEY", " ")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"), "{}", stderr);
}

#[test]
fn test_unreachable_spreadsheet_exits_with_error() {
    let url = format!("http://127.0.0.1:{}", closed_port());
    let file = write_config(&config_with_google_at(&url));

    let output = run_with(file.path(), &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open spreadsheet"), "{}", stderr);
}
