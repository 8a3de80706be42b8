use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::collections::BTreeMap;
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "SHEET2JIRA_CONFIG";

/// Environment variables read into [`Config`]. Each maps to the field of the
/// same name in lower case.
pub const ENV_KEYS: &[&str] = &[
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

/// Keys whose values figment parses. The rest are taken verbatim, so a sheet
/// name like `2021` or an all-digit token stays a string.
const NUMERIC_ENV_KEYS: &[&str] = &[
    "PRIMARY_SHEET",
    "SECONDARY_SHEET",
    "ROW_DELAY_MS",
    "PLAN_YEAR",
    "REQUEST_TIMEOUT_SECS",
];

/// Load configuration from an optional TOML file, with environment variables
/// taking precedence.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(Env::raw().only(NUMERIC_ENV_KEYS))
        .merge(string_env())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// String settings from the environment, uncoerced.
fn string_env() -> Serialized<BTreeMap<String, String>> {
    let values = ENV_KEYS
        .iter()
        .filter(|key| !NUMERIC_ENV_KEYS.contains(*key))
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .map(|value| (key.to_lowercase(), value))
        })
        .collect();
    Serialized::defaults(values)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
