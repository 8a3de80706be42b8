use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Column letters and the row range are checked while parsing; this covers
/// required values and settings that only make sense together.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let required = [
        ("sheet_name", &config.sheet_name),
        ("jira_server_url", &config.jira_server_url),
        ("jira_username", &config.jira_username),
        ("jira_oauth_token", &config.jira_oauth_token),
        ("jira_project_key", &config.jira_project_key),
        ("jira_ticket_type", &config.jira_ticket_type),
        ("doc_url", &config.doc_url),
        ("google_api_token", &config.google_api_token),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    if !config.jira_server_url.starts_with("http://")
        && !config.jira_server_url.starts_with("https://")
    {
        return Err(ConfigError::ValidationError(format!(
            "jira_server_url must be an http(s) URL, got {:?}",
            config.jira_server_url
        )));
    }

    match (config.secondary_sheet, config.owner_id) {
        (Some(_), None) => {
            return Err(ConfigError::ValidationError(
                "secondary_sheet is set but owner_id is not".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::ValidationError(
                "owner_id is set but secondary_sheet is not".to_string(),
            ))
        }
        _ => {}
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "request_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
