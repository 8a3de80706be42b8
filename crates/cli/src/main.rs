mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheet2jira_core::{
    load_config, validate_config, BatchRunner, GoogleSheetsClient, JiraClient, SanitizedConfig,
    SheetSource, TicketService, CONFIG_PATH_VAR,
};

use output::StdoutReporter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr; stdout carries one line per row.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    if let Some(path) = &config_path {
        info!("Loading configuration from {:?}", path);
    }

    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    debug!(
        "Configuration: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    info!("Opening spreadsheet {:?}", config.sheet_name);
    let sheet: Arc<dyn SheetSource> = Arc::new(
        GoogleSheetsClient::open(config.sheets_config(), &config.sheet_name)
            .await
            .with_context(|| format!("Failed to open spreadsheet {:?}", config.sheet_name))?,
    );

    let tickets: Arc<dyn TicketService> = Arc::new(
        JiraClient::new(config.jira_config()).context("Failed to create Jira client")?,
    );
    info!("Using Jira at {}", config.jira_server_url);

    let runner = BatchRunner::new(config.batch_config(), sheet, tickets);
    let report = runner.run(&StdoutReporter).await?;

    info!(
        "Done: {} rows, {} tickets created, {} errors",
        report.outcomes.len(),
        report.created(),
        report.failed()
    );

    Ok(())
}
