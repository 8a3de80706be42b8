pub mod batch;
pub mod config;
pub mod document;
pub mod jira;
pub mod owner;
pub mod sheet;
pub mod testing;

pub use batch::{BatchConfig, BatchError, BatchReport, BatchRunner, RowOutcome, RowReporter, RowStatus};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    CONFIG_PATH_VAR,
};
pub use document::{build_description, summary, Document, OwnerRef, TemplateContext};
pub use jira::{CreatedIssue, IssueRef, JiraClient, JiraConfig, JiraError, TicketRequest, TicketService};
pub use owner::{OwnerLookupConfig, OwnerLookupError, OwnerResolver};
pub use sheet::{
    index_from_col, Column, GoogleSheetsClient, GoogleSheetsConfig, Row, RowRange, SheetError,
    SheetSource,
};
