//! Row-to-ticket batch processing.
//!
//! Rows are processed strictly in order, one at a time:
//! read, resolve the owner (optional), render, create, link to epic
//! (optional). Ticket failures are per row; sheet failures end the batch.

mod runner;
mod types;

pub use runner::{BatchRunner, RowReporter};
pub use types::*;
