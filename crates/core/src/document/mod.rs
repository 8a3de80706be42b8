//! Ticket description documents.

mod template;
mod types;

pub use template::{build_description, summary, OwnerRef, TemplateContext};
pub use types::*;
