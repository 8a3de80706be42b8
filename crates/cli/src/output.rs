use sheet2jira_core::{RowOutcome, RowReporter, RowStatus};

/// Prints each row's result to stdout as soon as the row is done.
pub struct StdoutReporter;

impl RowReporter for StdoutReporter {
    fn report(&self, outcome: &RowOutcome) {
        for line in outcome_lines(outcome) {
            println!("{}", line);
        }
    }
}

/// Lines printed for one row: the created ticket, then any error.
pub fn outcome_lines(outcome: &RowOutcome) -> Vec<String> {
    match &outcome.status {
        RowStatus::Created { key } | RowStatus::Linked { key, .. } => {
            vec![format!("create new ticket {}", key)]
        }
        RowStatus::LinkFailed { key, error } => {
            vec![format!("create new ticket {}", key), error.clone()]
        }
        RowStatus::Failed { error } => vec![error.clone()],
    }
}
