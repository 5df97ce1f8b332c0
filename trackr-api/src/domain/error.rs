use thiserror::Error;
use timesheet::{TimesheetStatus, ValidationIssue, WorkflowError};

/// Errors that can occur during timesheet operations.
#[derive(Debug, Error)]
pub enum TimesheetError {
    #[error("timesheet not found")]
    NotFound,
    #[error("you do not have access to this timesheet")]
    Forbidden,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("timesheet has {} problem(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
    #[error("invalid entries: {0}")]
    InvalidEntries(String),
    #[error("a timesheet can only be saved as draft or submitted, not {0}")]
    InvalidTarget(TimesheetStatus),
    #[error("enter a comment when rejecting a timesheet")]
    CommentRequired,
    #[error("the timesheet was changed by someone else, reload and try again")]
    Conflict,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Unknown(String),
}

impl TimesheetError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
