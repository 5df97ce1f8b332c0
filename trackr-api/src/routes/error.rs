use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use timesheet::WorkflowError;

use crate::domain::TimesheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    WorkflowViolation,
    VersionConflict,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
    details: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            details: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Individual problems behind the error, shown as a list by clients.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TimesheetError> for ApiError {
    fn from(err: TimesheetError) -> Self {
        match err {
            TimesheetError::NotFound => Self::not_found(err.to_string()),
            TimesheetError::Forbidden => Self::forbidden(err.to_string()),
            TimesheetError::Workflow(
                WorkflowError::NotOwner(_) | WorkflowError::NotAdmin(_),
            ) => Self::forbidden(err.to_string()).with_code(ErrorCode::WorkflowViolation),
            TimesheetError::Workflow(_) => {
                Self::conflict(err.to_string()).with_code(ErrorCode::WorkflowViolation)
            }
            TimesheetError::Validation(ref issues) => {
                let details = issues.iter().map(ToString::to_string).collect();
                Self::unprocessable(err.to_string())
                    .with_code(ErrorCode::ValidationFailed)
                    .with_details(details)
            }
            TimesheetError::InvalidEntries(_)
            | TimesheetError::InvalidTarget(_)
            | TimesheetError::CommentRequired => Self::bad_request(err.to_string()),
            TimesheetError::Conflict => {
                Self::conflict(err.to_string()).with_code(ErrorCode::VersionConflict)
            }
            TimesheetError::Storage(message) => {
                tracing::error!("Storage operation failed: {}", message);
                Self::internal("could not save changes, please try again")
            }
            TimesheetError::Unknown(message) => {
                tracing::error!("Timesheet operation failed: {}", message);
                Self::internal(message)
            }
        }
    }
}
