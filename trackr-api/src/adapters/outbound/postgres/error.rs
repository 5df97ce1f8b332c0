use thiserror::Error;

use crate::domain::TimesheetError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<RepositoryError> for TimesheetError {
    fn from(err: RepositoryError) -> Self {
        TimesheetError::storage(err.to_string())
    }
}
