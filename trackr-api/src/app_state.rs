use std::sync::Arc;

use axum::http::{header::InvalidHeaderName, HeaderName};

use crate::domain::ports::{inbound::TimesheetService, outbound::UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Invalid user header name '{0}': {1}")]
    InvalidUserHeader(String, InvalidHeaderName),
}

#[derive(Clone)]
pub struct AppState {
    pub timesheets: Arc<dyn TimesheetService>,
    pub users: Arc<dyn UserRepository>,
    /// Header the identity proxy puts the authenticated user id in.
    pub user_header: HeaderName,
}

impl AppState {
    pub fn new(
        timesheets: Arc<dyn TimesheetService>,
        users: Arc<dyn UserRepository>,
        user_header: &str,
    ) -> Result<Self, AppStateError> {
        let user_header = HeaderName::try_from(user_header)
            .map_err(|e| AppStateError::InvalidUserHeader(user_header.to_string(), e))?;

        Ok(Self {
            timesheets,
            users,
            user_header,
        })
    }
}
