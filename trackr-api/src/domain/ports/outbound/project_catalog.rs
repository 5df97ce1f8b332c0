use async_trait::async_trait;

use crate::domain::{models::Project, TimesheetError};

/// Outbound port for the list of projects time can be booked on.
#[async_trait]
pub trait ProjectCatalog: Send + Sync + 'static {
    async fn active_projects(&self) -> Result<Vec<Project>, TimesheetError>;
}
