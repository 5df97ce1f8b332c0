use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{models::Project, ports::outbound::ProjectCatalog, TimesheetError};

#[derive(Debug, Default)]
pub struct InMemoryProjectCatalog {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(mut self, projects: impl IntoIterator<Item = Project>) -> Self {
        self.projects.get_mut().extend(projects);
        self
    }
}

#[async_trait]
impl ProjectCatalog for InMemoryProjectCatalog {
    async fn active_projects(&self) -> Result<Vec<Project>, TimesheetError> {
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect())
    }
}
