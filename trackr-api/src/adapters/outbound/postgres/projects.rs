use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryError;
use crate::domain::{models::Project, ports::outbound::ProjectCatalog, TimesheetError};

pub struct PostgresProjectCatalog {
    pool: PgPool,
}

impl PostgresProjectCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DbProject {
    id: String,
    name: String,
    active: bool,
}

#[async_trait]
impl ProjectCatalog for PostgresProjectCatalog {
    async fn active_projects(&self) -> Result<Vec<Project>, TimesheetError> {
        let projects = sqlx::query_as::<_, DbProject>(
            r#"
            SELECT id, name, active
            FROM projects
            WHERE active
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(projects
            .into_iter()
            .map(|row| Project::new(row.id, row.name).with_active(row.active))
            .collect())
    }
}
