//! Composition root: the only place that picks concrete outbound adapters.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    adapters::outbound::{
        memory::{
            InMemoryNotificationRepository, InMemoryProjectCatalog, InMemoryTimesheetRepository,
            InMemoryUserRepository,
        },
        postgres::{
            PostgresNotificationRepository, PostgresProjectCatalog, PostgresTimesheetRepository,
            PostgresUserRepository,
        },
        SystemClock,
    },
    app_state::{AppState, AppStateError},
    config::{Settings, StorageBackend},
    domain::{
        models::{Project, User},
        ports::outbound::Clock,
        services::TimesheetServiceImpl,
    },
};

pub async fn build_app_state(settings: &Settings) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let user_header = settings.auth.user_header.as_str();

    let app_state = match settings.application.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage with demo data; nothing survives a restart");
            in_memory_app_state(clock, user_header, demo_users(), demo_projects())?
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(5))
                .connect_with(settings.database.with_db())
                .await
                .context("Failed to connect to Postgres")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations are up to date");

            postgres_app_state(pool, clock, user_header)?
        }
    };

    Ok(app_state)
}

pub fn in_memory_app_state(
    clock: Arc<dyn Clock>,
    user_header: &str,
    users: InMemoryUserRepository,
    projects: InMemoryProjectCatalog,
) -> Result<AppState, AppStateError> {
    let users = Arc::new(users);
    let service = TimesheetServiceImpl::new(
        Arc::new(InMemoryTimesheetRepository::new()),
        Arc::new(InMemoryNotificationRepository::new()),
        Arc::new(projects),
        users.clone(),
        clock,
    );

    AppState::new(Arc::new(service), users, user_header)
}

fn postgres_app_state(
    pool: PgPool,
    clock: Arc<dyn Clock>,
    user_header: &str,
) -> Result<AppState, AppStateError> {
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let service = TimesheetServiceImpl::new(
        Arc::new(PostgresTimesheetRepository::new(pool.clone())),
        Arc::new(PostgresNotificationRepository::new(pool.clone())),
        Arc::new(PostgresProjectCatalog::new(pool)),
        users.clone(),
        clock,
    );

    AppState::new(Arc::new(service), users, user_header)
}

/// One employee and one admin, so both sides of the workflow can be tried
/// locally.
pub fn demo_users() -> InMemoryUserRepository {
    InMemoryUserRepository::new().with_users([
        User::new("demo-employee", "employee@example.com"),
        User::new("demo-admin", "admin@example.com").with_admin(true),
    ])
}

pub fn demo_projects() -> InMemoryProjectCatalog {
    InMemoryProjectCatalog::new().with_projects([
        Project::new("internal", "Internal"),
        Project::new("client-a", "Client A"),
        Project::new("support", "Support"),
        Project::new("archived", "Archived").with_active(false),
    ])
}
