use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::RepositoryError;
use crate::domain::{
    models::{NewNotification, Notification, UserId},
    ports::outbound::NotificationRepository,
    TimesheetError,
};

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DbNotification {
    id: i32,
    user_id: String,
    message: String,
    created_at: OffsetDateTime,
}

impl From<DbNotification> for Notification {
    fn from(row: DbNotification) -> Self {
        Notification {
            id: row.id.into(),
            user_id: row.user_id.into(),
            message: row.message,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, TimesheetError> {
        let row = sqlx::query_as::<_, DbNotification>(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, created_at
            "#,
        )
        .bind(notification.user_id.as_str())
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.into())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, TimesheetError> {
        let rows = sqlx::query_as::<_, DbNotification>(
            r#"
            SELECT id, user_id, message, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}
