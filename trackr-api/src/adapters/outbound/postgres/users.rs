use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryError;
use crate::domain::{
    models::{User, UserId},
    ports::outbound::UserRepository,
    TimesheetError,
};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DbUser {
    id: String,
    email: String,
    is_admin: bool,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User::new(row.id, row.email).with_admin(row.is_admin)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, TimesheetError> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, is_admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(user.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, TimesheetError> {
        let users = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, is_admin
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn upsert(&self, id: &UserId, email: &str) -> Result<User, TimesheetError> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, is_admin
            "#,
        )
        .bind(id.as_str())
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(user.into())
    }
}
