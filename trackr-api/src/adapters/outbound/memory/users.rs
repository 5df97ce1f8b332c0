use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    models::{User, UserId},
    ports::outbound::UserRepository,
    TimesheetError,
};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users
            .get_mut()
            .extend(users.into_iter().map(|user| (user.id.clone(), user)));
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, TimesheetError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, TimesheetError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn upsert(&self, id: &UserId, email: &str) -> Result<User, TimesheetError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(id.clone())
            .and_modify(|user| user.email = email.to_string())
            .or_insert_with(|| User::new(id.clone(), email));
        Ok(user.clone())
    }
}
