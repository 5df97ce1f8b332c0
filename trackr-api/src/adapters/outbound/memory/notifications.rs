use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::{
    models::{NewNotification, Notification, NotificationId, UserId},
    ports::outbound::NotificationRepository,
    TimesheetError,
};

#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, TimesheetError> {
        let mut notifications = self.notifications.write().await;
        let stored = Notification {
            id: NotificationId::new(notifications.len() as i32 + 1),
            user_id: notification.user_id.clone(),
            message: notification.message.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        notifications.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, TimesheetError> {
        // ids grow with insertion order, so reversing gives newest first
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect())
    }
}
