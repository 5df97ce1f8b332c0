use async_trait::async_trait;

use crate::domain::{
    models::{NewNotification, Notification, UserId},
    TimesheetError,
};

#[async_trait]
pub trait NotificationRepository: Send + Sync + 'static {
    async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, TimesheetError>;

    /// Notifications addressed to `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId)
        -> Result<Vec<Notification>, TimesheetError>;
}
