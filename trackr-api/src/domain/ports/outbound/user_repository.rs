use async_trait::async_trait;

use crate::domain::{
    models::{User, UserId},
    TimesheetError,
};

/// Outbound port for user profiles.
///
/// The identity itself comes from the authentication layer; this only keeps
/// the email and admin flag that go with it.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn get(&self, id: &UserId) -> Result<Option<User>, TimesheetError>;

    async fn list(&self) -> Result<Vec<User>, TimesheetError>;

    /// Create or update a profile's email. The admin flag is never changed
    /// here.
    async fn upsert(&self, id: &UserId, email: &str) -> Result<User, TimesheetError>;
}
