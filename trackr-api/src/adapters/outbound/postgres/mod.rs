//! PostgreSQL implementations of the outbound ports.

mod error;
mod notifications;
mod projects;
mod timesheets;
mod users;

pub use error::RepositoryError;
pub use notifications::PostgresNotificationRepository;
pub use projects::PostgresProjectCatalog;
pub use timesheets::PostgresTimesheetRepository;
pub use users::PostgresUserRepository;
