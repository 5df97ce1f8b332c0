//! In-memory storage, used for local development and tests.
//!
//! Everything lives behind async locks and is lost on restart.

mod notifications;
mod projects;
mod timesheets;
mod users;

pub use notifications::InMemoryNotificationRepository;
pub use projects::InMemoryProjectCatalog;
pub use timesheets::InMemoryTimesheetRepository;
pub use users::InMemoryUserRepository;
