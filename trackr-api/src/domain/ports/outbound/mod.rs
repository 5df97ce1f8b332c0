mod clock;
mod notification_repository;
mod project_catalog;
mod timesheet_repository;
mod user_repository;

pub use clock::*;
pub use notification_repository::*;
pub use project_catalog::*;
pub use timesheet_repository::*;
pub use user_repository::*;
