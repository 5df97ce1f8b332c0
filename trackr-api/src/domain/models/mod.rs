mod events;
mod ids;
mod notification;
mod project;
mod record;
mod review;
mod user;

pub use events::*;
pub use ids::*;
pub use notification::*;
pub use project::*;
pub use record::*;
pub use review::*;
pub use user::*;
