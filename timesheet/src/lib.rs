//! Timesheet rules: turning a week of in/out times into worked hours,
//! checking project allocations, rolling weeks up for dashboards and deciding
//! who may move a timesheet through draft → submitted → approved/rejected.
//!
//! Everything here is synchronous and side-effect free.

mod aggregate;
mod clock;
mod entry;
mod hours;
mod lenient;
mod status;
mod timesheet;
mod validation;
mod week;

pub use aggregate::*;
pub use clock::*;
pub use entry::*;
pub use hours::*;
pub use status::*;
pub use timesheet::*;
pub use validation::*;
pub use week::*;
