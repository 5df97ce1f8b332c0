use timesheet::TimesheetStatus;

use super::{TimesheetId, UserId};

/// Broadcast whenever a stored timesheet changes.
///
/// Subscribers treat it as a hint and re-read what they need.
#[derive(Debug, Clone, PartialEq)]
pub enum TimesheetEvent {
    Saved {
        id: TimesheetId,
        owner: UserId,
        status: TimesheetStatus,
    },
    Reviewed {
        id: TimesheetId,
        owner: UserId,
        status: TimesheetStatus,
    },
    Deleted {
        id: TimesheetId,
        owner: UserId,
    },
}
