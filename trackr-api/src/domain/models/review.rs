use time::OffsetDateTime;
use timesheet::ReviewAction;

use super::{ReviewId, TimesheetId, UserId};

/// An admin decision on a submitted timesheet. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub timesheet_id: TimesheetId,
    pub action: ReviewAction,
    /// Empty for approvals without a comment.
    pub comment: String,
    pub reviewer: UserId,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub timesheet_id: TimesheetId,
    pub action: ReviewAction,
    pub comment: String,
    pub reviewer: UserId,
}
