use time::OffsetDateTime;
use timesheet::{
    Entries, ReviewAction, Role, Summary, Timesheet, TimesheetStatus,
    ValidationIssue, Week,
};

use super::{Notification, TimesheetId, UserId};

/// A timesheet as persisted: the week's content plus ownership, review
/// stamps and a version counter for conditional writes.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetRecord {
    pub id: TimesheetId,
    pub owner: UserId,
    pub sheet: Timesheet,
    pub reviewer: Option<UserId>,
    pub reviewed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

impl TimesheetRecord {
    pub fn week(&self) -> Week {
        self.sheet.week
    }

    pub fn status(&self) -> TimesheetStatus {
        self.sheet.status
    }

    pub fn total_hours(&self) -> f64 {
        self.sheet.total_hours()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTimesheet {
    pub owner: UserId,
    pub sheet: Timesheet,
}

/// An employee saving their week, either as a draft or for review.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTimesheetRequest {
    pub week: Week,
    pub entries: Entries,
    pub status: TimesheetStatus,
    /// When set, the save fails with a conflict unless the stored sheet is
    /// still at this version.
    pub expected_version: Option<i32>,
}

impl SaveTimesheetRequest {
    pub fn new(week: Week, entries: Entries, status: TimesheetStatus) -> Self {
        Self {
            week,
            entries,
            status,
            expected_version: None,
        }
    }

    pub fn with_expected_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    pub id: TimesheetId,
    pub action: ReviewAction,
    pub comment: Option<String>,
    pub expected_version: Option<i32>,
}

impl ReviewRequest {
    pub fn new(id: TimesheetId, action: ReviewAction) -> Self {
        Self {
            id,
            action,
            comment: None,
            expected_version: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_expected_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// What the week editor shows: the stored sheet or a blank draft, and
/// what the viewer may do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub owner: UserId,
    pub sheet: Timesheet,
    pub stored: Option<TimesheetRecord>,
    pub role: Role,
    pub week_ended: bool,
    pub can_transition: bool,
    /// What would block submission right now. Only filled for the owner
    /// while the sheet is editable.
    pub submit_issues: Vec<ValidationIssue>,
}

/// The employee landing page for the current week.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub week: Week,
    pub status: TimesheetStatus,
    pub total_hours: f64,
    pub due_in_days: i64,
    /// Days left before the deadline, when the sheet still needs attention.
    pub deadline_alert: Option<i64>,
    pub notifications: Vec<Notification>,
}

/// Filters for the admin list. `status` selects the tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminQuery {
    pub status: Option<TimesheetStatus>,
    pub search: Option<String>,
}

impl AdminQuery {
    /// The tab shown when none is picked.
    pub const DEFAULT_STATUS: TimesheetStatus = TimesheetStatus::Submitted;

    pub fn status(&self) -> TimesheetStatus {
        self.status.unwrap_or(Self::DEFAULT_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminRow {
    pub record: TimesheetRecord,
    pub owner_email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub summary: Summary,
    pub rows: Vec<AdminRow>,
}
