//! HTTP response types for the timesheet endpoints.
//!
//! These types serialize to the JSON format expected by the frontend.

use chrono::NaiveDate;
use serde::Serialize;
use time::OffsetDateTime;
use timesheet::{
    DayEntry, DaySummary, Entries, ReviewAction, Role, Summary, TimesheetStatus, ValidationIssue,
};

use crate::domain::models::{
    Actor, AdminOverview, AdminRow, Dashboard, Notification, Project, Review, TimesheetRecord, User,
    WeekView,
};

/// A stored timesheet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetResponse {
    pub id: i32,
    pub owner: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub status: TimesheetStatus,
    pub entries: Entries,
    pub total_hours: f64,
    pub reviewer: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Send back as `expectedVersion` to make the next write conditional.
    pub version: i32,
}

impl From<TimesheetRecord> for TimesheetResponse {
    fn from(record: TimesheetRecord) -> Self {
        Self {
            id: record.id.as_i32(),
            owner: record.owner.to_string(),
            week_start: record.sheet.week_start(),
            week_end: record.sheet.week_end(),
            status: record.sheet.status,
            total_hours: record.sheet.total_hours(),
            entries: record.sheet.entries,
            reviewer: record.reviewer.map(|id| id.to_string()),
            reviewed_at: record.reviewed_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
            version: record.version,
        }
    }
}

/// One weekday column of the editor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub key: NaiveDate,
    pub label: String,
    pub span_hours: f64,
    pub overtime: f64,
    pub worked_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
}

impl DayResponse {
    fn new(key: NaiveDate, label: String, summary: DaySummary) -> Self {
        Self {
            key,
            label,
            span_hours: summary.span_hours,
            overtime: summary.overtime,
            worked_hours: summary.worked_hours,
            regular_hours: summary.split.regular,
            overtime_hours: summary.split.overtime,
        }
    }
}

/// The week editor: the sheet (stored or blank) with per-day figures and
/// what the viewer may do next.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    /// `None` until the week has been saved once.
    pub id: Option<i32>,
    pub version: Option<i32>,
    pub owner: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub status: TimesheetStatus,
    pub entries: Entries,
    pub days: Vec<DayResponse>,
    pub total_hours: f64,
    pub reviewer: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<OffsetDateTime>,
    pub role: Role,
    pub week_ended: bool,
    pub can_transition: bool,
    pub submit_issues: Vec<IssueResponse>,
}

impl From<WeekView> for WeekResponse {
    fn from(view: WeekView) -> Self {
        let days = view
            .sheet
            .week
            .slots()
            .into_iter()
            .map(|slot| {
                let summary = view
                    .sheet
                    .entries
                    .get(&slot.date)
                    .map(DayEntry::summary)
                    .unwrap_or_else(|| DayEntry::default().summary());
                DayResponse::new(slot.date, slot.label, summary)
            })
            .collect();

        let stored = view.stored.as_ref();
        Self {
            id: stored.map(|r| r.id.as_i32()),
            version: stored.map(|r| r.version),
            reviewer: stored.and_then(|r| r.reviewer.as_ref()).map(|id| id.to_string()),
            reviewed_at: stored.and_then(|r| r.reviewed_at),
            owner: view.owner.to_string(),
            week_start: view.sheet.week_start(),
            week_end: view.sheet.week_end(),
            status: view.sheet.status,
            total_hours: view.sheet.total_hours(),
            days,
            entries: view.sheet.entries,
            role: view.role,
            week_ended: view.week_ended,
            can_transition: view.can_transition,
            submit_issues: view.submit_issues.iter().map(IssueResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub date: NaiveDate,
    pub message: String,
}

impl From<&ValidationIssue> for IssueResponse {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            date: issue.date(),
            message: issue.to_string(),
        }
    }
}

/// A row of the history list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemResponse {
    pub id: i32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
    pub status: TimesheetStatus,
}

impl From<TimesheetRecord> for HistoryItemResponse {
    fn from(record: TimesheetRecord) -> Self {
        Self {
            id: record.id.as_i32(),
            week_start: record.sheet.week_start(),
            week_end: record.sheet.week_end(),
            total_hours: record.total_hours(),
            status: record.status(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i32,
    pub action: ReviewAction,
    pub comment: String,
    pub reviewer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.as_i32(),
            action: review.action,
            comment: review.comment,
            reviewer: review.reviewer.to_string(),
            timestamp: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i32,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.as_i32(),
            message: notification.message,
            created_at: notification.created_at,
        }
    }
}

/// Project response - simplified for frontend use.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub project_id: String,
    pub project_name: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            project_id: project.id.to_string(),
            project_name: project.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&Actor> for UserResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.user_id.to_string(),
            email: actor.email.clone(),
            is_admin: actor.is_admin,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub status: TimesheetStatus,
    pub total_hours: f64,
    pub due_in_days: i64,
    pub deadline_alert: Option<i64>,
    pub notifications: Vec<NotificationResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            week_start: dashboard.week.start(),
            week_end: dashboard.week.end(),
            status: dashboard.status,
            total_hours: dashboard.total_hours,
            due_in_days: dashboard.due_in_days,
            deadline_alert: dashboard.deadline_alert,
            notifications: dashboard
                .notifications
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTimesheetResponse {
    pub id: i32,
    pub owner: String,
    pub email: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
    pub status: TimesheetStatus,
    pub version: i32,
}

impl From<AdminRow> for AdminTimesheetResponse {
    fn from(row: AdminRow) -> Self {
        let record = row.record;
        Self {
            id: record.id.as_i32(),
            owner: record.owner.to_string(),
            email: row.owner_email,
            week_start: record.sheet.week_start(),
            week_end: record.sheet.week_end(),
            total_hours: record.total_hours(),
            status: record.status(),
            version: record.version,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverviewResponse {
    pub summary: Summary,
    pub timesheets: Vec<AdminTimesheetResponse>,
}

impl From<AdminOverview> for AdminOverviewResponse {
    fn from(overview: AdminOverview) -> Self {
        Self {
            summary: overview.summary,
            timesheets: overview
                .rows
                .into_iter()
                .map(AdminTimesheetResponse::from)
                .collect(),
        }
    }
}
