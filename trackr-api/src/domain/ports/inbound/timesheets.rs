use async_trait::async_trait;
use timesheet::{HistoryFilter, Summary, Week};
use tokio::sync::broadcast;

use crate::domain::{
    models::{
        Actor, AdminOverview, AdminQuery, Dashboard, Notification, Project, Review,
        ReviewRequest, SaveTimesheetRequest, TimesheetEvent, TimesheetId, TimesheetRecord,
        UserId, WeekView,
    },
    TimesheetError,
};

/// Inbound port for timesheet operations.
///
/// Every call names its [`Actor`] explicitly; permissions are decided from
/// the actor and the sheet's owner, never from ambient state.
#[async_trait]
pub trait TimesheetService: Send + Sync + 'static {
    // ========================================================================
    // Employee
    // ========================================================================

    /// The sheet for `week` owned by `owner` (the actor when `None`), or a
    /// blank draft if none is stored yet.
    async fn get_week(
        &self,
        actor: &Actor,
        owner: Option<&UserId>,
        week: Week,
    ) -> Result<WeekView, TimesheetError>;

    /// Save the actor's own week as draft or submit it for review.
    async fn save(
        &self,
        actor: &Actor,
        request: SaveTimesheetRequest,
    ) -> Result<TimesheetRecord, TimesheetError>;

    async fn delete_draft(&self, actor: &Actor, id: TimesheetId) -> Result<(), TimesheetError>;

    /// The actor's timesheets matching `filter`, newest week first.
    async fn history(
        &self,
        actor: &Actor,
        filter: HistoryFilter,
    ) -> Result<Vec<TimesheetRecord>, TimesheetError>;

    async fn export_history_csv(
        &self,
        actor: &Actor,
        filter: HistoryFilter,
    ) -> Result<String, TimesheetError>;

    async fn dashboard(&self, actor: &Actor) -> Result<Dashboard, TimesheetError>;

    async fn notifications(&self, actor: &Actor) -> Result<Vec<Notification>, TimesheetError>;

    async fn reviews(&self, actor: &Actor, id: TimesheetId)
        -> Result<Vec<Review>, TimesheetError>;

    async fn projects(&self) -> Result<Vec<Project>, TimesheetError>;

    // ========================================================================
    // Admin
    // ========================================================================

    /// Approve or reject a submitted timesheet.
    async fn review(
        &self,
        actor: &Actor,
        request: ReviewRequest,
    ) -> Result<TimesheetRecord, TimesheetError>;

    async fn admin_overview(
        &self,
        actor: &Actor,
        query: AdminQuery,
    ) -> Result<AdminOverview, TimesheetError>;

    /// Totals over every stored timesheet.
    async fn summary(&self, actor: &Actor) -> Result<Summary, TimesheetError>;

    /// Change feed for live views. Lagging receivers miss events but can
    /// always re-read the current state.
    fn subscribe(&self) -> broadcast::Receiver<TimesheetEvent>;
}
