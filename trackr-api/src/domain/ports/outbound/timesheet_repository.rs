//! Timesheet repository port (outbound).

use async_trait::async_trait;
use timesheet::Week;

use crate::domain::{
    models::{NewReview, NewTimesheet, Review, TimesheetId, TimesheetRecord, UserId},
    TimesheetError,
};

/// Outbound port for timesheet and review persistence.
///
/// There is at most one timesheet per owner and week. Writes are conditional
/// on the record's version so two reviewers cannot both win.
#[async_trait]
pub trait TimesheetRepository: Send + Sync + 'static {
    async fn get(&self, id: TimesheetId) -> Result<Option<TimesheetRecord>, TimesheetError>;

    async fn find_by_week(
        &self,
        owner: &UserId,
        week: Week,
    ) -> Result<Option<TimesheetRecord>, TimesheetError>;

    async fn list_for_owner(&self, owner: &UserId)
        -> Result<Vec<TimesheetRecord>, TimesheetError>;

    async fn list_all(&self) -> Result<Vec<TimesheetRecord>, TimesheetError>;

    /// Insert a new timesheet at version 1.
    ///
    /// Fails with [`TimesheetError::Conflict`] if the owner already has a
    /// timesheet for that week.
    async fn create(&self, timesheet: &NewTimesheet) -> Result<TimesheetRecord, TimesheetError>;

    /// Overwrite status, entries and review stamps of `record`.
    ///
    /// Only succeeds while the stored version still equals `record.version`;
    /// otherwise fails with [`TimesheetError::Conflict`]. Returns the stored
    /// record with its bumped version.
    async fn update(&self, record: &TimesheetRecord) -> Result<TimesheetRecord, TimesheetError>;

    async fn delete(&self, id: TimesheetId) -> Result<(), TimesheetError>;

    /// Write a reviewed `record` and append its `review` as one unit.
    ///
    /// Same version condition as [`TimesheetRepository::update`]. Either both
    /// the status change and the review are stored or neither is.
    async fn record_review(
        &self,
        record: &TimesheetRecord,
        review: &NewReview,
    ) -> Result<(TimesheetRecord, Review), TimesheetError>;

    /// Reviews for a timesheet, oldest first.
    async fn reviews(&self, id: TimesheetId) -> Result<Vec<Review>, TimesheetError>;
}
