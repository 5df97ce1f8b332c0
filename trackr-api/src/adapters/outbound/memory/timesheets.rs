use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use timesheet::Week;
use tokio::sync::RwLock;

use crate::domain::{
    models::{NewReview, NewTimesheet, Review, ReviewId, TimesheetId, TimesheetRecord, UserId},
    ports::outbound::TimesheetRepository,
    TimesheetError,
};

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    next_review_id: i32,
    timesheets: HashMap<TimesheetId, TimesheetRecord>,
    reviews: Vec<Review>,
}

impl Store {
    /// Conditional overwrite shared by `update` and `record_review`.
    fn apply(&mut self, record: &TimesheetRecord) -> Result<TimesheetRecord, TimesheetError> {
        let stored = self
            .timesheets
            .get_mut(&record.id)
            .ok_or(TimesheetError::NotFound)?;
        if stored.version != record.version {
            return Err(TimesheetError::Conflict);
        }

        stored.sheet = record.sheet.clone();
        stored.reviewer = record.reviewer.clone();
        stored.reviewed_at = record.reviewed_at;
        stored.updated_at = OffsetDateTime::now_utc();
        stored.version += 1;
        Ok(stored.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTimesheetRepository {
    store: RwLock<Store>,
}

impl InMemoryTimesheetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimesheetRepository for InMemoryTimesheetRepository {
    async fn get(&self, id: TimesheetId) -> Result<Option<TimesheetRecord>, TimesheetError> {
        Ok(self.store.read().await.timesheets.get(&id).cloned())
    }

    async fn find_by_week(
        &self,
        owner: &UserId,
        week: Week,
    ) -> Result<Option<TimesheetRecord>, TimesheetError> {
        Ok(self
            .store
            .read()
            .await
            .timesheets
            .values()
            .find(|r| &r.owner == owner && r.week() == week)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<TimesheetRecord>, TimesheetError> {
        Ok(self
            .store
            .read()
            .await
            .timesheets
            .values()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<TimesheetRecord>, TimesheetError> {
        Ok(self.store.read().await.timesheets.values().cloned().collect())
    }

    async fn create(&self, timesheet: &NewTimesheet) -> Result<TimesheetRecord, TimesheetError> {
        let mut store = self.store.write().await;
        let taken = store
            .timesheets
            .values()
            .any(|r| r.owner == timesheet.owner && r.week() == timesheet.sheet.week);
        if taken {
            return Err(TimesheetError::Conflict);
        }

        store.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let record = TimesheetRecord {
            id: TimesheetId::new(store.next_id),
            owner: timesheet.owner.clone(),
            sheet: timesheet.sheet.clone(),
            reviewer: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        store.timesheets.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &TimesheetRecord) -> Result<TimesheetRecord, TimesheetError> {
        let mut store = self.store.write().await;
        store.apply(record)
    }

    async fn delete(&self, id: TimesheetId) -> Result<(), TimesheetError> {
        let mut store = self.store.write().await;
        store
            .timesheets
            .remove(&id)
            .ok_or(TimesheetError::NotFound)?;
        store.reviews.retain(|r| r.timesheet_id != id);
        Ok(())
    }

    async fn record_review(
        &self,
        record: &TimesheetRecord,
        review: &NewReview,
    ) -> Result<(TimesheetRecord, Review), TimesheetError> {
        let mut store = self.store.write().await;
        let updated = store.apply(record)?;

        store.next_review_id += 1;
        let stored = Review {
            id: ReviewId::new(store.next_review_id),
            timesheet_id: updated.id,
            action: review.action,
            comment: review.comment.clone(),
            reviewer: review.reviewer.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        store.reviews.push(stored.clone());
        Ok((updated, stored))
    }

    async fn reviews(&self, id: TimesheetId) -> Result<Vec<Review>, TimesheetError> {
        Ok(self
            .store
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| r.timesheet_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesheet::{ReviewAction, Timesheet, TimesheetStatus};

    fn new_sheet(owner: &str, week: &str) -> NewTimesheet {
        NewTimesheet {
            owner: UserId::new(owner),
            sheet: Timesheet::new(Week::parse(week).unwrap()),
        }
    }

    #[tokio::test]
    async fn one_sheet_per_owner_and_week() {
        let repo = InMemoryTimesheetRepository::new();
        repo.create(&new_sheet("u1", "2025-07-28")).await.unwrap();
        repo.create(&new_sheet("u2", "2025-07-28")).await.unwrap();

        let err = repo.create(&new_sheet("u1", "2025-07-30")).await.unwrap_err();
        assert!(matches!(err, TimesheetError::Conflict));
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let repo = InMemoryTimesheetRepository::new();
        let record = repo.create(&new_sheet("u1", "2025-07-28")).await.unwrap();

        let mut first = record.clone();
        first.sheet.status = TimesheetStatus::Submitted;
        let saved = repo.update(&first).await.unwrap();
        assert_eq!(saved.version, 2);

        let mut second = record;
        second.sheet.status = TimesheetStatus::Draft;
        let err = repo.update(&second).await.unwrap_err();
        assert!(matches!(err, TimesheetError::Conflict));

        let stored = repo.get(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), TimesheetStatus::Submitted);
    }

    fn rejection(id: TimesheetId) -> NewReview {
        NewReview {
            timesheet_id: id,
            action: ReviewAction::Rejected,
            comment: "missing hours".to_string(),
            reviewer: UserId::new("a1"),
        }
    }

    #[tokio::test]
    async fn stale_review_stores_nothing() {
        let repo = InMemoryTimesheetRepository::new();
        let record = repo.create(&new_sheet("u1", "2025-07-28")).await.unwrap();

        let mut submitted = record.clone();
        submitted.sheet.status = TimesheetStatus::Submitted;
        repo.update(&submitted).await.unwrap();

        let mut stale = record;
        stale.sheet.status = TimesheetStatus::Rejected;
        let err = repo
            .record_review(&stale, &rejection(stale.id))
            .await
            .unwrap_err();
        assert!(matches!(err, TimesheetError::Conflict));
        assert!(repo.reviews(stale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn review_ids_are_not_reused_after_delete() {
        let repo = InMemoryTimesheetRepository::new();
        let first = repo.create(&new_sheet("u1", "2025-07-28")).await.unwrap();
        let second = repo.create(&new_sheet("u2", "2025-07-28")).await.unwrap();

        let (_, kept) = repo
            .record_review(&first, &rejection(first.id))
            .await
            .unwrap();
        let (_, dropped) = repo
            .record_review(&second, &rejection(second.id))
            .await
            .unwrap();
        repo.delete(second.id).await.unwrap();

        let (_, next) = repo
            .record_review(&repo.get(first.id).await.unwrap().unwrap(), &rejection(first.id))
            .await
            .unwrap();
        assert_ne!(next.id, kept.id);
        assert_ne!(next.id, dropped.id);
        assert_eq!(repo.reviews(first.id).await.unwrap().len(), 2);
    }
}
