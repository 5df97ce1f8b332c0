use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use timesheet::{Entries, ReviewAction, Timesheet, TimesheetStatus, Week};

use super::RepositoryError;
use crate::domain::{
    models::{NewReview, NewTimesheet, Review, TimesheetId, TimesheetRecord, UserId},
    ports::outbound::TimesheetRepository,
    TimesheetError,
};

const TIMESHEET_COLUMNS: &str = "id, owner_id, week_start, status, entries, reviewer_id, \
     reviewed_at, created_at, updated_at, version";

/// Adapter that stores timesheets in PostgreSQL, one row per owner and week
/// with the entries as JSONB.
pub struct PostgresTimesheetRepository {
    pool: PgPool,
}

impl PostgresTimesheetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tells a missing row from a version mismatch after a conditional
    /// update matched nothing.
    async fn missed_update(&self, id: TimesheetId) -> TimesheetError {
        match self.get(id).await {
            Ok(Some(_)) => TimesheetError::Conflict,
            Ok(None) => TimesheetError::NotFound,
            Err(err) => err,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DbTimesheet {
    id: i32,
    owner_id: String,
    week_start: NaiveDate,
    status: String,
    entries: Json<Entries>,
    reviewer_id: Option<String>,
    reviewed_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    version: i32,
}

impl TryFrom<DbTimesheet> for TimesheetRecord {
    type Error = RepositoryError;

    fn try_from(row: DbTimesheet) -> Result<Self, Self::Error> {
        let status: TimesheetStatus = row
            .status
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("unknown status '{}'", row.status)))?;
        let sheet = Timesheet::new(Week::from(row.week_start))
            .with_status(status)
            .with_entries(row.entries.0);

        Ok(TimesheetRecord {
            id: row.id.into(),
            owner: row.owner_id.into(),
            sheet,
            reviewer: row.reviewer_id.map(UserId::from),
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DbReview {
    id: i32,
    timesheet_id: i32,
    action: String,
    comment: String,
    reviewer_id: String,
    created_at: OffsetDateTime,
}

impl TryFrom<DbReview> for Review {
    type Error = RepositoryError;

    fn try_from(row: DbReview) -> Result<Self, Self::Error> {
        let action: ReviewAction = row
            .action
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("unknown review action '{}'", row.action)))?;

        Ok(Review {
            id: row.id.into(),
            timesheet_id: row.timesheet_id.into(),
            action,
            comment: row.comment,
            reviewer: row.reviewer_id.into(),
            created_at: row.created_at,
        })
    }
}

const UPDATE_TIMESHEET: &str = r#"
    UPDATE timesheets
    SET status = $1, entries = $2, reviewer_id = $3, reviewed_at = $4,
        updated_at = NOW(), version = version + 1
    WHERE id = $5 AND version = $6
    RETURNING id, owner_id, week_start, status, entries, reviewer_id,
              reviewed_at, created_at, updated_at, version
"#;

fn to_records(rows: Vec<DbTimesheet>) -> Result<Vec<TimesheetRecord>, TimesheetError> {
    rows.into_iter()
        .map(|row| TimesheetRecord::try_from(row).map_err(TimesheetError::from))
        .collect()
}

#[async_trait]
impl TimesheetRepository for PostgresTimesheetRepository {
    async fn get(&self, id: TimesheetId) -> Result<Option<TimesheetRecord>, TimesheetError> {
        let row = sqlx::query_as::<_, DbTimesheet>(&format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheets WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.map(TimesheetRecord::try_from).transpose()?)
    }

    async fn find_by_week(
        &self,
        owner: &UserId,
        week: Week,
    ) -> Result<Option<TimesheetRecord>, TimesheetError> {
        let row = sqlx::query_as::<_, DbTimesheet>(&format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheets WHERE owner_id = $1 AND week_start = $2"
        ))
        .bind(owner.as_str())
        .bind(week.start())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(row.map(TimesheetRecord::try_from).transpose()?)
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<TimesheetRecord>, TimesheetError> {
        let rows = sqlx::query_as::<_, DbTimesheet>(&format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheets WHERE owner_id = $1 ORDER BY week_start DESC"
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        to_records(rows)
    }

    async fn list_all(&self) -> Result<Vec<TimesheetRecord>, TimesheetError> {
        let rows = sqlx::query_as::<_, DbTimesheet>(&format!(
            "SELECT {TIMESHEET_COLUMNS} FROM timesheets ORDER BY week_start DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        to_records(rows)
    }

    async fn create(&self, timesheet: &NewTimesheet) -> Result<TimesheetRecord, TimesheetError> {
        let row = sqlx::query_as::<_, DbTimesheet>(&format!(
            r#"
            INSERT INTO timesheets (owner_id, week_start, week_end, status, entries)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (owner_id, week_start) DO NOTHING
            RETURNING {TIMESHEET_COLUMNS}
            "#
        ))
        .bind(timesheet.owner.as_str())
        .bind(timesheet.sheet.week_start())
        .bind(timesheet.sheet.week_end())
        .bind(timesheet.sheet.status.to_string())
        .bind(Json(&timesheet.sheet.entries))
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        // nothing returned means the week was already taken
        let row = row.ok_or(TimesheetError::Conflict)?;
        Ok(TimesheetRecord::try_from(row)?)
    }

    async fn update(&self, record: &TimesheetRecord) -> Result<TimesheetRecord, TimesheetError> {
        let row = sqlx::query_as::<_, DbTimesheet>(UPDATE_TIMESHEET)
            .bind(record.status().to_string())
            .bind(Json(&record.sheet.entries))
            .bind(record.reviewer.as_ref().map(UserId::as_str))
            .bind(record.reviewed_at)
            .bind(record.id.as_i32())
            .bind(record.version)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        let Some(row) = row else {
            return Err(self.missed_update(record.id).await);
        };
        Ok(TimesheetRecord::try_from(row)?)
    }

    async fn delete(&self, id: TimesheetId) -> Result<(), TimesheetError> {
        let result = sqlx::query("DELETE FROM timesheets WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(TimesheetError::NotFound);
        }
        Ok(())
    }

    async fn record_review(
        &self,
        record: &TimesheetRecord,
        review: &NewReview,
    ) -> Result<(TimesheetRecord, Review), TimesheetError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let row = sqlx::query_as::<_, DbTimesheet>(UPDATE_TIMESHEET)
            .bind(record.status().to_string())
            .bind(Json(&record.sheet.entries))
            .bind(record.reviewer.as_ref().map(UserId::as_str))
            .bind(record.reviewed_at)
            .bind(record.id.as_i32())
            .bind(record.version)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(RepositoryError::from)?;
            return Err(self.missed_update(record.id).await);
        };

        let review_row = sqlx::query_as::<_, DbReview>(
            r#"
            INSERT INTO reviews (timesheet_id, action, comment, reviewer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, timesheet_id, action, comment, reviewer_id, created_at
            "#,
        )
        .bind(review.timesheet_id.as_i32())
        .bind(review.action.to_string())
        .bind(&review.comment)
        .bind(review.reviewer.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let updated = TimesheetRecord::try_from(row)?;
        let stored = Review::try_from(review_row)?;
        tx.commit().await.map_err(RepositoryError::from)?;
        Ok((updated, stored))
    }

    async fn reviews(&self, id: TimesheetId) -> Result<Vec<Review>, TimesheetError> {
        let rows = sqlx::query_as::<_, DbReview>(
            r#"
            SELECT id, timesheet_id, action, comment, reviewer_id, created_at
            FROM reviews
            WHERE timesheet_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter()
            .map(|row| Review::try_from(row).map_err(TimesheetError::from))
            .collect()
    }
}
