use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use itertools::Itertools;
use timesheet::{
    aggregate, check, deadline_alert, export_csv, unknown_projects, validate, Action,
    HistoryFilter, HistoryRow, Role, Summary, Timesheet, TimesheetStatus, Week,
};
use tokio::sync::broadcast;

use crate::domain::{
    models::{
        Actor, AdminOverview, AdminQuery, AdminRow, Dashboard, NewNotification, NewReview,
        NewTimesheet, Notification, Project, Review, ReviewRequest, SaveTimesheetRequest,
        TimesheetEvent, TimesheetId, TimesheetRecord, UserId, WeekView,
    },
    ports::{
        inbound::TimesheetService,
        outbound::{Clock, NotificationRepository, ProjectCatalog, TimesheetRepository, UserRepository},
    },
    TimesheetError,
};

/// Slow subscribers past this many events start missing them.
const EVENT_CAPACITY: usize = 64;

/// Implementation of the TimesheetService inbound port.
///
/// Owns the workflow: who may save, submit and review which sheet, and what
/// happens around each transition (validation, review log, notifications and
/// change events).
pub struct TimesheetServiceImpl<T, N, P, U> {
    timesheets: Arc<T>,
    notifications: Arc<N>,
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<TimesheetEvent>,
}

impl<T, N, P, U> TimesheetServiceImpl<T, N, P, U> {
    pub fn new(
        timesheets: Arc<T>,
        notifications: Arc<N>,
        projects: Arc<P>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            timesheets,
            notifications,
            projects,
            users,
            clock,
            events,
        }
    }
}

impl<T, N, P, U> TimesheetServiceImpl<T, N, P, U>
where
    T: TimesheetRepository,
    N: NotificationRepository,
    P: ProjectCatalog,
    U: UserRepository,
{
    async fn load(&self, id: TimesheetId) -> Result<TimesheetRecord, TimesheetError> {
        self.timesheets
            .get(id)
            .await?
            .ok_or(TimesheetError::NotFound)
    }

    /// Fire-and-forget; a failed notification never undoes the transition
    /// that caused it.
    async fn notify(&self, user_id: &UserId, message: String) {
        let notification = NewNotification::new(user_id.clone(), message);
        if let Err(e) = self.notifications.create(&notification).await {
            tracing::error!("Failed to store notification for {}: {:?}", user_id, e);
        }
    }

    fn publish(&self, event: TimesheetEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }

    fn require_admin(actor: &Actor) -> Result<(), TimesheetError> {
        if actor.is_admin {
            Ok(())
        } else {
            Err(TimesheetError::Forbidden)
        }
    }
}

fn check_version(record: Option<&TimesheetRecord>, expected: Option<i32>) -> Result<(), TimesheetError> {
    match (expected, record) {
        (None, _) => Ok(()),
        (Some(expected), Some(record)) if record.version == expected => Ok(()),
        (Some(_), _) => Err(TimesheetError::Conflict),
    }
}

#[async_trait]
impl<T, N, P, U> TimesheetService for TimesheetServiceImpl<T, N, P, U>
where
    T: TimesheetRepository,
    N: NotificationRepository,
    P: ProjectCatalog,
    U: UserRepository,
{
    async fn get_week(
        &self,
        actor: &Actor,
        owner: Option<&UserId>,
        week: Week,
    ) -> Result<WeekView, TimesheetError> {
        let owner = owner.cloned().unwrap_or_else(|| actor.user_id.clone());
        let role = actor.role_for(&owner).ok_or(TimesheetError::Forbidden)?;

        let stored = self.timesheets.find_by_week(&owner, week).await?;
        let sheet = stored
            .as_ref()
            .map(|record| record.sheet.clone())
            .unwrap_or_else(|| Timesheet::new(week));

        let week_ended = week.is_ended(self.clock.today());
        let submit_issues = if role == Role::Employee && sheet.status.is_editable() {
            validate(&sheet.entries, TimesheetStatus::Submitted)
        } else {
            Vec::new()
        };

        Ok(WeekView {
            can_transition: timesheet::can_transition(sheet.status, role, week_ended),
            owner,
            sheet,
            stored,
            role,
            week_ended,
            submit_issues,
        })
    }

    #[tracing::instrument(skip(self, request), fields(user = %actor.user_id, week = %request.week))]
    async fn save(
        &self,
        actor: &Actor,
        request: SaveTimesheetRequest,
    ) -> Result<TimesheetRecord, TimesheetError> {
        let SaveTimesheetRequest {
            week,
            mut entries,
            status,
            expected_version,
        } = request;

        let action = match status {
            TimesheetStatus::Draft => Action::Edit,
            TimesheetStatus::Submitted => Action::Submit,
            other => return Err(TimesheetError::InvalidTarget(other)),
        };

        entries.normalize(&week).map_err(|stray| {
            TimesheetError::InvalidEntries(format!(
                "dates outside week {}: {}",
                week,
                stray.iter().join(", ")
            ))
        })?;

        let existing = self.timesheets.find_by_week(&actor.user_id, week).await?;
        check_version(existing.as_ref(), expected_version)?;

        let current = existing
            .as_ref()
            .map(|record| record.status())
            .unwrap_or_default();
        let week_ended = week.is_ended(self.clock.today());
        let next = check(current, action, Role::Employee, week_ended)?;

        if next == TimesheetStatus::Submitted {
            let known: HashSet<String> = self
                .projects
                .active_projects()
                .await?
                .into_iter()
                .map(|p| p.id.as_str().to_string())
                .collect();

            let mut issues = validate(&entries, next);
            issues.extend(unknown_projects(&entries, |id| known.contains(id)));
            if !issues.is_empty() {
                tracing::debug!("Submission rejected with {} issue(s)", issues.len());
                return Err(TimesheetError::Validation(issues));
            }
        }

        let sheet = Timesheet::new(week).with_entries(entries).with_status(next);
        let record = match existing {
            Some(mut record) => {
                // review stamps belong to the last decision only
                record.sheet = sheet;
                record.reviewer = None;
                record.reviewed_at = None;
                self.timesheets.update(&record).await?
            }
            None => {
                let new = NewTimesheet {
                    owner: actor.user_id.clone(),
                    sheet,
                };
                self.timesheets.create(&new).await?
            }
        };

        if next == TimesheetStatus::Submitted {
            self.notify(
                &record.owner,
                format!("You submitted your timesheet for week {}.", week),
            )
            .await;
        }
        tracing::info!("Saved timesheet {} as {}", record.id, next);

        self.publish(TimesheetEvent::Saved {
            id: record.id,
            owner: record.owner.clone(),
            status: next,
        });
        Ok(record)
    }

    async fn delete_draft(&self, actor: &Actor, id: TimesheetId) -> Result<(), TimesheetError> {
        let record = self.load(id).await?;
        if record.owner != actor.user_id {
            return Err(TimesheetError::Forbidden);
        }
        if record.status() != TimesheetStatus::Draft {
            return Err(timesheet::WorkflowError::Locked(record.status()).into());
        }

        self.timesheets.delete(id).await?;
        self.publish(TimesheetEvent::Deleted {
            id,
            owner: record.owner,
        });
        Ok(())
    }

    async fn history(
        &self,
        actor: &Actor,
        filter: HistoryFilter,
    ) -> Result<Vec<TimesheetRecord>, TimesheetError> {
        let records = self.timesheets.list_for_owner(&actor.user_id).await?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(&record.sheet))
            .sorted_by(|a, b| b.week().cmp(&a.week()))
            .collect())
    }

    async fn export_history_csv(
        &self,
        actor: &Actor,
        filter: HistoryFilter,
    ) -> Result<String, TimesheetError> {
        let rows: Vec<HistoryRow> = self
            .history(actor, filter)
            .await?
            .iter()
            .map(|record| HistoryRow::from(&record.sheet))
            .collect();

        export_csv(&rows).map_err(|e| TimesheetError::unknown(e.to_string()))
    }

    async fn dashboard(&self, actor: &Actor) -> Result<Dashboard, TimesheetError> {
        let today = self.clock.today();
        let week = Week::containing(today);
        let current = self.timesheets.find_by_week(&actor.user_id, week).await?;

        let (status, total_hours) = current
            .map(|record| (record.status(), record.total_hours()))
            .unwrap_or_default();

        Ok(Dashboard {
            week,
            status,
            total_hours,
            due_in_days: week.due_in_days(today),
            deadline_alert: deadline_alert(status, &week, today),
            notifications: self.notifications(actor).await?,
        })
    }

    async fn notifications(&self, actor: &Actor) -> Result<Vec<Notification>, TimesheetError> {
        self.notifications.list_for_user(&actor.user_id).await
    }

    async fn reviews(
        &self,
        actor: &Actor,
        id: TimesheetId,
    ) -> Result<Vec<Review>, TimesheetError> {
        let record = self.load(id).await?;
        actor
            .role_for(&record.owner)
            .ok_or(TimesheetError::Forbidden)?;
        self.timesheets.reviews(id).await
    }

    async fn projects(&self) -> Result<Vec<Project>, TimesheetError> {
        let mut projects = self.projects.active_projects().await?;
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    #[tracing::instrument(skip(self, request), fields(user = %actor.user_id, timesheet = %request.id))]
    async fn review(
        &self,
        actor: &Actor,
        request: ReviewRequest,
    ) -> Result<TimesheetRecord, TimesheetError> {
        let mut record = self.load(request.id).await?;
        let role = actor
            .role_for(&record.owner)
            .ok_or(TimesheetError::Forbidden)?;
        check_version(Some(&record), request.expected_version)?;

        let comment = request.comment.unwrap_or_default().trim().to_string();
        if request.action == timesheet::ReviewAction::Rejected && comment.is_empty() {
            return Err(TimesheetError::CommentRequired);
        }

        let week_ended = record.week().is_ended(self.clock.today());
        let next = check(record.status(), request.action.action(), role, week_ended)?;

        record.sheet.status = next;
        record.reviewer = Some(actor.user_id.clone());
        record.reviewed_at = Some(self.clock.now());
        let review = NewReview {
            timesheet_id: record.id,
            action: request.action,
            comment,
            reviewer: actor.user_id.clone(),
        };
        // the conditional write decides between concurrent reviewers
        let (record, _) = self.timesheets.record_review(&record, &review).await?;

        self.notify(
            &record.owner,
            format!(
                "Your timesheet for week {} was {}.",
                record.week(),
                request.action
            ),
        )
        .await;
        tracing::info!("Timesheet {} {}", record.id, request.action);

        self.publish(TimesheetEvent::Reviewed {
            id: record.id,
            owner: record.owner.clone(),
            status: next,
        });
        Ok(record)
    }

    async fn admin_overview(
        &self,
        actor: &Actor,
        query: AdminQuery,
    ) -> Result<AdminOverview, TimesheetError> {
        Self::require_admin(actor)?;

        let records = self.timesheets.list_all().await?;
        let emails: HashMap<UserId, String> = self
            .users
            .list()
            .await?
            .into_iter()
            .map(|user| (user.id, user.email))
            .collect();

        let summary = aggregate(records.iter().map(|record| &record.sheet));
        let status = query.status();
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let rows = records
            .into_iter()
            .filter(|record| record.status() == status)
            .map(|record| AdminRow {
                owner_email: emails.get(&record.owner).cloned().unwrap_or_default(),
                record,
            })
            .filter(|row| {
                search
                    .as_ref()
                    .map_or(true, |s| row.owner_email.to_lowercase().contains(s))
            })
            .sorted_by(|a, b| {
                b.record
                    .week()
                    .cmp(&a.record.week())
                    .then_with(|| a.owner_email.cmp(&b.owner_email))
            })
            .collect();

        Ok(AdminOverview { summary, rows })
    }

    async fn summary(&self, actor: &Actor) -> Result<Summary, TimesheetError> {
        Self::require_admin(actor)?;
        let records = self.timesheets.list_all().await?;
        Ok(aggregate(records.iter().map(|record| &record.sheet)))
    }

    fn subscribe(&self) -> broadcast::Receiver<TimesheetEvent> {
        self.events.subscribe()
    }
}
