use chrono::NaiveDate;

use crate::{hours::worked_hours, round_hours, Entries, TimesheetStatus, Week};

/// One employee's week: the entries plus where the week is in the workflow.
///
/// Identity, ownership and review stamps belong to whoever stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Timesheet {
    pub week: Week,
    pub status: TimesheetStatus,
    pub entries: Entries,
}

impl Timesheet {
    /// A blank draft with an empty entry for each weekday.
    pub fn new(week: Week) -> Self {
        Self {
            week,
            status: TimesheetStatus::Draft,
            entries: Entries::for_week(&week),
        }
    }

    pub fn with_status(mut self, status: TimesheetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_entries(mut self, entries: Entries) -> Self {
        self.entries = entries;
        self
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week.start()
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week.end()
    }

    pub fn total_hours(&self) -> f64 {
        timesheet_hours(&self.entries)
    }

    pub fn is_week_ended(&self, today: NaiveDate) -> bool {
        self.week.is_ended(today)
    }
}

/// Total worked hours for a week.
///
/// Both the personal dashboard and the admin summary go through here, so a
/// timesheet shows the same total everywhere.
pub fn timesheet_hours(entries: &Entries) -> f64 {
    round_hours(entries.days().map(worked_hours).sum())
}
