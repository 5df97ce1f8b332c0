use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::{round_hours, Timesheet, TimesheetStatus};

/// Headline figures over a set of timesheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_hours: f64,
    pub approved_count: usize,
    /// Submitted and waiting for an admin.
    pub pending_count: usize,
    pub rejected_count: usize,
    pub draft_count: usize,
}

/// Rolls a set of timesheets up into totals and per-status counts.
///
/// Recomputed from scratch each time; there is no incremental state.
pub fn aggregate<'a, I>(timesheets: I) -> Summary
where
    I: IntoIterator<Item = &'a Timesheet>,
{
    let sheets: Vec<&Timesheet> = timesheets.into_iter().collect();
    let counts = sheets.iter().map(|s| s.status).counts();
    let count = |status| counts.get(&status).copied().unwrap_or(0);

    Summary {
        total_hours: round_hours(sheets.iter().map(|s| s.total_hours()).sum()),
        approved_count: count(TimesheetStatus::Approved),
        pending_count: count(TimesheetStatus::Submitted),
        rejected_count: count(TimesheetStatus::Rejected),
        draft_count: count(TimesheetStatus::Draft),
    }
}

/// Status and date-range filter for the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub status: Option<TimesheetStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl HistoryFilter {
    /// A week matches when it starts on or after `from` and ends on or
    /// before `to`.
    pub fn matches(&self, sheet: &Timesheet) -> bool {
        if self.status.is_some_and(|status| status != sheet.status) {
            return false;
        }
        if self.from.is_some_and(|from| sheet.week_start() < from) {
            return false;
        }
        if self.to.is_some_and(|to| sheet.week_end() > to) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
    pub status: TimesheetStatus,
}

impl From<&Timesheet> for HistoryRow {
    fn from(sheet: &Timesheet) -> Self {
        Self {
            week_start: sheet.week_start(),
            week_end: sheet.week_end(),
            total_hours: sheet.total_hours(),
            status: sheet.status,
        }
    }
}

/// Renders history rows as CSV with a header line.
pub fn export_csv(rows: &[HistoryRow]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Week Start", "Week End", "Total Hours", "Status"])?;
    for row in rows {
        writer.write_record([
            row.week_start.to_string(),
            row.week_end.to_string(),
            format!("{:.2}", row.total_hours),
            row.status.to_string(),
        ])?;
    }

    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
