use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{hours::worked_hours, DayEntry, Entries, TimesheetStatus};

/// One problem found in a timesheet.
///
/// Allocation numbers are 1-based, as shown on the form.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    #[error("Please fill In and Out for {date}")]
    MissingTimes { date: NaiveDate },
    #[error("Enter a lunch break > 0 mins for {date}")]
    MissingBreak { date: NaiveDate },
    #[error("Overtime cannot be negative for {date}")]
    NegativeOvertime { date: NaiveDate },
    #[error("Select project for {date}, allocation #{allocation}")]
    MissingProject { date: NaiveDate, allocation: usize },
    #[error("Enter description for {date}, allocation #{allocation}")]
    MissingDescription { date: NaiveDate, allocation: usize },
    #[error("Enter hours for {date}, allocation #{allocation}")]
    MissingHours { date: NaiveDate, allocation: usize },
    #[error("Unknown or inactive project '{project_id}' for {date}, allocation #{allocation}")]
    UnknownProject {
        date: NaiveDate,
        allocation: usize,
        project_id: String,
    },
    #[error("Allocated hours ({allocated}h) for {date} exceed total worked hours ({worked}h)")]
    OverAllocated {
        date: NaiveDate,
        allocated: f64,
        worked: f64,
    },
    #[error("Total allocated hours ({allocated}h) for {date} must equal total worked hours ({worked}h)")]
    AllocationMismatch {
        date: NaiveDate,
        allocated: f64,
        worked: f64,
    },
}

impl ValidationIssue {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::MissingTimes { date }
            | Self::MissingBreak { date }
            | Self::NegativeOvertime { date }
            | Self::MissingProject { date, .. }
            | Self::MissingDescription { date, .. }
            | Self::MissingHours { date, .. }
            | Self::UnknownProject { date, .. }
            | Self::OverAllocated { date, .. }
            | Self::AllocationMismatch { date, .. } => *date,
        }
    }
}

/// Hours compared in hundredths so that 0.1 + 0.2 equals 0.3.
fn cents(hours: f64) -> i64 {
    (hours * 100.0).round() as i64
}

fn validate_day(date: NaiveDate, entry: &DayEntry, issues: &mut Vec<ValidationIssue>) {
    let worked = worked_hours(entry);

    if !entry.has_times() {
        issues.push(ValidationIssue::MissingTimes { date });
    }
    if entry.break_minutes == 0 {
        issues.push(ValidationIssue::MissingBreak { date });
    }
    if entry.overtime < 0.0 {
        issues.push(ValidationIssue::NegativeOvertime { date });
    }

    for (i, allocation) in entry.allocations.iter().enumerate() {
        let number = i + 1;
        if allocation.project_id.trim().is_empty() {
            issues.push(ValidationIssue::MissingProject {
                date,
                allocation: number,
            });
        }
        if allocation.description.trim().is_empty() {
            issues.push(ValidationIssue::MissingDescription {
                date,
                allocation: number,
            });
        }
        if allocation.hours.map_or(true, |h| h < 0.0) {
            issues.push(ValidationIssue::MissingHours {
                date,
                allocation: number,
            });
        }
    }

    let allocated = entry.allocated_hours();
    if cents(allocated) > cents(worked) {
        issues.push(ValidationIssue::OverAllocated {
            date,
            allocated: crate::round_hours(allocated),
            worked,
        });
    }
    if cents(allocated) != cents(worked) {
        issues.push(ValidationIssue::AllocationMismatch {
            date,
            allocated: crate::round_hours(allocated),
            worked,
        });
    }
}

/// Checks a week's entries before they are saved with `target` status.
///
/// Drafts may be incomplete and are never rejected. For submission every day
/// is checked and every problem is collected, in date order, so the whole list
/// can be fixed in one pass. An empty result means the entries are valid.
pub fn validate(entries: &Entries, target: TimesheetStatus) -> Vec<ValidationIssue> {
    if target != TimesheetStatus::Submitted {
        return Vec::new();
    }

    let mut issues = Vec::new();
    for (date, entry) in entries.iter() {
        validate_day(*date, entry, &mut issues);
    }
    issues
}

/// [`validate`] for submission, rendered as messages.
pub fn validate_for_submission(entries: &Entries) -> Vec<String> {
    validate(entries, TimesheetStatus::Submitted)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Flags allocations that point at a project `is_known` does not recognise.
/// Blank project ids are left to [`validate`].
pub fn unknown_projects<F>(entries: &Entries, is_known: F) -> Vec<ValidationIssue>
where
    F: Fn(&str) -> bool,
{
    entries
        .iter()
        .flat_map(|(date, entry)| {
            entry
                .allocations
                .iter()
                .enumerate()
                .filter(|(_, a)| !a.project_id.trim().is_empty() && !is_known(&a.project_id))
                .map(move |(i, a)| ValidationIssue::UnknownProject {
                    date: *date,
                    allocation: i + 1,
                    project_id: a.project_id.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Allocation, ClockTime, Week};

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// 09:00–17:00 with an hour of lunch plus one hour overtime: 8 hours.
    fn eight_hour_day(allocations: Vec<Allocation>) -> DayEntry {
        DayEntry::new()
            .with_times(t("09:00"), t("17:00"))
            .with_break(60)
            .with_overtime(1.0)
            .with_allocations(allocations)
    }

    fn complete_week() -> Entries {
        Week::parse("2025-07-28")
            .unwrap()
            .slots()
            .into_iter()
            .map(|slot| {
                (
                    slot.date,
                    eight_hour_day(vec![
                        Allocation::new("p1", "Feature work", 5.5),
                        Allocation::new("p2", "Code review", 2.5),
                    ]),
                )
            })
            .collect()
    }

    #[test]
    fn complete_week_is_valid() {
        assert!(validate(&complete_week(), TimesheetStatus::Submitted).is_empty());
        assert!(validate_for_submission(&complete_week()).is_empty());
    }

    #[test]
    fn under_allocation_is_reported_for_that_day() {
        let mut entries = complete_week();
        let monday = date("2025-07-28");
        entries.insert(
            monday,
            eight_hour_day(vec![Allocation::new("p1", "Feature work", 7.0)]),
        );

        let errors = validate_for_submission(&entries);
        assert_eq!(
            errors,
            vec![
                "Total allocated hours (7h) for 2025-07-28 must equal total worked hours (8h)"
                    .to_string()
            ]
        );
    }

    #[test]
    fn over_allocation_reports_excess_and_mismatch() {
        let mut entries = Entries::new();
        let monday = date("2025-07-28");
        entries.insert(
            monday,
            eight_hour_day(vec![Allocation::new("p1", "Feature work", 9.0)]),
        );

        let issues = validate(&entries, TimesheetStatus::Submitted);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], ValidationIssue::OverAllocated { .. }));
        assert!(matches!(issues[1], ValidationIssue::AllocationMismatch { .. }));
    }

    #[test]
    fn fractional_allocations_sum_exactly() {
        let mut entries = Entries::new();
        let entry = DayEntry::new()
            .with_times(t("09:00"), t("09:48"))
            .with_break(30)
            .with_allocations(vec![
                Allocation::new("p1", "a", 0.1),
                Allocation::new("p2", "b", 0.2),
            ]);
        entries.insert(date("2025-07-28"), entry);

        assert!(validate(&entries, TimesheetStatus::Submitted).is_empty());
    }

    #[test]
    fn collects_every_problem_across_days() {
        let mut entries = complete_week();
        entries.insert(date("2025-07-29"), DayEntry::new());
        let mut wednesday = eight_hour_day(vec![Allocation::new("", "", 8.0)]);
        wednesday.allocations.push(Allocation {
            hours: None,
            ..Allocation::new("p1", "x", 0.0)
        });
        entries.insert(date("2025-07-30"), wednesday);

        let errors = validate_for_submission(&entries);
        assert_eq!(
            errors,
            vec![
                "Please fill In and Out for 2025-07-29",
                "Enter a lunch break > 0 mins for 2025-07-29",
                "Select project for 2025-07-29, allocation #1",
                "Enter description for 2025-07-29, allocation #1",
                "Enter hours for 2025-07-29, allocation #1",
                "Select project for 2025-07-30, allocation #1",
                "Enter description for 2025-07-30, allocation #1",
                "Enter hours for 2025-07-30, allocation #2",
            ]
        );
    }

    #[test]
    fn negative_values_are_flagged() {
        let mut entries = Entries::new();
        let mut entry = eight_hour_day(vec![Allocation::new("p1", "x", -1.0)]);
        entry.overtime = -1.0;
        entries.insert(date("2025-07-28"), entry);

        let issues = validate(&entries, TimesheetStatus::Submitted);
        assert!(issues.contains(&ValidationIssue::NegativeOvertime {
            date: date("2025-07-28")
        }));
        assert!(issues.contains(&ValidationIssue::MissingHours {
            date: date("2025-07-28"),
            allocation: 1
        }));
    }

    #[test]
    fn drafts_skip_validation() {
        let mut entries = Entries::new();
        entries.insert(date("2025-07-28"), DayEntry::new());
        assert!(validate(&entries, TimesheetStatus::Draft).is_empty());
    }

    #[test]
    fn unknown_projects_are_flagged() {
        let issues = unknown_projects(&complete_week(), |id| id == "p1");
        assert_eq!(issues.len(), 5);
        assert!(issues.iter().all(|issue| matches!(
            issue,
            ValidationIssue::UnknownProject { allocation: 2, project_id, .. } if project_id == "p2"
        )));
        assert_eq!(issues[0].date(), date("2025-07-28"));
    }
}
