use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::TimesheetStatus;

/// Working days per reporting week, Monday through Friday.
pub const WORKDAYS: usize = 5;

/// The dashboard starts nagging this many days before the Friday deadline.
pub const DEADLINE_WARNING_DAYS: i64 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekError {
    #[error("could not parse date: {0}")]
    InvalidDate(String),
}

/// A reporting week, identified by its Monday.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct Week {
    start: NaiveDate,
}

/// One weekday column of the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    /// `YYYY-MM-DD`, the key the day is stored under.
    pub key: String,
    /// Short human label, e.g. `Mon, Jul 28`.
    pub label: String,
    pub date: NaiveDate,
}

impl DaySlot {
    fn new(date: NaiveDate) -> Self {
        Self {
            key: date.format("%Y-%m-%d").to_string(),
            label: date.format("%a, %b %-d").to_string(),
            date,
        }
    }
}

impl Week {
    /// The week whose Monday is on or before `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        Self {
            start: date - Days::new(offset),
        }
    }

    /// Parses any `YYYY-MM-DD` date and snaps it to its Monday.
    pub fn parse(s: &str) -> Result<Self, WeekError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self::containing)
            .map_err(|_| WeekError::InvalidDate(s.to_string()))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The Friday.
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(WORKDAYS as u64 - 1)
    }

    /// Monday 00:00.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Friday 23:59:59.999.
    pub fn end_instant(&self) -> NaiveDateTime {
        (self.end() + Days::new(1)).and_time(NaiveTime::MIN) - Duration::milliseconds(1)
    }

    pub fn slots(&self) -> [DaySlot; WORKDAYS] {
        std::array::from_fn(|i| DaySlot::new(self.start + Days::new(i as u64)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// A week ends once the Friday is strictly in the past.
    pub fn is_ended(&self, today: NaiveDate) -> bool {
        today > self.end()
    }

    /// Calendar days left until the Friday; negative once it has passed.
    pub fn due_in_days(&self, today: NaiveDate) -> i64 {
        (self.end() - today).num_days()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Days::new(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Days::new(7),
        }
    }
}

/// Days until the deadline, when the dashboard should warn about it.
///
/// Submitted timesheets never warn; otherwise the warning shows from two days
/// before the Friday up to the Friday itself.
pub fn deadline_alert(status: TimesheetStatus, week: &Week, today: NaiveDate) -> Option<i64> {
    if status == TimesheetStatus::Submitted {
        return None;
    }
    let due = week.due_in_days(today);
    (0..=DEADLINE_WARNING_DAYS).contains(&due).then_some(due)
}

impl FromStr for Week {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Week {
    fn from(date: NaiveDate) -> Self {
        Self::containing(date)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn snaps_every_weekday_to_monday() {
        // 2025-07-28 is a Monday
        for day in 28..=31 {
            let week = Week::containing(date(&format!("2025-07-{day}")));
            assert_eq!(week.start(), date("2025-07-28"));
        }
        assert_eq!(Week::parse("2025-08-01").unwrap().start(), date("2025-07-28"));
        assert_eq!(Week::parse("2025-08-02").unwrap().start(), date("2025-07-28"));
        assert_eq!(Week::parse("2025-08-03").unwrap().start(), date("2025-07-28"));
        assert_eq!(Week::parse("2025-08-04").unwrap().start(), date("2025-08-04"));
    }

    #[test]
    fn slots_are_five_consecutive_weekdays() {
        for offset in 0..7 {
            let any_day = date("2024-12-30") + Days::new(offset);
            let slots = Week::containing(any_day).slots();

            assert_eq!(slots.len(), 5);
            assert_eq!(slots[0].date.weekday(), Weekday::Mon);
            assert_eq!(slots[4].date.weekday(), Weekday::Fri);
            for pair in slots.windows(2) {
                assert_eq!((pair[1].date - pair[0].date).num_days(), 1);
            }
        }
    }

    #[test]
    fn slots_have_keys_and_labels() {
        let slots = Week::parse("2025-07-28").unwrap().slots();
        assert_eq!(slots[0].key, "2025-07-28");
        assert_eq!(slots[0].label, "Mon, Jul 28");
        assert_eq!(slots[4].key, "2025-08-01");
        assert_eq!(slots[4].label, "Fri, Aug 1");
    }

    #[test]
    fn week_spans_monday_midnight_to_friday_night() {
        let week = Week::parse("2025-07-30").unwrap();
        assert_eq!(week.start_instant().to_string(), "2025-07-28 00:00:00");
        assert_eq!(week.end_instant().to_string(), "2025-08-01 23:59:59.999");
    }

    #[test]
    fn week_ends_after_friday() {
        let week = Week::parse("2025-07-28").unwrap();
        assert!(!week.is_ended(date("2025-07-30")));
        assert!(!week.is_ended(date("2025-08-01")));
        assert!(week.is_ended(date("2025-08-02")));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(
            Week::parse("not-a-date"),
            Err(WeekError::InvalidDate("not-a-date".to_string()))
        );
    }

    #[test]
    fn deadline_alert_window() {
        let week = Week::parse("2025-07-28").unwrap();
        let draft = TimesheetStatus::Draft;

        assert_eq!(deadline_alert(draft, &week, date("2025-07-28")), None);
        assert_eq!(deadline_alert(draft, &week, date("2025-07-30")), Some(2));
        assert_eq!(deadline_alert(draft, &week, date("2025-08-01")), Some(0));
        assert_eq!(deadline_alert(draft, &week, date("2025-08-02")), None);
        assert_eq!(
            deadline_alert(TimesheetStatus::Submitted, &week, date("2025-07-31")),
            None
        );
        assert_eq!(
            deadline_alert(TimesheetStatus::Rejected, &week, date("2025-07-31")),
            Some(1)
        );
    }

    #[test]
    fn serializes_as_monday() {
        let week: Week = serde_json::from_str("\"2025-07-31\"").unwrap();
        assert_eq!(serde_json::to_string(&week).unwrap(), "\"2025-07-28\"");
        assert_eq!(week.next().previous(), week);
    }
}
