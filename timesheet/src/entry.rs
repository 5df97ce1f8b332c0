use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use thiserror::Error;

use crate::{hours::worked_hours, lenient, ClockTime, Week};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryEditError {
    #[error("no allocation #{0} on this day")]
    AllocationOutOfRange(usize),
    #[error("a day must keep at least one allocation")]
    LastAllocation,
}

/// A slice of a day's worked hours booked against one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    #[serde(default)]
    pub project_id: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub hours: Option<f64>,
}

impl Allocation {
    pub fn new(project_id: impl Into<String>, description: impl Into<String>, hours: f64) -> Self {
        Self {
            project_id: project_id.into(),
            description: description.into(),
            hours: Some(hours),
        }
    }
}

/// One weekday of a timesheet, exactly as the employee filled it in.
///
/// Unset fields are defaulted here, so callers never have to guess at
/// missing values.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(rename = "in", default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub clock_in: Option<ClockTime>,
    #[serde(rename = "out", default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub clock_out: Option<ClockTime>,
    /// Lunch break in minutes.
    #[serde(rename = "break", default, deserialize_with = "lenient::minutes")]
    pub break_minutes: u32,
    /// Extra hours on top of the in/out span.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub overtime: f64,
    #[serde(default = "blank_allocations")]
    pub allocations: Vec<Allocation>,
}

fn blank_allocations() -> Vec<Allocation> {
    vec![Allocation::default()]
}

impl Default for DayEntry {
    fn default() -> Self {
        Self {
            clock_in: None,
            clock_out: None,
            break_minutes: 0,
            overtime: 0.0,
            allocations: blank_allocations(),
        }
    }
}

/// Outcome of typing an hour value into an allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationEdit {
    Accepted,
    /// The value exceeded the day's worked hours and was reset to `max`.
    Clamped { max: f64 },
}

impl DayEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_times(mut self, clock_in: ClockTime, clock_out: ClockTime) -> Self {
        self.clock_in = Some(clock_in);
        self.clock_out = Some(clock_out);
        self
    }

    pub fn with_break(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    pub fn with_overtime(mut self, hours: f64) -> Self {
        self.overtime = hours;
        self
    }

    pub fn with_allocations(mut self, allocations: Vec<Allocation>) -> Self {
        self.allocations = allocations;
        self
    }

    pub fn has_times(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_some()
    }

    pub fn set_clock_in(&mut self, time: Option<ClockTime>) {
        self.clock_in = time;
        self.sync_single_allocation();
    }

    pub fn set_clock_out(&mut self, time: Option<ClockTime>) {
        self.clock_out = time;
        self.sync_single_allocation();
    }

    pub fn set_break(&mut self, minutes: u32) {
        self.break_minutes = minutes;
        self.sync_single_allocation();
    }

    pub fn set_overtime(&mut self, hours: f64) {
        self.overtime = hours;
        self.sync_single_allocation();
    }

    /// A lone allocation always carries the whole day.
    fn sync_single_allocation(&mut self) {
        if self.allocations.len() == 1 {
            let total = worked_hours(self);
            self.allocations[0].hours = Some(total);
        }
    }

    /// Sets an allocation's hours, never letting it exceed the day total.
    pub fn set_allocation_hours(
        &mut self,
        index: usize,
        hours: f64,
    ) -> Result<AllocationEdit, EntryEditError> {
        let max = worked_hours(self);
        let allocation = self
            .allocations
            .get_mut(index)
            .ok_or(EntryEditError::AllocationOutOfRange(index))?;

        if hours > max {
            allocation.hours = Some(max);
            Ok(AllocationEdit::Clamped { max })
        } else {
            allocation.hours = Some(hours);
            Ok(AllocationEdit::Accepted)
        }
    }

    pub fn set_allocation_project(
        &mut self,
        index: usize,
        project_id: impl Into<String>,
    ) -> Result<(), EntryEditError> {
        self.allocations
            .get_mut(index)
            .ok_or(EntryEditError::AllocationOutOfRange(index))?
            .project_id = project_id.into();
        Ok(())
    }

    pub fn set_allocation_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), EntryEditError> {
        self.allocations
            .get_mut(index)
            .ok_or(EntryEditError::AllocationOutOfRange(index))?
            .description = description.into();
        Ok(())
    }

    pub fn add_allocation(&mut self) {
        self.allocations.push(Allocation::default());
    }

    pub fn remove_allocation(&mut self, index: usize) -> Result<Allocation, EntryEditError> {
        if index >= self.allocations.len() {
            return Err(EntryEditError::AllocationOutOfRange(index));
        }
        if self.allocations.len() == 1 {
            return Err(EntryEditError::LastAllocation);
        }
        Ok(self.allocations.remove(index))
    }

    /// Sum of the allocation hours, treating blanks as zero.
    pub fn allocated_hours(&self) -> f64 {
        self.allocations.iter().filter_map(|a| a.hours).sum()
    }
}

/// A week's day entries keyed by calendar date, in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries(BTreeMap<NaiveDate, DayEntry>);

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    /// A blank entry for each of the week's five slots.
    pub fn for_week(week: &Week) -> Self {
        week.slots()
            .into_iter()
            .map(|slot| (slot.date, DayEntry::default()))
            .collect()
    }

    /// Fills in blank entries for missing weekdays.
    ///
    /// Returns the dates that do not belong to `week`; the map is left
    /// untouched in that case.
    pub fn normalize(&mut self, week: &Week) -> Result<(), Vec<NaiveDate>> {
        let stray: Vec<NaiveDate> = self
            .0
            .keys()
            .filter(|date| !week.contains(**date))
            .copied()
            .collect();
        if !stray.is_empty() {
            return Err(stray);
        }

        for slot in week.slots() {
            self.0.entry(slot.date).or_default();
        }
        Ok(())
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DayEntry> {
        self.0.get(date)
    }

    pub fn get_mut(&mut self, date: &NaiveDate) -> Option<&mut DayEntry> {
        self.0.get_mut(date)
    }

    pub fn insert(&mut self, date: NaiveDate, entry: DayEntry) -> Option<DayEntry> {
        self.0.insert(date, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayEntry)> {
        self.0.iter()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayEntry> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NaiveDate, DayEntry)> for Entries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, DayEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<NaiveDate, DayEntry>> for Entries {
    fn from(map: BTreeMap<NaiveDate, DayEntry>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        let entry: DayEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry, DayEntry::default());
        assert_eq!(entry.allocations.len(), 1);
    }

    #[test]
    fn reads_form_shaped_json() {
        let json = r#"{
            "in": "09:00",
            "out": "",
            "break": "45",
            "overtime": "",
            "allocations": [{ "projectId": "p1", "desc": "Support", "hours": "" }]
        }"#;
        let entry: DayEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.clock_in, Some(t("09:00")));
        assert_eq!(entry.clock_out, None);
        assert_eq!(entry.break_minutes, 45);
        assert_eq!(entry.overtime, 0.0);
        assert_eq!(entry.allocations[0].description, "Support");
        assert_eq!(entry.allocations[0].hours, None);
    }

    #[test]
    fn rejects_negative_break() {
        let result = serde_json::from_str::<DayEntry>(r#"{ "break": -5 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn single_allocation_follows_time_changes() {
        let mut entry = DayEntry::new();
        entry.set_clock_in(Some(t("09:00")));
        assert_eq!(entry.allocations[0].hours, Some(0.0));

        entry.set_clock_out(Some(t("17:00")));
        entry.set_break(60);
        assert_eq!(entry.allocations[0].hours, Some(7.0));

        entry.set_overtime(1.5);
        assert_eq!(entry.allocations[0].hours, Some(8.5));
    }

    #[test]
    fn several_allocations_are_left_alone() {
        let mut entry = DayEntry::new();
        entry.add_allocation();
        entry.set_clock_in(Some(t("09:00")));
        entry.set_clock_out(Some(t("17:00")));
        assert!(entry.allocations.iter().all(|a| a.hours.is_none()));
    }

    #[test]
    fn allocation_hours_are_clamped_to_day_total() {
        let mut entry = DayEntry::new()
            .with_times(t("09:00"), t("17:00"))
            .with_break(60);
        entry.add_allocation();

        assert_eq!(
            entry.set_allocation_hours(1, 3.0),
            Ok(AllocationEdit::Accepted)
        );
        assert_eq!(
            entry.set_allocation_hours(0, 9.0),
            Ok(AllocationEdit::Clamped { max: 7.0 })
        );
        assert_eq!(entry.allocations[0].hours, Some(7.0));
        assert_eq!(
            entry.set_allocation_hours(5, 1.0),
            Err(EntryEditError::AllocationOutOfRange(5))
        );
    }

    #[test]
    fn last_allocation_cannot_be_removed() {
        let mut entry = DayEntry::new();
        assert_eq!(entry.remove_allocation(0), Err(EntryEditError::LastAllocation));

        entry.add_allocation();
        entry.set_allocation_project(1, "p2").unwrap();
        let removed = entry.remove_allocation(1).unwrap();
        assert_eq!(removed.project_id, "p2");
        assert_eq!(entry.allocations.len(), 1);
    }

    #[test]
    fn entries_serialize_with_iso_keys() {
        let mut entries = Entries::new();
        entries.insert(date("2025-07-28"), DayEntry::new());
        let json = serde_json::to_value(&entries).unwrap();
        assert!(json.get("2025-07-28").is_some());

        let back: Entries = serde_json::from_value(json).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn normalize_fills_missing_days() {
        let week = Week::containing(date("2025-07-30"));
        let mut entries = Entries::new();
        entries.insert(
            date("2025-07-29"),
            DayEntry::new().with_times(t("08:00"), t("16:00")),
        );

        entries.normalize(&week).unwrap();
        assert_eq!(entries.len(), 5);
        assert!(entries.get(&date("2025-07-29")).unwrap().has_times());
    }

    #[test]
    fn normalize_reports_days_outside_week() {
        let week = Week::containing(date("2025-07-30"));
        let mut entries = Entries::new();
        entries.insert(date("2025-08-02"), DayEntry::new());

        assert_eq!(entries.normalize(&week), Err(vec![date("2025-08-02")]));
        assert_eq!(entries.len(), 1);
    }
}
