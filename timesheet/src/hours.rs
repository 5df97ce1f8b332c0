use serde::Serialize;

use crate::DayEntry;

/// Hours above this count as overtime in the regular/overtime split.
pub const REGULAR_DAY_HOURS: f64 = 8.0;

/// Rounds to two decimals, the precision every hour figure is shown and
/// compared at.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// In→out minus break, in hours. Zero when either time is missing or the
/// span is not positive.
fn raw_span_hours(entry: &DayEntry) -> f64 {
    let (Some(clock_in), Some(clock_out)) = (entry.clock_in, entry.clock_out) else {
        return 0.0;
    };

    let minutes = clock_out.minutes() - clock_in.minutes() - i64::from(entry.break_minutes);
    if minutes > 0 {
        minutes as f64 / 60.0
    } else {
        0.0
    }
}

/// Hours worked on a day: the in/out span less break, plus overtime.
///
/// Without both times only the overtime counts, as entered. An out time
/// before the in time, or a break longer than the span, gives a zero span
/// rather than an error. The result is never below the overtime.
pub fn worked_hours(entry: &DayEntry) -> f64 {
    if !entry.has_times() {
        return entry.overtime;
    }
    round_hours(raw_span_hours(entry) + entry.overtime).max(entry.overtime)
}

/// The in/out span less break, without overtime.
///
/// Feeds the regular/overtime split. Differs from [`worked_hours`] whenever
/// overtime is entered.
pub fn span_hours(entry: &DayEntry) -> f64 {
    round_hours(raw_span_hours(entry))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoursSplit {
    pub regular: f64,
    pub overtime: f64,
}

/// Splits a day total into up to eight regular hours and the remainder.
/// Display only; the result is never written back to the entry.
pub fn regular_overtime_split(total: f64) -> HoursSplit {
    HoursSplit {
        regular: round_hours(total.min(REGULAR_DAY_HOURS)),
        overtime: round_hours((total - REGULAR_DAY_HOURS).max(0.0)),
    }
}

/// Everything the entry form shows for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub span_hours: f64,
    pub overtime: f64,
    pub worked_hours: f64,
    pub split: HoursSplit,
}

impl DayEntry {
    pub fn summary(&self) -> DaySummary {
        let span = span_hours(self);
        DaySummary {
            span_hours: span,
            overtime: self.overtime,
            worked_hours: worked_hours(self),
            split: regular_overtime_split(span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClockTime;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn day(clock_in: &str, clock_out: &str, break_minutes: u32, overtime: f64) -> DayEntry {
        DayEntry::new()
            .with_times(t(clock_in), t(clock_out))
            .with_break(break_minutes)
            .with_overtime(overtime)
    }

    #[test]
    fn full_day_less_lunch() {
        assert_eq!(worked_hours(&day("09:00", "17:00", 60, 0.0)), 7.0);
    }

    #[test]
    fn overtime_is_added_on_top() {
        assert_eq!(worked_hours(&day("09:00", "17:00", 60, 1.0)), 8.0);
    }

    #[test]
    fn missing_out_counts_only_overtime() {
        let mut entry = DayEntry::new().with_overtime(2.0);
        entry.clock_in = Some(t("09:00"));
        assert_eq!(worked_hours(&entry), 2.0);
        assert_eq!(worked_hours(&DayEntry::new()), 0.0);
    }

    #[test]
    fn out_before_in_clamps_to_zero() {
        assert_eq!(worked_hours(&day("17:00", "09:00", 0, 0.0)), 0.0);
        assert_eq!(worked_hours(&day("17:00", "09:00", 0, 1.5)), 1.5);
    }

    #[test]
    fn break_longer_than_span_clamps_to_zero() {
        assert_eq!(worked_hours(&day("09:00", "10:00", 90, 0.0)), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 7h 20m = 7.333...
        assert_eq!(worked_hours(&day("09:00", "16:50", 30, 0.0)), 7.33);
    }

    #[test]
    fn worked_hours_is_stable_and_covers_overtime() {
        let entry = day("08:15", "16:45", 30, 0.75);
        let first = worked_hours(&entry);
        assert_eq!(first, worked_hours(&entry));
        assert!(first >= entry.overtime);
    }

    #[test]
    fn fine_grained_overtime_is_not_rounded_away() {
        let no_times = DayEntry::new().with_overtime(0.124);
        assert_eq!(worked_hours(&no_times), 0.124);

        let zero_span = day("17:00", "09:00", 0, 0.124);
        assert!(worked_hours(&zero_span) >= zero_span.overtime);

        for overtime in [0.0, 0.005, 0.124, 0.999, 2.5] {
            for entry in [DayEntry::new().with_overtime(overtime), day("09:00", "09:20", 0, overtime)] {
                assert!(worked_hours(&entry) >= entry.overtime, "overtime {overtime}");
            }
        }
    }

    #[test]
    fn span_ignores_overtime() {
        let entry = day("09:00", "17:00", 60, 1.0);
        assert_eq!(span_hours(&entry), 7.0);
        assert_eq!(worked_hours(&entry), 8.0);
    }

    #[test]
    fn split_caps_regular_at_eight() {
        assert_eq!(
            regular_overtime_split(9.5),
            HoursSplit {
                regular: 8.0,
                overtime: 1.5
            }
        );
        assert_eq!(
            regular_overtime_split(6.0),
            HoursSplit {
                regular: 6.0,
                overtime: 0.0
            }
        );
    }

    #[test]
    fn summary_splits_the_span() {
        let summary = day("07:00", "17:30", 30, 1.0).summary();
        assert_eq!(summary.span_hours, 10.0);
        assert_eq!(summary.worked_hours, 11.0);
        assert_eq!(summary.split.regular, 8.0);
        assert_eq!(summary.split.overtime, 2.0);
    }
}
