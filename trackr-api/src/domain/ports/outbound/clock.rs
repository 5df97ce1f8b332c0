use chrono::NaiveDate;
use time::OffsetDateTime;

/// Source of the current time.
///
/// `today` is the calendar date deadlines are measured against; `now`
/// stamps reviews and is always UTC.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> NaiveDate;
}
