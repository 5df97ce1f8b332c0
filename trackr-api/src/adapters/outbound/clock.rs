use chrono::{Local, NaiveDate};
use time::OffsetDateTime;

use crate::domain::ports::outbound::Clock;

/// Wall clock. Deadlines follow the server's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stopped at a fixed day, for tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

#[cfg(test)]
impl FixedClock {
    pub fn on(today: &str) -> Self {
        Self {
            today: NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap(),
        }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        let date = time::Date::from_calendar_date(
            chrono::Datelike::year(&self.today),
            time::Month::try_from(chrono::Datelike::month(&self.today) as u8).unwrap(),
            chrono::Datelike::day(&self.today) as u8,
        )
        .unwrap();
        date.with_hms(12, 0, 0).unwrap().assume_utc()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
