use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid time of day, expected HH:MM")]
pub struct ClockTimeError(String);

/// A wall-clock time of day as entered in the `In`/`Out` fields.
///
/// Serialized as `HH:MM`. Seconds are accepted on input but dropped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> i64 {
        i64::from(self.0.hour()) * 60 + i64::from(self.0.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(|t| Self(t.with_second(0).unwrap_or(t)))
            .map_err(|_| ClockTimeError(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self(time.with_second(0).unwrap_or(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        let t: ClockTime = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn accepts_seconds_but_drops_them() {
        let t: ClockTime = "17:05:42".parse().unwrap();
        assert_eq!(t, ClockTime::new(17, 5).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<ClockTime>().is_err());
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("nine".parse::<ClockTime>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let t = ClockTime::new(8, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"08:00\"");
        let back: ClockTime = serde_json::from_str("\"08:00\"").unwrap();
        assert_eq!(back, t);
    }
}
