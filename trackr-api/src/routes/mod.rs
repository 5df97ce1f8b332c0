pub(crate) mod admin;
pub(crate) mod dashboard;
pub(crate) mod error;
pub(crate) mod notifications;
pub(crate) mod projects;
pub(crate) mod timesheets;
pub(crate) mod users;

pub(crate) use error::ApiError;

use chrono::NaiveDate;
use std::str::FromStr;
use timesheet::TimesheetStatus;

/// Parses a `YYYY-MM-DD` query or path value.
fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_date)
        .transpose()
}

/// Status filter from a query string. Empty and `all` mean no filter.
fn parse_status_filter(value: Option<&str>) -> Result<Option<TimesheetStatus>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => TimesheetStatus::from_str(v)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("unknown status '{v}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_accepts_all_and_blank() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_status_filter(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("Approved")).unwrap(),
            Some(TimesheetStatus::Approved)
        );
        assert!(parse_status_filter(Some("pending")).is_err());
    }

    #[test]
    fn dates_are_iso() {
        assert_eq!(
            parse_optional_date(Some("2025-07-28")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 28)
        );
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        assert!(parse_date("28/07/2025").is_err());
    }
}
