use crate::error::CoreError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// The only accepted textual form for attendance dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar date. Impossible dates and trailing text are rejected.
///
/// The year must be exactly four digits; month and day may be one or two digits
/// (`2024-1-5` is accepted). Signs and whitespace are not.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, CoreError> {
    let invalid = || CoreError::InvalidDate(input.to_string());
    if !has_calendar_shape(input) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())
}

// chrono's `%Y` alone also takes short years and a leading sign.
fn has_calendar_shape(input: &str) -> bool {
    let mut parts = input.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
}

/// Midnight UTC at the start of `date`. Attendance records are stored at this instant.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The half-open range `[date 00:00, date+1 00:00)`.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date);
    (start, start + Duration::days(1))
}

/// Renders a stored timestamp as ISO-8601 without a zone suffix, e.g. `2024-01-15T00:00:00`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}
