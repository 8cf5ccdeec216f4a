//! Date parsing and formatting for the `dateFormat` transformation.
//!
//! Every instant is interpreted and rendered in UTC. Numbers are epoch
//! milliseconds; strings are tried against RFC 3339, RFC 2822, and a list
//! of common date-time and date layouts, US month-first before European.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use fieldmap_model::DateStyle;
use serde_json::Value;

/// Largest epoch offset a JavaScript `Date` accepts, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%b %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%b-%d",
];

/// Interpret a JSON value as an instant, the way `new Date(value)` does.
#[must_use]
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => from_epoch_millis(number.as_f64()?),
        Value::Bool(flag) => from_epoch_millis(f64::from(u8::from(*flag))),
        Value::String(text) => parse_date_text(text),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Parse a date string; unzoned values are taken as UTC.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    let unzoned = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    try_parse_datetime(unzoned)
        .or_else(|| try_parse_date(unzoned).map(|date| date.and_time(NaiveTime::MIN)))
        .or_else(|| try_parse_partial(unzoned))
        .map(|naive| naive.and_utc())
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// `YYYY-MM` and `YYYY`, anchored at the first day.
fn try_parse_partial(value: &str) -> Option<NaiveDateTime> {
    let (year, month) = match value.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month.parse::<u32>().ok()?),
        Some(_) => return None,
        None => (value, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1).map(|date| date.and_time(NaiveTime::MIN))
}

/// Render an instant in the requested style.
#[must_use]
pub fn format_instant(instant: &DateTime<Utc>, style: DateStyle) -> String {
    match style {
        DateStyle::Iso => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        DateStyle::Short => instant.format("%-m/%-d/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_common_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        for text in ["2024-01-15", "01/15/2024", "15-Jan-2024", "January 15, 2024", "15.01.2024"] {
            assert_eq!(parse_date_text(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn honors_offsets_and_naive_times() {
        let parsed = parse_date_text("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 8);
        let parsed = parse_date_text("2024-01-15T10:30:00").unwrap();
        assert_eq!(parsed.hour(), 10);
        let parsed = parse_date_text("2024-01-15T10:30:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn partial_dates_anchor_to_first_day() {
        let parsed = parse_date_text("2024-03").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 1));
        assert_eq!(parse_date_text("2024").unwrap().month(), 1);
        assert!(parse_date_text("2024-13").is_none());
        assert!(parse_date_text("not a date").is_none());
    }

    #[test]
    fn numbers_are_epoch_millis() {
        let parsed = parse_instant(&json!(86_400_000)).unwrap();
        assert_eq!(format_instant(&parsed, DateStyle::Iso), "1970-01-02T00:00:00.000Z");
        assert!(parse_instant(&json!(1e300)).is_none());
    }

    #[test]
    fn short_style_is_month_day_year() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_instant(&instant, DateStyle::Short), "3/5/2024");
    }
}
