//! Permissive date parsing for temporal filter conditions.
//!
//! Formats are tried in priority order and the first match wins:
//! 1. `YYYY[-/]MM[-/]DD HH:MM[:SS]` (prefix match, trailing text ignored)
//! 2. `YYYY[-/]MM[-/]DD`
//! 3. `YYYY-MM-DDTHH:MM` (prefix match, minute precision)
//! 4. general formats: RFC 3339, RFC 2822, `MM/DD/YYYY [HH:MM[:SS]]`, month names,
//!    `YYYY-MM`, `YYYY`
//!
//! Results are local wall-clock times. Calendar components outside their range roll
//! over into the next unit (`2024-13-01` is `2025-01-01`), the way a lenient calendar
//! constructor behaves.

use crate::error::DateParseError;
use crate::value::Value;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn date_time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})\s+(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?")
            .expect("date-time pattern is valid")
    })
}

fn date_only_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})$").expect("date pattern is valid")
    })
}

fn iso_minute_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})").expect("iso pattern is valid")
    })
}

const NAIVE_FALLBACK_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
];

const DATE_FALLBACK_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a date string, `None` when no supported format accepts it.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    parse_date_strict(s).ok()
}

/// Parse a date string, reporting why it was rejected.
pub fn parse_date_strict(s: &str) -> Result<NaiveDateTime, DateParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DateParseError::Empty);
    }
    let unrecognized = || DateParseError::Unrecognized(s.to_string());

    if let Some(caps) = date_time_pattern().captures(s) {
        let second = caps.get(6).map_or(Some(0), |m| m.as_str().parse().ok());
        return calendar(
            group(&caps, 1),
            group(&caps, 2),
            group(&caps, 3),
            group(&caps, 4),
            group(&caps, 5),
            second,
        )
        .ok_or_else(unrecognized);
    }

    if let Some(caps) = date_only_pattern().captures(s) {
        return calendar(
            group(&caps, 1),
            group(&caps, 2),
            group(&caps, 3),
            Some(0),
            Some(0),
            Some(0),
        )
        .ok_or_else(unrecognized);
    }

    if let Some(caps) = iso_minute_pattern().captures(s) {
        return calendar(
            group(&caps, 1),
            group(&caps, 2),
            group(&caps, 3),
            group(&caps, 4),
            group(&caps, 5),
            Some(0),
        )
        .ok_or_else(unrecognized);
    }

    parse_general(s).ok_or_else(unrecognized)
}

/// Parse a row value. Missing, null and other falsy values never parse; non-text
/// values are parsed from their display string.
pub fn parse_date_value(value: Option<&Value>) -> Option<NaiveDateTime> {
    match value {
        None => None,
        Some(v) if v.is_falsy() => None,
        Some(Value::Text(s)) => parse_date(s),
        Some(other) => parse_date(&other.display_string()),
    }
}

/// Milliseconds since the epoch of a wall-clock time, the unit dates are compared in.
pub fn to_millis(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

fn group(caps: &regex::Captures<'_>, i: usize) -> Option<i64> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

/// Build a wall-clock time from possibly out-of-range components, rolling over.
fn calendar(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
) -> Option<NaiveDateTime> {
    let month0 = month? - 1;
    let year = i32::try_from(year? + month0.div_euclid(12)).ok()?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_time(NaiveTime::MIN);
    first
        .checked_add_signed(Duration::days(day? - 1))?
        .checked_add_signed(Duration::hours(hour?))?
        .checked_add_signed(Duration::minutes(minute?))?
        .checked_add_signed(Duration::seconds(second?))
}

fn parse_general(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_FALLBACK_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FALLBACK_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    // Bare year or year-month: midnight UTC on the first day, shown in local time.
    let (year, month) = match s.split_once('-') {
        Some((y, m)) if y.len() == 4 && m.len() == 2 => (y.parse().ok()?, m.parse().ok()?),
        None if s.len() == 4 => (s.parse().ok()?, 1),
        _ => return None,
    };
    let utc = NaiveDate::from_ymd_opt(year, month, 1)?.and_time(NaiveTime::MIN);
    Some(Utc.from_utc_datetime(&utc).with_timezone(&Local).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn space_separated_date_time() {
        assert_eq!(parse_date("2023-12-31 10:00"), Some(at(2023, 12, 31, 10, 0, 0)));
        assert_eq!(parse_date("2023/1/5 7:08:09"), Some(at(2023, 1, 5, 7, 8, 9)));
        assert_eq!(
            parse_date("2023-01-05 07:08:09.123 extra"),
            Some(at(2023, 1, 5, 7, 8, 9))
        );
    }

    #[test]
    fn date_only() {
        assert_eq!(parse_date("2024-01-01"), Some(at(2024, 1, 1, 0, 0, 0)));
        assert_eq!(parse_date(" 2024/2/9 "), Some(at(2024, 2, 9, 0, 0, 0)));
    }

    #[test]
    fn iso_minute_precision_drops_seconds_and_offsets() {
        assert_eq!(
            parse_date("2024-03-04T05:06:59Z"),
            Some(at(2024, 3, 4, 5, 6, 0))
        );
        assert_eq!(parse_date("2024-03-04T05:06"), Some(at(2024, 3, 4, 5, 6, 0)));
    }

    #[test]
    fn components_roll_over() {
        assert_eq!(parse_date("2024-13-01"), Some(at(2025, 1, 1, 0, 0, 0)));
        assert_eq!(parse_date("2024-02-30"), Some(at(2024, 3, 1, 0, 0, 0)));
        assert_eq!(parse_date("2024-00-10"), Some(at(2023, 12, 10, 0, 0, 0)));
        assert_eq!(parse_date("2024-01-01 24:30"), Some(at(2024, 1, 2, 0, 30, 0)));
    }

    #[test]
    fn general_fallbacks() {
        assert_eq!(parse_date("01/15/2024"), Some(at(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_date("Jan 15, 2024"), Some(at(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_date("15 January 2024"), Some(at(2024, 1, 15, 0, 0, 0)));
        let rfc2822 = parse_date("Mon, 15 Jan 2024 10:00:00 +0000").unwrap();
        let expected = Utc
            .from_utc_datetime(&at(2024, 1, 15, 10, 0, 0))
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(rfc2822, expected);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date_strict("   "), Err(DateParseError::Empty));
        assert_eq!(
            parse_date_strict("not a date"),
            Err(DateParseError::Unrecognized("not a date".to_string()))
        );
    }

    #[test]
    fn row_values() {
        assert_eq!(parse_date_value(None), None);
        assert_eq!(parse_date_value(Some(&Value::Null)), None);
        assert_eq!(parse_date_value(Some(&Value::from(""))), None);
        assert_eq!(parse_date_value(Some(&Value::Bool(true))), None);
        assert_eq!(
            parse_date_value(Some(&Value::from("2024-01-02"))),
            Some(at(2024, 1, 2, 0, 0, 0))
        );
    }

    #[test]
    fn millis_ordering() {
        let a = parse_date("2023-12-31 10:00").unwrap();
        let b = parse_date("2024-01-01").unwrap();
        assert!(to_millis(&a) < to_millis(&b));
        assert_eq!(to_millis(&b) - to_millis(&a), 14 * 60 * 60 * 1000);
    }
}
