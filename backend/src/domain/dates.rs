//! Local-time date arithmetic shared by the scheduler and calendar services.
//!
//! Everything here works on `NaiveDateTime`/`NaiveDate`: timestamps are local
//! wall-clock values with minute precision and are never UTC-normalized.
//! Bucket keys are always derived by extracting year/month/day from the
//! value itself, not by slicing a serialized string.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Shift a timestamp by `n` calendar days (negative allowed).
pub fn add_days(dt: NaiveDateTime, n: i64) -> NaiveDateTime {
    dt + Duration::days(n)
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:00` (minute precision).
pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:00").to_string()
}

/// Parse a local-time timestamp, tolerating second precision, fractional
/// seconds, and a trailing `Z` left over by upstream serializers.
pub fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim().trim_end_matches('Z');
    let trimmed = match trimmed.split_once('.') {
        Some((head, _fraction)) => head,
        None => trimmed,
    };
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// True iff year, month, and day-of-month match.
pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Bucket key (`YYYY-MM-DD`) for a timestamp, by field extraction.
pub fn day_key(dt: NaiveDateTime) -> String {
    format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day())
}

/// Bucket key for a plain date.
pub fn date_key(d: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}

/// Parse a `YYYY-MM-DD` key back into a date.
pub fn parse_day_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// The Monday of the week containing `anchor`.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    let offset = anchor.weekday().num_days_from_monday() as i64;
    anchor - Duration::days(offset)
}

/// The seven `YYYY-MM-DD` keys of the Monday-started week containing
/// `anchor`.
pub fn week_days(anchor: NaiveDate) -> Vec<String> {
    let monday = week_start(anchor);
    (0..7)
        .map(|i| date_key(monday + Duration::days(i)))
        .collect()
}

/// Combine a `YYYY-MM-DD` date with an `HH:MM` time-of-day.
pub fn combine(day: &str, hhmm: &str) -> Option<NaiveDateTime> {
    let date = parse_day_key(day)?;
    let (h, m) = hhmm.trim().split_once(':')?;
    let time = NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)?;
    Some(date.and_time(time))
}

/// Inclusive datetime bounds `[00:00:00, 23:59:59]` of a span of days.
pub fn day_span_bounds(start: NaiveDate, end: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (
        start.and_time(NaiveTime::MIN),
        end.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()),
    )
}

/// Number of days in a given month and year.
pub fn days_in_month(month: u32, year: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year.
pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        parse_iso(s).unwrap()
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(dt("2025-09-15T08:00"), 1), dt("2025-09-16T08:00"));
        assert_eq!(add_days(dt("2025-09-15T08:00"), -1), dt("2025-09-14T08:00"));
        // Month rollover
        assert_eq!(add_days(dt("2025-09-30T08:00"), 1), dt("2025-10-01T08:00"));
    }

    #[test]
    fn test_format_iso_truncates_to_minute() {
        let with_seconds = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(8, 30, 45)
            .unwrap();
        assert_eq!(format_iso(with_seconds), "2025-09-15T08:30:00");
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_iso("2025-09-15T08:00"), Some(dt("2025-09-15T08:00")));
        assert_eq!(
            parse_iso("2025-09-15T08:00:00"),
            Some(dt("2025-09-15T08:00"))
        );
        assert_eq!(
            parse_iso("2025-09-15T08:00:00.000Z"),
            Some(dt("2025-09-15T08:00"))
        );
        assert_eq!(parse_iso("not-a-date"), None);
    }

    #[test]
    fn test_is_same_day() {
        assert!(is_same_day(dt("2025-09-15T00:00"), dt("2025-09-15T23:59")));
        assert!(!is_same_day(dt("2025-09-15T23:59"), dt("2025-09-16T00:00")));
    }

    #[test]
    fn test_day_key_field_extraction() {
        // Late-evening timestamps stay on their own calendar day
        assert_eq!(day_key(dt("2025-09-15T23:30")), "2025-09-15");
        assert_eq!(day_key(dt("2025-01-02T00:00")), "2025-01-02");
    }

    #[test]
    fn test_week_days_starts_monday() {
        // 2025-09-17 is a Wednesday
        let days = week_days(NaiveDate::from_ymd_opt(2025, 9, 17).unwrap());
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], "2025-09-15");
        assert_eq!(days[6], "2025-09-21");

        // A Monday anchor is its own week start
        let days = week_days(NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert_eq!(days[0], "2025-09-15");

        // A Sunday anchor belongs to the preceding Monday's week
        let days = week_days(NaiveDate::from_ymd_opt(2025, 9, 21).unwrap());
        assert_eq!(days[0], "2025-09-15");
    }

    #[test]
    fn test_combine() {
        assert_eq!(
            combine("2025-09-18", "08:00"),
            Some(dt("2025-09-18T08:00"))
        );
        assert_eq!(combine("2025-09-18", "junk"), None);
        assert_eq!(combine("junk", "08:00"), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1, 2025), 31);
        assert_eq!(days_in_month(4, 2025), 30);
        assert_eq!(days_in_month(2, 2025), 28);
        assert_eq!(days_in_month(2, 2024), 29);
    }

    #[test]
    fn test_is_leap_year() {
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }
}
