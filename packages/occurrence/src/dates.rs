//! Darwin Core `eventDate` parsing.
//!
//! `eventDate` is an ISO 8601 date, date-time, or interval at whatever
//! precision the publisher recorded. Values are normalized to a naive UTC
//! date-time; reduced-precision dates resolve to their first instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Offset date-time layouts, tried after RFC 3339. A trailing `Z` is
/// rewritten to `+00:00` first. `%z` accepts the offset with or without a
/// colon.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Naive date-time layouts, tried after the offset layouts.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an `eventDate` value.
///
/// Intervals (`start/end`) resolve to their start. Returns `None` if the
/// value is blank or matches no supported layout; callers distinguish the
/// two by checking for blank input first.
#[must_use]
pub fn parse_event_date(value: &str) -> Option<NaiveDateTime> {
    let start = value
        .split_once('/')
        .map_or(value, |(start, _)| start)
        .trim();

    if start.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(start) {
        return Some(dt.naive_utc());
    }

    let normalized = normalize_time(start);
    let start = normalized.as_deref().unwrap_or(start);

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(start, format) {
            return Some(dt.naive_utc());
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(start, format) {
            return Some(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(start, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    parse_reduced_precision(start)?.and_hms_opt(0, 0, 0)
}

/// Rewrites the time part of a `T`-separated value so the layouts above
/// can read it: `Z` becomes `+00:00`, and an hour-only time or an
/// hour-only offset gains `:00`.
/// Returns `None` when nothing needs rewriting.
fn normalize_time(value: &str) -> Option<String> {
    let (date, time) = value.split_once('T')?;
    let time = time.strip_suffix('Z').map_or_else(
        || time.to_string(),
        |local| format!("{local}+00:00"),
    );

    let offset_at = time.find(['+', '-']).unwrap_or(time.len());
    let (clock, offset) = time.split_at(offset_at);
    let clock = if clock.len() == 2 && clock.bytes().all(|b| b.is_ascii_digit()) {
        format!("{clock}:00")
    } else {
        clock.to_string()
    };

    let offset = if offset.len() == 3 && offset[1..].bytes().all(|b| b.is_ascii_digit()) {
        format!("{offset}:00")
    } else {
        offset.to_string()
    };

    let rewritten = format!("{date}T{clock}{offset}");
    (rewritten != value).then_some(rewritten)
}

/// Handles `YYYY-MM` and `YYYY`.
fn parse_reduced_precision(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let year = parse_digits(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(month) => parse_digits(month, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)
}

fn parse_digits(value: &str, width: usize) -> Option<u32> {
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(s: &str) -> String {
        parse_event_date(s).unwrap().to_string()
    }

    #[test]
    fn parses_plain_date() {
        assert_eq!(ymd_hms("2019-05-12"), "2019-05-12 00:00:00");
    }

    #[test]
    fn parses_date_time_variants() {
        assert_eq!(ymd_hms("2019-05-12T10:30:00"), "2019-05-12 10:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30:00.250"), "2019-05-12 10:30:00.250");
        assert_eq!(ymd_hms("2019-05-12 10:30:00"), "2019-05-12 10:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30"), "2019-05-12 10:30:00");
    }

    #[test]
    fn converts_offsets_to_utc() {
        assert_eq!(ymd_hms("2019-05-12T10:30:00-06:00"), "2019-05-12 16:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30:00Z"), "2019-05-12 10:30:00");
    }

    #[test]
    fn converts_short_and_compact_offsets() {
        assert_eq!(ymd_hms("2019-05-12T10:30Z"), "2019-05-12 10:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30-06:00"), "2019-05-12 16:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30:00-0600"), "2019-05-12 16:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30:00.000+0000"), "2019-05-12 10:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30+0100"), "2019-05-12 09:30:00");
        assert_eq!(ymd_hms("2019-05-12T10:30:00-06"), "2019-05-12 16:30:00");
    }

    #[test]
    fn parses_hour_only_times() {
        assert_eq!(ymd_hms("2019-05-12T10Z"), "2019-05-12 10:00:00");
        assert_eq!(ymd_hms("2019-05-12T10-06:00"), "2019-05-12 16:00:00");
        assert_eq!(ymd_hms("2019-05-12T10"), "2019-05-12 10:00:00");
    }

    #[test]
    fn reduced_precision_uses_first_instant() {
        assert_eq!(ymd_hms("2019-05"), "2019-05-01 00:00:00");
        assert_eq!(ymd_hms("2019"), "2019-01-01 00:00:00");
    }

    #[test]
    fn intervals_use_start() {
        assert_eq!(ymd_hms("2019-05-12/2019-05-14"), "2019-05-12 00:00:00");
    }

    #[test]
    fn rejects_unrecognized_values() {
        assert!(parse_event_date("").is_none());
        assert!(parse_event_date("12/05/2019").is_none());
        assert!(parse_event_date("mayo 2019").is_none());
        assert!(parse_event_date("2019-13").is_none());
        assert!(parse_event_date("2019-02-30").is_none());
    }
}
