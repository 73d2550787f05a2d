//! Timestamp handling for provider data.
//!
//! The provider reports times as ISO-8601 strings with a UTC offset
//! (e.g. "2025-11-29T08:00:00+01:00"). Unparseable or missing values are
//! treated as absent rather than as errors, so a single bad field only ever
//! disqualifies the record it belongs to.

use chrono::{DateTime, FixedOffset};

/// A point in time with the offset the provider reported it in.
pub type Timestamp = DateTime<FixedOffset>;

/// Parse an optional ISO-8601 timestamp, returning `None` on any failure.
///
/// # Examples
///
/// ```
/// use regio_server::domain::parse_timestamp;
///
/// assert!(parse_timestamp(Some("2025-11-29T08:00:00+01:00")).is_some());
/// assert!(parse_timestamp(Some("08:00")).is_none());
/// assert!(parse_timestamp(Some("")).is_none());
/// assert!(parse_timestamp(None).is_none());
/// ```
pub fn parse_timestamp(s: Option<&str>) -> Option<Timestamp> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

/// Whole minutes from `from` to `to`, rounded towards negative infinity.
///
/// Partial minutes are dropped for positive spans; a span of -30 seconds
/// counts as -1 minute.
pub fn floor_minutes_between(from: Timestamp, to: Timestamp) -> i64 {
    to.signed_duration_since(from).num_seconds().div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(Some(s)).unwrap()
    }

    #[test]
    fn parses_offsets() {
        let t = ts("2025-11-29T08:00:00+01:00");
        assert_eq!(t.offset().local_minus_utc(), 3600);
        assert_eq!(t.to_rfc3339(), "2025-11-29T08:00:00+01:00");
    }

    #[test]
    fn parses_utc_designator() {
        assert!(parse_timestamp(Some("2025-11-29T07:00:00Z")).is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp(Some("not a time")).is_none());
        assert!(parse_timestamp(Some("2025-13-01T00:00:00+01:00")).is_none());
        assert!(parse_timestamp(Some("   ")).is_none());
    }

    #[test]
    fn minutes_floor_positive() {
        let dep = ts("2025-11-29T08:00:00+01:00");
        assert_eq!(floor_minutes_between(dep, ts("2025-11-29T09:30:00+01:00")), 90);
        assert_eq!(floor_minutes_between(dep, ts("2025-11-29T08:00:59+01:00")), 0);
        assert_eq!(floor_minutes_between(dep, ts("2025-11-29T08:01:59+01:00")), 1);
    }

    #[test]
    fn minutes_floor_negative() {
        let dep = ts("2025-11-29T08:00:00+01:00");
        assert_eq!(floor_minutes_between(dep, ts("2025-11-29T07:59:30+01:00")), -1);
    }

    #[test]
    fn minutes_across_offsets() {
        // 08:00 CET is 07:00 UTC
        let dep = ts("2025-11-29T08:00:00+01:00");
        let arr = ts("2025-11-29T07:45:00Z");
        assert_eq!(floor_minutes_between(dep, arr), 45);
    }

    #[test]
    fn minutes_across_midnight() {
        let dep = ts("2025-11-29T23:40:00+01:00");
        let arr = ts("2025-11-30T00:25:00+01:00");
        assert_eq!(floor_minutes_between(dep, arr), 45);
    }
}
