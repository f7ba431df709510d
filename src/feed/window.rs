//! Rolling relevance window
//!
//! The dashboard only shows meetings in the next 7 calendar days. The same
//! window is applied twice (once when the feed is fetched, once for the
//! calendar view), so both call sites go through this module and cannot drift.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use super::types::Meeting;

/// Length of the rolling relevance window in days
pub const RELEVANCE_WINDOW_DAYS: i64 = 7;

/// Closed interval `[start, start + 7 days]`
///
/// Both bounds are inclusive: a meeting dated exactly `now` or exactly
/// `now + 7 days` is in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl RelevanceWindow {
    /// Window beginning at the given instant
    pub fn starting(now: DateTime<Utc>) -> Self {
        Self {
            start: now,
            end: now + Duration::days(RELEVANCE_WINDOW_DAYS),
        }
    }

    /// Whether an instant falls inside the window (bounds inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Whether a meeting's date falls inside the window
    ///
    /// A malformed date compares false against both bounds and is excluded.
    pub fn contains_meeting(&self, meeting: &Meeting) -> bool {
        parse_meeting_date(&meeting.date)
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }
}

/// Parse a feed-supplied date string
///
/// The feed gives no timezone normalization guarantee, so parsing is lenient:
/// RFC 3339 first, then a bare datetime, then a bare date (taken as midnight
/// UTC). Returns `None` for anything unparseable.
pub fn parse_meeting_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = RelevanceWindow::starting(now());

        assert!(window.contains(now()));
        assert!(window.contains(now() + Duration::days(RELEVANCE_WINDOW_DAYS)));
        assert!(window.contains(now() + Duration::days(3)));
    }

    #[test]
    fn test_window_excludes_past_and_beyond() {
        let window = RelevanceWindow::starting(now());

        assert!(!window.contains(now() - Duration::seconds(1)));
        assert!(!window.contains(
            now() + Duration::days(RELEVANCE_WINDOW_DAYS) + Duration::seconds(1)
        ));
        assert!(!window.contains(now() + Duration::days(10)));
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_meeting_date("2025-06-03T18:30:00-04:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 22, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_datetime() {
        let parsed = parse_meeting_date("2025-06-03T18:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let parsed = parse_meeting_date("2025-06-03").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_malformed_dates_are_none() {
        assert!(parse_meeting_date("").is_none());
        assert!(parse_meeting_date("next tuesday").is_none());
        assert!(parse_meeting_date("2025-13-45").is_none());
        assert!(parse_meeting_date("06/03/2025").is_none());
    }

    #[test]
    fn test_malformed_meeting_date_never_in_window() {
        let meeting: Meeting =
            serde_json::from_str(r#"{"id": 1, "date": "TBD", "matchType": "mentioned"}"#).unwrap();

        // Excluded no matter where the window sits
        for offset in [-30, 0, 30] {
            let window = RelevanceWindow::starting(now() + Duration::days(offset));
            assert!(!window.contains_meeting(&meeting));
        }
    }
}
