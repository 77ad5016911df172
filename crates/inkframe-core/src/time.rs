//! Time types for calendar events.
//!
//! [`EventTime`] represents an event boundary, which is either a plain
//! calendar date (all-day events) or a datetime carrying the offset the
//! backend reported. [`TimeWindow`] is the UTC query range providers are
//! asked to fill.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One boundary (start or end) of a calendar event.
///
/// Timed boundaries keep the UTC offset they arrived with so the formatter
/// can render the event in its own local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific point in time with a fixed UTC offset.
    At(DateTime<FixedOffset>),
    /// A whole calendar date, no time-of-day semantics.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a timed boundary from an offset-carrying datetime.
    pub fn at(dt: DateTime<FixedOffset>) -> Self {
        Self::At(dt)
    }

    /// Creates a timed boundary from a UTC datetime (offset +00:00).
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::At(dt.fixed_offset())
    }

    /// Creates an all-day boundary from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` for the all-day variant.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns `true` for the timed variant.
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Returns the datetime if this is a timed boundary.
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::At(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Returns the date if this is an all-day boundary.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::AllDay(d) => Some(d),
            Self::At(_) => None,
        }
    }

    /// The calendar date of this boundary, in the event's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::At(dt) => dt.date_naive(),
            Self::AllDay(d) => *d,
        }
    }

    /// Converts to UTC for comparisons. All-day boundaries compare at
    /// midnight UTC on their date.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::At(dt) => dt.with_timezone(&Utc),
            Self::AllDay(d) => d.and_hms_opt(0, 0, 0).expect("valid time").and_utc(),
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc().cmp(&other.to_utc())
    }
}

/// The half-open UTC interval `[start, end)` a provider is asked to
/// return events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// The window every fetch uses: from `now` to one year ahead.
    ///
    /// With `from_midnight` set, the start is rolled back to UTC midnight of
    /// the current day so events that already started today are included.
    /// This is the single shared window-start computation; the flag applies
    /// to every provider alike.
    pub fn upcoming_year(now: DateTime<Utc>, from_midnight: bool) -> Self {
        let start = if from_midnight {
            now.date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
                .and_utc()
        } else {
            now
        };
        Self::new(start, now + Duration::days(365))
    }

    /// Returns the duration of this window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks whether a UTC datetime falls inside `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks whether an event boundary falls inside the window.
    pub fn contains_event_time(&self, et: &EventTime) -> bool {
        self.contains(et.to_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_time {
        use super::*;

        #[test]
        fn timed_creation() {
            let dt = utc(2025, 6, 10, 14, 30, 0);
            let et = EventTime::from_utc(dt);
            assert!(et.is_timed());
            assert!(!et.is_all_day());
            assert_eq!(et.to_utc(), dt);
            assert_eq!(et.date(), date(2025, 6, 10));
        }

        #[test]
        fn all_day_creation() {
            let d = date(2025, 6, 10);
            let et = EventTime::from_date(d);
            assert!(et.is_all_day());
            assert_eq!(et.as_date(), Some(&d));
            assert_eq!(et.as_datetime(), None);
            assert_eq!(et.to_utc(), utc(2025, 6, 10, 0, 0, 0));
        }

        #[test]
        fn preserves_offset() {
            let dt = DateTime::parse_from_rfc3339("2025-06-10T09:00:00-05:00").unwrap();
            let et = EventTime::at(dt);
            // Local date, not the UTC date
            assert_eq!(et.date(), date(2025, 6, 10));
            assert_eq!(et.to_utc(), utc(2025, 6, 10, 14, 0, 0));
        }

        #[test]
        fn ordering_mixes_variants() {
            let midnight = EventTime::from_date(date(2025, 6, 10));
            let morning = EventTime::from_utc(utc(2025, 6, 10, 9, 0, 0));
            let evening = EventTime::from_utc(utc(2025, 6, 10, 19, 0, 0));

            assert!(midnight < morning);
            assert!(morning < evening);
        }

        #[test]
        fn serde_roundtrip() {
            let et = EventTime::from_utc(utc(2025, 6, 10, 14, 30, 0));
            let json = serde_json::to_string(&et).unwrap();
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(et, parsed);

            let et = EventTime::from_date(date(2025, 6, 10));
            let json = serde_json::to_string(&et).unwrap();
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(et, parsed);
        }
    }

    mod time_window {
        use super::*;

        #[test]
        fn contains_is_half_open() {
            let window = TimeWindow::new(utc(2025, 6, 10, 9, 0, 0), utc(2025, 6, 10, 17, 0, 0));

            assert!(window.contains(utc(2025, 6, 10, 9, 0, 0)));
            assert!(window.contains(utc(2025, 6, 10, 16, 59, 59)));
            assert!(!window.contains(utc(2025, 6, 10, 17, 0, 0)));
            assert!(!window.contains(utc(2025, 6, 10, 8, 59, 59)));
        }

        #[test]
        #[should_panic(expected = "start must be <= end")]
        fn rejects_inverted_window() {
            TimeWindow::new(utc(2025, 6, 11, 0, 0, 0), utc(2025, 6, 10, 0, 0, 0));
        }

        #[test]
        fn upcoming_year_from_now() {
            let now = utc(2025, 6, 10, 15, 45, 0);
            let window = TimeWindow::upcoming_year(now, false);
            assert_eq!(window.start, now);
            assert_eq!(window.end, utc(2026, 6, 10, 15, 45, 0));
        }

        #[test]
        fn upcoming_year_rolled_back_to_midnight() {
            let now = utc(2025, 6, 10, 15, 45, 0);
            let window = TimeWindow::upcoming_year(now, true);
            assert_eq!(window.start, utc(2025, 6, 10, 0, 0, 0));
            // End is still anchored to now, not to midnight
            assert_eq!(window.end, utc(2026, 6, 10, 15, 45, 0));
        }

        #[test]
        fn contains_event_time_uses_midnight_for_all_day() {
            let window = TimeWindow::new(utc(2025, 6, 10, 0, 0, 0), utc(2025, 6, 11, 0, 0, 0));
            assert!(window.contains_event_time(&EventTime::from_date(date(2025, 6, 10))));
            assert!(!window.contains_event_time(&EventTime::from_date(date(2025, 6, 11))));
        }
    }
}
