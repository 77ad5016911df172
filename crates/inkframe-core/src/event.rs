//! The normalized calendar event model.
//!
//! Every backend adapter maps its wire representation into
//! [`CalendarEvent`] before anything downstream (formatter, slot assembler)
//! sees it. Events are created fresh per fetch and never mutated.

use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// A backend-agnostic calendar event.
///
/// Invariant: `start <= end`. Backends that report date-only ends
/// exclusively (the day after the last occupied day) must subtract one day
/// in their own adapter before constructing this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Display text for the event title.
    pub summary: String,
    /// When the event starts.
    pub start: EventTime,
    /// When the event ends (inclusive for all-day events).
    pub end: EventTime,
    /// True iff the event occupies whole days with no time-of-day.
    pub all_day_event: bool,
}

impl CalendarEvent {
    /// Creates a timed event.
    pub fn timed(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            all_day_event: false,
        }
    }

    /// Creates an all-day event with inclusive start/end dates.
    pub fn all_day(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            all_day_event: true,
        }
    }

    /// Returns `true` if start and end fall on different calendar dates.
    pub fn is_multi_day(&self) -> bool {
        self.start.date() != self.end.date()
    }
}

/// Sorts events chronologically by start, as adapters must return them.
pub fn sort_chronologically(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| a.start.cmp(&b.start));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn at(h: u32) -> EventTime {
        EventTime::from_utc(Utc.with_ymd_and_hms(2025, 6, 10, h, 0, 0).unwrap())
    }

    fn day(d: u32) -> EventTime {
        EventTime::from_date(NaiveDate::from_ymd_opt(2025, 6, d).unwrap())
    }

    #[test]
    fn timed_event() {
        let event = CalendarEvent::timed("Standup", at(9), at(10));
        assert_eq!(event.summary, "Standup");
        assert!(!event.all_day_event);
        assert!(!event.is_multi_day());
    }

    #[test]
    fn all_day_span() {
        let event = CalendarEvent::all_day("Offsite", day(10), day(12));
        assert!(event.all_day_event);
        assert!(event.is_multi_day());
    }

    #[test]
    fn sort_orders_by_start() {
        let mut events = vec![
            CalendarEvent::timed("later", at(15), at(16)),
            CalendarEvent::all_day("all day", day(10), day(10)),
            CalendarEvent::timed("earlier", at(9), at(10)),
        ];
        sort_chronologically(&mut events);

        let titles: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        // The all-day event compares at midnight, ahead of both timed ones
        assert_eq!(titles, vec!["all day", "earlier", "later"]);
    }
}
