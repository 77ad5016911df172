//! Human-readable date range formatting for display slots.
//!
//! Pure functions turning a `(start, end, all-day?)` triple into the string
//! shown next to an event on the display. All-day ranges print inclusive
//! dates; timed events on a single day print the date once and only repeat
//! the full form when the event crosses midnight.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::event::CalendarEvent;
use crate::time::EventTime;

/// Formats a datetime as an abbreviated display date, optionally with
/// time-of-day, e.g. `Jun 10` or `Jun 10, 2:30 PM`.
///
/// The datetime is rendered in its own offset, not converted to UTC.
pub fn formatted_date(dt: &DateTime<FixedOffset>, include_time: bool) -> String {
    if include_time {
        dt.format("%b %-d, %-I:%M %p").to_string()
    } else {
        dt.format("%b %-d").to_string()
    }
}

/// Formats a plain calendar date, e.g. `Jun 10`.
pub fn formatted_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Formats an event's start/end pair for display.
///
/// Rules, in order:
/// 1. All-day (or date-only) ranges: a single date when start and end are
///    the same inclusive date, otherwise `"{start} - {end}"`.
/// 2. Timed events within one calendar date: `"{date+time} - {end time}"`.
/// 3. Timed events spanning dates: both ends with full date and time.
///
/// A start/end pair mixing a date-only and a timed boundary is not produced
/// by any well-formed adapter; rather than guess, it formats as empty.
pub fn format_range(start: &EventTime, end: &EventTime, all_day_event: bool) -> String {
    if all_day_event || (start.is_all_day() && end.is_all_day()) {
        let start_day = formatted_day(start.date());
        let end_day = formatted_day(end.date());
        if start.date() == end.date() {
            return start_day;
        }
        return format!("{start_day} - {end_day}");
    }

    match (start, end) {
        (EventTime::At(start_dt), EventTime::At(end_dt)) => {
            if start_dt.date_naive() == end_dt.date_naive() {
                let start_formatted = formatted_date(start_dt, true);
                let end_formatted = end_dt.format("%-I:%M %p").to_string();
                format!("{start_formatted} - {end_formatted}")
            } else {
                format!(
                    "{} - {}",
                    formatted_date(start_dt, true),
                    formatted_date(end_dt, true)
                )
            }
        }
        _ => String::new(),
    }
}

/// Convenience wrapper formatting a whole [`CalendarEvent`].
pub fn format_event(event: &CalendarEvent) -> String {
    format_range(&event.start, &event.end, event.all_day_event)
}
