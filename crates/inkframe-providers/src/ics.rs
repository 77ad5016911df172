//! iCalendar (RFC 5545) wire parsing.
//!
//! Shared by the CalDAV and ICS-feed adapters, both of which receive ICS
//! payloads. This module only parses the wire format into [`IcsEvent`];
//! normalization into the display event model (inclusive all-day ends and
//! the like) is each adapter's own job.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike};
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};

/// A start or end as it appears on the ICS wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcsTime {
    /// `VALUE=DATE` — a date-only boundary. For `DTEND` this is exclusive
    /// per RFC 5545.
    Date(NaiveDate),
    /// A datetime, resolved to UTC. Floating and TZID-qualified times are
    /// taken as UTC; the feeds this runs against emit UTC stamps.
    Utc(DateTime<Utc>),
}

impl IcsTime {
    /// Returns `true` for date-only boundaries.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// One VEVENT, as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEvent {
    /// The event UID.
    pub uid: String,
    /// SUMMARY, if present.
    pub summary: Option<String>,
    /// DTSTART.
    pub start: IcsTime,
    /// DTEND; absent means the event has no extent beyond its start.
    pub end: Option<IcsTime>,
    /// STATUS was CANCELLED.
    pub cancelled: bool,
}

/// Parses an ICS document and extracts its VEVENTs.
///
/// Individual events missing required fields are skipped with a warning;
/// a document that is not ICS at all is an invalid-response error.
pub fn parse_ics(ics: &str) -> ProviderResult<Vec<IcsEvent>> {
    let calendar: Calendar = ics
        .parse()
        .map_err(|e: String| ProviderError::invalid_response(format!("unparsable ICS: {e}")))?;

    Ok(calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => parse_event(event),
            _ => None,
        })
        .collect())
}

/// Parses a single VEVENT, returning `None` (with a warning) when the
/// event lacks a UID or start.
fn parse_event(event: &Event) -> Option<IcsEvent> {
    let Some(uid) = event.get_uid() else {
        warn!("skipping VEVENT without UID");
        return None;
    };
    let Some(start) = event.get_start() else {
        warn!(uid = %uid, "skipping VEVENT without DTSTART");
        return None;
    };

    let start = convert_time(start);
    let end = event.get_end().map(convert_time);

    let cancelled = event
        .get_status()
        .is_some_and(|s| matches!(s, icalendar::EventStatus::Cancelled));

    let parsed = IcsEvent {
        uid: uid.to_string(),
        summary: event.get_summary().map(str::to_string),
        start,
        end,
        cancelled,
    };

    debug!(uid = %parsed.uid, summary = ?parsed.summary, "parsed VEVENT");
    Some(parsed)
}

fn convert_time(dt: DatePerhapsTime) -> IcsTime {
    match dt {
        DatePerhapsTime::Date(date) => IcsTime::Date(date),
        DatePerhapsTime::DateTime(cdt) => {
            let utc = match cdt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => Utc.from_utc_datetime(&naive),
                CalendarDateTime::WithTimezone { date_time, tzid: _ } => {
                    Utc.from_utc_datetime(&date_time)
                }
            };
            IcsTime::Utc(utc)
        }
    }
}
