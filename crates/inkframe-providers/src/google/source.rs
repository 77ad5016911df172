//! The Google Calendar adapter.
//!
//! Wire fetches go through the durable [`FetchCache`]: a fresh entry is
//! served as-is, a miss calls the API (refreshing credentials first) and
//! overwrites the entry. Normalization of wire events into
//! [`CalendarEvent`]s happens here, including turning Google's exclusive
//! all-day end dates into inclusive ones.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate};
use inkframe_core::{CalendarEvent, EventTime, TimeWindow};
use tracing::{debug, info, warn};

use crate::cache::FetchCache;
use crate::error::ProviderResult;
use crate::source::{BoxFuture, CalendarSource, finalize_events};

use super::auth::CredentialStore;
use super::client::{GoogleCalendarClient, GoogleEvent, GoogleEventTime};
use super::config::GoogleConfig;

/// Cache key for this adapter's wire payload.
const CACHE_KEY: &str = "google";

/// Google Calendar adapter.
pub struct GoogleSource {
    config: GoogleConfig,
    window: TimeWindow,
    max_results: usize,
    credentials: CredentialStore,
    cache: FetchCache,
    ttl: Duration,
}

impl GoogleSource {
    /// Creates the adapter for one run.
    pub fn new(
        config: GoogleConfig,
        window: TimeWindow,
        max_results: usize,
        cache: FetchCache,
        ttl: Duration,
    ) -> Self {
        let credentials = CredentialStore::new(&config.credentials_path, config.timeout);
        Self {
            config,
            window,
            max_results,
            credentials,
            cache,
            ttl,
        }
    }

    /// Returns the wire events, from cache when fresh, from the API
    /// otherwise (overwriting the cache on success).
    async fn wire_events(&self) -> ProviderResult<Vec<GoogleEvent>> {
        if let Some(items) = self
            .cache
            .read_if_fresh::<Vec<GoogleEvent>>(CACHE_KEY, self.ttl)
        {
            info!("serving calendar events from cache");
            return Ok(items);
        }

        debug!("cache stale or absent, calling the Calendar API");
        let token = self.credentials.get_valid_credentials().await?;
        let client = GoogleCalendarClient::new(token, self.config.timeout);
        let items = client
            .list_events(
                &self.config.calendar_id,
                self.window.start,
                self.window.end,
                self.max_results,
            )
            .await
            .map_err(|e| e.with_provider("google"))?;

        self.cache.write(CACHE_KEY, &items)?;
        Ok(items)
    }
}

impl CalendarSource for GoogleSource {
    fn name(&self) -> &'static str {
        "google"
    }

    fn get_calendar_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            let items = self.wire_events().await?;
            if items.is_empty() {
                info!("no upcoming events found");
            }

            let events: Vec<_> = items.iter().filter_map(normalize_event).collect();
            Ok(finalize_events(events, &self.window, self.max_results))
        })
    }
}

enum WireTime {
    Timed(DateTime<FixedOffset>),
    Day(NaiveDate),
}

fn parse_wire_time(t: &GoogleEventTime) -> Option<WireTime> {
    if let Some(ref dt) = t.date_time {
        return DateTime::parse_from_rfc3339(dt).ok().map(WireTime::Timed);
    }
    if let Some(ref d) = t.date {
        return NaiveDate::parse_from_str(d, "%Y-%m-%d").ok().map(WireTime::Day);
    }
    None
}

/// Maps one wire event into the normalized model.
///
/// Cancelled events and events the API sent in a shape we cannot use are
/// dropped; a single bad event must not suppress the rest of the schedule.
fn normalize_event(raw: &GoogleEvent) -> Option<CalendarEvent> {
    if raw.is_cancelled() {
        debug!(summary = ?raw.summary, "dropping cancelled event");
        return None;
    }

    let (Some(start_raw), Some(end_raw)) = (&raw.start, &raw.end) else {
        warn!(summary = ?raw.summary, "skipping event without start or end");
        return None;
    };

    let summary = raw
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("(No title)");

    match (parse_wire_time(start_raw), parse_wire_time(end_raw)) {
        (Some(WireTime::Timed(start)), Some(WireTime::Timed(end))) => Some(CalendarEvent::timed(
            summary,
            EventTime::at(start),
            EventTime::at(end),
        )),
        (Some(WireTime::Day(start)), Some(WireTime::Day(end))) => {
            // Google reports the end of an all-day event as the day after
            // the last occupied day; make it inclusive.
            let end = end.pred_opt().unwrap_or(start);
            Some(CalendarEvent::all_day(
                summary,
                EventTime::from_date(start),
                EventTime::from_date(end),
            ))
        }
        _ => {
            warn!(summary = %summary, "skipping event with unusable start/end");
            None
        }
    }
}
