//! The Outlook adapter.

use std::time::Duration;

use chrono::{NaiveDateTime, TimeZone, Utc};
use inkframe_core::{CalendarEvent, EventTime, TimeWindow};
use tracing::{debug, info, warn};

use crate::cache::FetchCache;
use crate::error::ProviderResult;
use crate::source::{BoxFuture, CalendarSource, finalize_events};

use super::client::{GraphCalendarClient, GraphDateTime, GraphEvent};
use super::config::OutlookConfig;

/// Cache key for this adapter's wire payload.
const CACHE_KEY: &str = "outlook";

/// Graph timestamps carry fractional seconds and no offset.
const GRAPH_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Outlook adapter.
pub struct OutlookSource {
    config: OutlookConfig,
    window: TimeWindow,
    max_results: usize,
    cache: FetchCache,
    ttl: Duration,
}

impl OutlookSource {
    /// Creates the adapter for one run.
    pub fn new(
        config: OutlookConfig,
        window: TimeWindow,
        max_results: usize,
        cache: FetchCache,
        ttl: Duration,
    ) -> Self {
        Self {
            config,
            window,
            max_results,
            cache,
            ttl,
        }
    }

    /// Returns the wire events, from cache when fresh, from the Graph API
    /// otherwise.
    async fn wire_events(&self) -> ProviderResult<Vec<GraphEvent>> {
        if let Some(items) = self
            .cache
            .read_if_fresh::<Vec<GraphEvent>>(CACHE_KEY, self.ttl)
        {
            info!("serving calendar events from cache");
            return Ok(items);
        }

        debug!("cache stale or absent, calling the Graph API");
        let client = GraphCalendarClient::new(&self.config.access_token, self.config.timeout);
        let items = client
            .calendar_view(
                self.config.calendar_id.as_deref(),
                self.window.start,
                self.window.end,
                self.max_results,
            )
            .await
            .map_err(|e| e.with_provider("outlook"))?;

        self.cache.write(CACHE_KEY, &items)?;
        Ok(items)
    }
}

impl CalendarSource for OutlookSource {
    fn name(&self) -> &'static str {
        "outlook"
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

/// Parses a Graph timestamp as UTC (the Prefer header pins the view to
/// UTC, so the naive value needs no conversion).
fn parse_graph_time(t: &GraphDateTime) -> Option<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(&t.date_time, GRAPH_DATETIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Maps one wire event into the normalized model.
fn normalize_event(raw: &GraphEvent) -> Option<CalendarEvent> {
    if raw.is_cancelled {
        debug!(subject = ?raw.subject, "dropping cancelled event");
        return None;
    }

    let (Some(start_raw), Some(end_raw)) = (&raw.start, &raw.end) else {
        warn!(subject = ?raw.subject, "skipping event without start or end");
        return None;
    };

    let summary = raw
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("(No title)");

    let (Some(start), Some(end)) = (parse_graph_time(start_raw), parse_graph_time(end_raw)) else {
        warn!(subject = %summary, "skipping event with unusable start/end");
        return None;
    };

    if raw.is_all_day {
        // All-day events arrive as midnight-to-midnight timestamps with an
        // exclusive end day.
        let start_date = start.date_naive();
        let end_date = end.date_naive().pred_opt().unwrap_or(start_date);
        return Some(CalendarEvent::all_day(
            summary,
            EventTime::from_date(start_date),
            EventTime::from_date(end_date),
        ));
    }

    Some(CalendarEvent::timed(
        summary,
        EventTime::from_utc(start),
        EventTime::from_utc(end),
    ))
}
