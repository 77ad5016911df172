//! The CalDAV adapter.

use std::time::Duration;

use inkframe_core::{CalendarEvent, EventTime, TimeWindow};
use tracing::{debug, info, warn};

use crate::cache::FetchCache;
use crate::error::ProviderResult;
use crate::ics::{IcsEvent, IcsTime, parse_ics};
use crate::source::{BoxFuture, CalendarSource, finalize_events};

use super::client::CaldavClient;
use super::config::CaldavConfig;
use super::xml::{calendar_query_body, parse_calendar_data};

/// Cache key for this adapter's wire payload.
const CACHE_KEY: &str = "caldav";

/// CalDAV adapter.
///
/// One calendar-query REPORT per run, cached on disk as the list of raw
/// ICS payloads the server returned.
pub struct CaldavSource {
    config: CaldavConfig,
    window: TimeWindow,
    max_results: usize,
    cache: FetchCache,
    ttl: Duration,
}

impl CaldavSource {
    /// Creates the adapter for one run.
    pub fn new(
        config: CaldavConfig,
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

    /// Returns the raw ICS payloads, from cache when fresh, from the
    /// server otherwise.
    async fn wire_payloads(&self) -> ProviderResult<Vec<String>> {
        if let Some(payloads) = self.cache.read_if_fresh::<Vec<String>>(CACHE_KEY, self.ttl) {
            info!("serving calendar events from cache");
            return Ok(payloads);
        }

        debug!("cache stale or absent, issuing REPORT");
        let client = CaldavClient::new(self.config.clone())?;
        let body = calendar_query_body(self.window.start, self.window.end);
        let response = client
            .report(&body)
            .await
            .map_err(|e| e.with_provider("caldav"))?;

        let payloads = parse_calendar_data(&response);
        self.cache.write(CACHE_KEY, &payloads)?;
        Ok(payloads)
    }
}

impl CalendarSource for CaldavSource {
    fn name(&self) -> &'static str {
        "caldav"
    }

    fn get_calendar_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            let payloads = self.wire_payloads().await?;

            let mut events = Vec::new();
            for payload in &payloads {
                match parse_ics(payload) {
                    Ok(parsed) => events.extend(parsed.iter().filter_map(normalize_event)),
                    Err(err) => {
                        // One broken payload must not sink the schedule.
                        warn!(error = %err, "skipping unparsable ICS payload");
                    }
                }
            }

            if events.is_empty() {
                info!("no upcoming events found");
            }

            Ok(finalize_events(events, &self.window, self.max_results))
        })
    }
}

/// Maps one parsed VEVENT into the normalized model.
fn normalize_event(raw: &IcsEvent) -> Option<CalendarEvent> {
    if raw.cancelled {
        debug!(uid = %raw.uid, "dropping cancelled event");
        return None;
    }

    let summary = raw
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("(No title)");

    match (raw.start, raw.end) {
        (IcsTime::Utc(start), Some(IcsTime::Utc(end))) => Some(CalendarEvent::timed(
            summary,
            EventTime::from_utc(start),
            EventTime::from_utc(end),
        )),
        (IcsTime::Utc(start), None) => Some(CalendarEvent::timed(
            summary,
            EventTime::from_utc(start),
            EventTime::from_utc(start),
        )),
        (IcsTime::Date(start), Some(IcsTime::Date(end))) => {
            // DTEND of an all-day VEVENT is exclusive; make it inclusive.
            let end = end.pred_opt().unwrap_or(start);
            Some(CalendarEvent::all_day(
                summary,
                EventTime::from_date(start),
                EventTime::from_date(end),
            ))
        }
        (IcsTime::Date(start), None) => Some(CalendarEvent::all_day(
            summary,
            EventTime::from_date(start),
            EventTime::from_date(start),
        )),
        _ => {
            warn!(uid = %raw.uid, "skipping event with mismatched start/end kinds");
            None
        }
    }
}
