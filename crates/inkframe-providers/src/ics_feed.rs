//! The ICS-feed adapter.
//!
//! Fetches a published iCalendar feed (webcal-style subscription URL) over
//! plain GET. The feed body is cached on disk; no authentication.

use std::time::Duration;

use inkframe_core::{CalendarEvent, EventTime, TimeWindow};
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::FetchCache;
use crate::error::{ProviderError, ProviderResult};
use crate::ics::{IcsEvent, IcsTime, parse_ics};
use crate::source::{BoxFuture, CalendarSource, finalize_events};

/// Cache key for this adapter's wire payload.
const CACHE_KEY: &str = "ics";

/// Configuration for the ICS-feed adapter.
#[derive(Debug, Clone)]
pub struct IcsFeedConfig {
    /// The feed URL.
    pub url: Url,

    /// Request timeout.
    pub timeout: Duration,
}

impl IcsFeedConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given feed URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref())?;
        Ok(Self {
            url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// ICS-feed adapter.
pub struct IcsFeedSource {
    config: IcsFeedConfig,
    window: TimeWindow,
    max_results: usize,
    cache: FetchCache,
    ttl: Duration,
}

impl IcsFeedSource {
    /// Creates the adapter for one run.
    pub fn new(
        config: IcsFeedConfig,
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

    /// Returns the feed body, from cache when fresh, over HTTP otherwise.
    async fn feed_body(&self) -> ProviderResult<String> {
        if let Some(body) = self.cache.read_if_fresh::<String>(CACHE_KEY, self.ttl) {
            info!("serving calendar events from cache");
            return Ok(body);
        }

        debug!(url = %self.config.url, "cache stale or absent, fetching feed");
        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("failed to create HTTP client: {e}")))?;

        let response = client
            .get(self.config.url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::from(e).with_provider("ics"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::server(format!(
                "feed returned status {status}"
            ))
            .with_provider("ics"));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from(e).with_provider("ics"))?;

        self.cache.write(CACHE_KEY, &body)?;
        Ok(body)
    }
}

impl CalendarSource for IcsFeedSource {
    fn name(&self) -> &'static str {
        "ics"
    }

    fn get_calendar_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            let body = self.feed_body().await?;
            let parsed = parse_ics(&body).map_err(|e| e.with_provider("ics"))?;

            if parsed.is_empty() {
                info!("no upcoming events found");
            }

            let events: Vec<_> = parsed.iter().filter_map(normalize_event).collect();
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
