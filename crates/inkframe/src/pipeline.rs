//! The fetch-format-render pipeline.
//!
//! One backend runs per invocation. Backend selection is by configuration
//! presence, in priority order: Outlook, then CalDAV, then an ICS feed,
//! with Google as the fallback. A provider failure aborts the run and
//! leaves the previous SVG on disk untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use inkframe_core::{SlotSet, TimeWindow};
use inkframe_providers::caldav::{CaldavConfig, CaldavSource};
use inkframe_providers::google::{GoogleConfig, GoogleSource};
use inkframe_providers::ics_feed::{IcsFeedConfig, IcsFeedSource};
use inkframe_providers::outlook::{OutlookConfig, OutlookSource};
use inkframe_providers::{CalendarSource, FetchCache};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::svg::render_template;

/// Picks the backend for this run.
pub fn select_source(config: &Config, window: TimeWindow) -> AppResult<Box<dyn CalendarSource>> {
    let cache = FetchCache::new(&config.cache_dir);

    if let Some(ref calendar_id) = config.outlook_calendar_id {
        let token = config.outlook_access_token.as_ref().ok_or_else(|| {
            AppError::config("OUTLOOK_CALENDAR_ID is set but OUTLOOK_ACCESS_TOKEN is not")
        })?;
        info!("fetching Outlook calendar events");
        let outlook = OutlookConfig::new(token).with_calendar_id(calendar_id);
        return Ok(Box::new(OutlookSource::new(
            outlook,
            window,
            config.max_event_results,
            cache,
            config.cache_ttl,
        )));
    }

    if let Some(ref url) = config.caldav_url {
        info!("fetching CalDAV calendar events");
        let mut caldav = CaldavConfig::new(url)
            .map_err(|e| AppError::config(format!("invalid CALDAV_CALENDAR_URL: {e}")))?;
        if let (Some(username), Some(password)) =
            (&config.caldav_username, &config.caldav_password)
        {
            caldav = caldav.with_credentials(username, password);
        }
        if let Some(ref calendar_id) = config.caldav_calendar_id {
            caldav = caldav.with_calendar_id(calendar_id);
        }
        return Ok(Box::new(CaldavSource::new(
            caldav,
            window,
            config.max_event_results,
            cache,
            config.cache_ttl,
        )));
    }

    if let Some(ref url) = config.ics_url {
        info!("fetching ICS feed calendar events");
        let feed = IcsFeedConfig::new(url)
            .map_err(|e| AppError::config(format!("invalid ICS_CALENDAR_URL: {e}")))?;
        return Ok(Box::new(IcsFeedSource::new(
            feed,
            window,
            config.max_event_results,
            cache,
            config.cache_ttl,
        )));
    }

    info!("fetching Google calendar events");
    let google = GoogleConfig::new().with_calendar_id(&config.google_calendar_id);
    Ok(Box::new(GoogleSource::new(
        google,
        window,
        config.max_event_results,
        cache,
        config.cache_ttl,
    )))
}

/// Fetches events from the backend and lays them into the fixed slot map.
pub async fn collect_template_values(
    source: &dyn CalendarSource,
    slot_count: usize,
) -> AppResult<BTreeMap<String, String>> {
    let events = source.get_calendar_events().await?;
    debug!(source = source.name(), count = events.len(), "fetched events");

    let slots = SlotSet::assemble(&events, slot_count);
    Ok(slots.template_values())
}

/// One full run: select a backend, fetch, assemble slots, render the SVG.
pub async fn run(config: &Config, now: DateTime<Utc>) -> AppResult<()> {
    let window = config.time_window(now);
    let source = select_source(config, window)?;

    let values = collect_template_values(source.as_ref(), config.max_event_results).await?;

    info!("updating SVG");
    render_template(&config.svg_template, &config.svg_output, &values)?;
    Ok(())
}
