//! Application configuration, read from the environment.
//!
//! One backend runs per invocation; which one is decided by which settings
//! are present, Outlook winning over CalDAV over an ICS feed, with Google
//! as the fallback (see [`crate::pipeline::select_source`]).

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use inkframe_core::{DEFAULT_SLOT_COUNT, TimeWindow};

use crate::error::{AppError, AppResult};

/// The rendered SVG. The original template carries the placeholder labels;
/// after the first run the file is both input and output, so placeholders
/// that were already substituted simply no longer match.
const DEFAULT_SVG_FILENAME: &str = "screen-output-weather.svg";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google calendar to fetch, "primary" by default.
    pub google_calendar_id: String,

    /// Outlook calendar; setting this selects the Outlook backend.
    pub outlook_calendar_id: Option<String>,

    /// Graph API bearer token, required when the Outlook backend is
    /// selected.
    pub outlook_access_token: Option<String>,

    /// CalDAV collection URL; setting this selects the CalDAV backend.
    pub caldav_url: Option<String>,

    /// CalDAV username.
    pub caldav_username: Option<String>,

    /// CalDAV password.
    pub caldav_password: Option<String>,

    /// CalDAV collection name under the base URL.
    pub caldav_calendar_id: Option<String>,

    /// ICS feed URL; setting this selects the feed backend.
    pub ics_url: Option<String>,

    /// How long cached wire payloads stay fresh.
    pub cache_ttl: Duration,

    /// Directory holding the cache files.
    pub cache_dir: PathBuf,

    /// Start today's window at UTC midnight instead of now, so events
    /// earlier today stay on the display.
    pub include_past_events_for_today: bool,

    /// How many events to fetch and show. The SVG template has one slot
    /// pair per event, so raising this needs a matching template change.
    pub max_event_results: usize,

    /// SVG template read for placeholders.
    pub svg_template: PathBuf,

    /// Where the substituted SVG is written.
    pub svg_output: PathBuf,
}

impl Config {
    /// Default cache TTL in seconds.
    pub const DEFAULT_TTL_SECS: u64 = 3600;

    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through the given lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let cache_ttl = match lookup("CALENDAR_TTL") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AppError::config(format!("CALENDAR_TTL is not a number of seconds: {raw:?}"))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(Self::DEFAULT_TTL_SECS),
        };

        Ok(Self {
            google_calendar_id: lookup("GOOGLE_CALENDAR_ID")
                .unwrap_or_else(|| "primary".to_string()),
            outlook_calendar_id: lookup("OUTLOOK_CALENDAR_ID"),
            outlook_access_token: lookup("OUTLOOK_ACCESS_TOKEN"),
            caldav_url: lookup("CALDAV_CALENDAR_URL"),
            caldav_username: lookup("CALDAV_USERNAME"),
            caldav_password: lookup("CALDAV_PASSWORD"),
            caldav_calendar_id: lookup("CALDAV_CALENDAR_ID"),
            ics_url: lookup("ICS_CALENDAR_URL"),
            cache_ttl,
            cache_dir: lookup("CALENDAR_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            include_past_events_for_today: lookup("CALENDAR_INCLUDE_PAST_EVENTS_FOR_TODAY")
                .as_deref()
                == Some("1"),
            max_event_results: DEFAULT_SLOT_COUNT,
            svg_template: lookup("CALENDAR_SVG_TEMPLATE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SVG_FILENAME)),
            svg_output: lookup("CALENDAR_SVG_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SVG_FILENAME)),
        })
    }

    /// The fetch window for a run starting at `now`: up to a year ahead,
    /// rolled back to UTC midnight when past events for today are kept.
    pub fn time_window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::upcoming_year(now, self.include_past_events_for_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn defaults_with_empty_environment() {
        let map = HashMap::new();
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        assert_eq!(config.google_calendar_id, "primary");
        assert_eq!(config.outlook_calendar_id, None);
        assert_eq!(config.caldav_url, None);
        assert_eq!(config.ics_url, None);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_dir, PathBuf::from("."));
        assert!(!config.include_past_events_for_today);
        assert_eq!(config.max_event_results, 10);
        assert_eq!(
            config.svg_template,
            PathBuf::from("screen-output-weather.svg")
        );
        assert_eq!(config.svg_template, config.svg_output);
    }

    #[test]
    fn reads_backend_settings() {
        let map = HashMap::from([
            ("CALDAV_CALENDAR_URL", "https://dav.example.com/cal/"),
            ("CALDAV_USERNAME", "user"),
            ("CALDAV_PASSWORD", "pass"),
            ("CALDAV_CALENDAR_ID", "work"),
            ("CALENDAR_TTL", "600"),
        ]);
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        assert_eq!(
            config.caldav_url,
            Some("https://dav.example.com/cal/".to_string())
        );
        assert_eq!(config.caldav_calendar_id, Some("work".to_string()));
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn invalid_ttl_is_a_config_error() {
        let map = HashMap::from([("CALENDAR_TTL", "an hour")]);
        let err = Config::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn include_past_flag_requires_exactly_one() {
        let on = HashMap::from([("CALENDAR_INCLUDE_PAST_EVENTS_FOR_TODAY", "1")]);
        let off = HashMap::from([("CALENDAR_INCLUDE_PAST_EVENTS_FOR_TODAY", "true")]);

        assert!(
            Config::from_lookup(lookup_from(&on))
                .unwrap()
                .include_past_events_for_today
        );
        assert!(
            !Config::from_lookup(lookup_from(&off))
                .unwrap()
                .include_past_events_for_today
        );
    }

    #[test]
    fn window_rolls_back_to_midnight_with_flag() {
        let map = HashMap::from([("CALENDAR_INCLUDE_PAST_EVENTS_FOR_TODAY", "1")]);
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 10, 15, 30, 0).unwrap();
        let window = config.time_window(now);

        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(window.end, now + chrono::Duration::days(365));
    }

    #[test]
    fn window_starts_now_without_flag() {
        let map = HashMap::new();
        let config = Config::from_lookup(lookup_from(&map)).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 10, 15, 30, 0).unwrap();
        let window = config.time_window(now);

        assert_eq!(window.start, now);
    }
}
