//! Google Calendar API v3 client.
//!
//! A thin HTTP wrapper around `events.list`: builds the windowed,
//! recurrence-expanded, start-ordered query and returns the wire events.
//! The wire structs serialize losslessly so the adapter can cache them.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Base URL for the Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Start or end of a wire event: either `dateTime` (RFC3339 with offset)
/// or `date` (all-day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleEventTime {
    /// RFC3339 datetime for timed events.
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// `YYYY-MM-DD` for all-day events. The `end.date` of an all-day event
    /// is the day *after* the last occupied day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One event as returned by `events.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleEvent {
    /// Event title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Event start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GoogleEventTime>,
    /// Event end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GoogleEventTime>,
    /// "confirmed", "tentative", or "cancelled".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl GoogleEvent {
    /// Returns `true` if the event is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

/// HTTP client for the Calendar API.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    access_token: String,
}

impl GoogleCalendarClient {
    /// Creates a client presenting the given bearer token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Lists events in `[time_min, time_max)`, recurring events expanded,
    /// ordered by start, capped at `max_results`.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: usize,
    ) -> ProviderResult<Vec<GoogleEvent>> {
        let url = format!("{CALENDAR_API_BASE}/calendars/{calendar_id}/events");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                (
                    "timeMin",
                    time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "timeMax",
                    time_max.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("maxResults", max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::authentication(format!(
                "calendar API rejected credentials with status {status}"
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::server(format!(
                "calendar API returned status {status}"
            )));
        }

        let body: EventsResponse = response.json().await?;
        debug!(count = body.items.len(), calendar = %calendar_id, "fetched events");
        Ok(body.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_timed_event() {
        let json = r#"{
            "summary": "Team Meeting",
            "status": "confirmed",
            "start": { "dateTime": "2025-06-10T10:00:00-05:00" },
            "end": { "dateTime": "2025-06-10T11:00:00-05:00" }
        }"#;

        let event: GoogleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.summary, Some("Team Meeting".to_string()));
        assert!(!event.is_cancelled());
        assert_eq!(
            event.start.unwrap().date_time,
            Some("2025-06-10T10:00:00-05:00".to_string())
        );
    }

    #[test]
    fn deserializes_all_day_event() {
        let json = r#"{
            "summary": "Holiday",
            "start": { "date": "2025-01-01" },
            "end": { "date": "2025-01-04" }
        }"#;

        let event: GoogleEvent = serde_json::from_str(json).unwrap();
        let start = event.start.unwrap();
        assert_eq!(start.date, Some("2025-01-01".to_string()));
        assert_eq!(start.date_time, None);
    }

    #[test]
    fn cancelled_status_detection() {
        let event = GoogleEvent {
            summary: None,
            start: None,
            end: None,
            status: Some("cancelled".to_string()),
        };
        assert!(event.is_cancelled());
    }

    #[test]
    fn wire_roundtrip_for_caching() {
        let json = r#"{"summary":"x","start":{"date":"2025-01-01"},"end":{"date":"2025-01-02"}}"#;
        let event: GoogleEvent = serde_json::from_str(json).unwrap();
        let re = serde_json::to_string(&event).unwrap();
        let back: GoogleEvent = serde_json::from_str(&re).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn response_without_items_is_empty() {
        let body: EventsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.items.is_empty());
    }
}
