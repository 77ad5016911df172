//! Microsoft Graph calendar client.
//!
//! Wraps the `calendarView` endpoint, which expands recurring events over
//! an explicit window. The `Prefer: outlook.timezone="UTC"` header pins
//! wire timestamps to UTC regardless of mailbox settings.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Base URL for the Graph API.
const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// A Graph datetime: a naive timestamp plus the timezone it is stated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDateTime {
    /// `2025-06-10T14:30:00.0000000` style naive timestamp.
    #[serde(rename = "dateTime")]
    pub date_time: String,
    /// Timezone the timestamp is stated in, "UTC" with our Prefer header.
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// One event as returned by `calendarView`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEvent {
    /// Event title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Whether this is an all-day event.
    #[serde(rename = "isAllDay", default)]
    pub is_all_day: bool,
    /// Whether the event has been cancelled.
    #[serde(rename = "isCancelled", default)]
    pub is_cancelled: bool,
    /// Event start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GraphDateTime>,
    /// Event end. All-day events end at midnight of the day after the
    /// last occupied day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GraphDateTime>,
}

#[derive(Debug, Deserialize)]
struct CalendarViewResponse {
    #[serde(default)]
    value: Vec<GraphEvent>,
}

/// HTTP client for the Graph calendar endpoints.
#[derive(Debug)]
pub struct GraphCalendarClient {
    http: reqwest::Client,
    access_token: String,
}

impl GraphCalendarClient {
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

    /// Lists the calendar view in `[start, end)`, ordered by start, capped
    /// at `max_results`. `calendar_id` of `None` reads the default
    /// calendar.
    pub async fn calendar_view(
        &self,
        calendar_id: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> ProviderResult<Vec<GraphEvent>> {
        let url = match calendar_id {
            Some(id) => format!("{GRAPH_API_BASE}/me/calendars/{id}/calendarView"),
            None => format!("{GRAPH_API_BASE}/me/calendarView"),
        };

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Prefer", "outlook.timezone=\"UTC\"")
            .query(&[
                (
                    "startDateTime",
                    start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "endDateTime",
                    end.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("$top", max_results.to_string()),
                ("$orderby", "start/dateTime".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::authentication(format!(
                "Graph API rejected credentials with status {status}"
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::server(format!(
                "Graph API returned status {status}"
            )));
        }

        let body: CalendarViewResponse = response.json().await?;
        debug!(count = body.value.len(), "fetched calendar view");
        Ok(body.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_timed_event() {
        let json = r#"{
            "subject": "Design review",
            "isAllDay": false,
            "start": { "dateTime": "2025-06-10T14:30:00.0000000", "timeZone": "UTC" },
            "end": { "dateTime": "2025-06-10T15:00:00.0000000", "timeZone": "UTC" }
        }"#;

        let event: GraphEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.subject, Some("Design review".to_string()));
        assert!(!event.is_all_day);
        assert!(!event.is_cancelled);
        assert_eq!(
            event.start.unwrap().date_time,
            "2025-06-10T14:30:00.0000000"
        );
    }

    #[test]
    fn deserializes_all_day_event() {
        let json = r#"{
            "subject": "Offsite",
            "isAllDay": true,
            "start": { "dateTime": "2025-06-10T00:00:00.0000000", "timeZone": "UTC" },
            "end": { "dateTime": "2025-06-12T00:00:00.0000000", "timeZone": "UTC" }
        }"#;

        let event: GraphEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_all_day);
    }

    #[test]
    fn missing_flags_default_to_false() {
        let json = r#"{"subject": "Bare"}"#;
        let event: GraphEvent = serde_json::from_str(json).unwrap();
        assert!(!event.is_all_day);
        assert!(!event.is_cancelled);
    }

    #[test]
    fn wire_roundtrip_for_caching() {
        let json = r#"{"subject":"x","isAllDay":true,"isCancelled":false,"start":{"dateTime":"2025-06-10T00:00:00.0000000","timeZone":"UTC"},"end":{"dateTime":"2025-06-11T00:00:00.0000000","timeZone":"UTC"}}"#;
        let event: GraphEvent = serde_json::from_str(json).unwrap();
        let re = serde_json::to_string(&event).unwrap();
        let back: GraphEvent = serde_json::from_str(&re).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn response_without_value_is_empty() {
        let body: CalendarViewResponse = serde_json::from_str("{}").unwrap();
        assert!(body.value.is_empty());
    }
}
