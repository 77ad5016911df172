//! Outlook adapter configuration.

use std::time::Duration;

/// Configuration for the Outlook adapter.
#[derive(Debug, Clone)]
pub struct OutlookConfig {
    /// Bearer token for the Graph API.
    pub access_token: String,

    /// A specific calendar to read; the account's default calendar when
    /// unset.
    pub calendar_id: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl OutlookConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with the given bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            calendar_id: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the calendar identifier.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
