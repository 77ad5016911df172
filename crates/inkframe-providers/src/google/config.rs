//! Google adapter configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Google Calendar adapter.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// The calendar to fetch, "primary" by default.
    pub calendar_id: String,

    /// Where OAuth credentials are persisted.
    pub credentials_path: PathBuf,

    /// Request timeout.
    pub timeout: Duration,
}

impl GoogleConfig {
    /// Default calendar identifier.
    pub const DEFAULT_CALENDAR_ID: &'static str = "primary";

    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self {
            calendar_id: Self::DEFAULT_CALENDAR_ID.to_string(),
            credentials_path: default_credentials_path(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the calendar identifier.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Sets the credentials file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `$XDG_CONFIG_HOME/inkframe/google-credentials.json`, falling back to
/// the working directory when no config dir is available.
fn default_credentials_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("inkframe").join("google-credentials.json"),
        None => PathBuf::from("google-credentials.json"),
    }
}
