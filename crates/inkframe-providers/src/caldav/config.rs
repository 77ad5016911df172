//! CalDAV adapter configuration.

use std::time::Duration;

use url::Url;

/// Configuration for the CalDAV adapter.
#[derive(Debug, Clone)]
pub struct CaldavConfig {
    /// URL of the calendar collection (or a base URL when `calendar_id`
    /// names the collection underneath it).
    pub url: Url,

    /// Username for HTTP Basic authentication.
    pub username: Option<String>,

    /// Password for HTTP Basic authentication.
    pub password: Option<String>,

    /// Collection name to append to the base URL, if the URL does not
    /// already point at the calendar itself.
    pub calendar_id: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl CaldavConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given server URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref())?;
        Ok(Self {
            url: parsed,
            username: None,
            password: None,
            calendar_id: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the credentials for authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the collection name appended to the base URL.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true if credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// The URL the REPORT goes to: the base URL with `calendar_id` joined
    /// onto it when one is set.
    pub fn collection_url(&self) -> Url {
        match self.calendar_id {
            Some(ref id) => {
                // A trailing slash on the base keeps Url::join appending
                // instead of replacing the last path segment.
                let mut base = self.url.clone();
                if !base.path().ends_with('/') {
                    base.set_path(&format!("{}/", base.path()));
                }
                base.join(id).unwrap_or_else(|_| self.url.clone())
            }
            None => self.url.clone(),
        }
    }
}
