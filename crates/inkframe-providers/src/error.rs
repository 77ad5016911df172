//! Error types for calendar backend operations.
//!
//! A fetch that cannot reach or authenticate against its backend fails the
//! whole run; there is no fallback provider and no retry. Per-event
//! problems (a backend returning an event the adapter cannot normalize)
//! are not errors at this level: adapters skip the event and log.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials are missing, invalid, or expired beyond refresh.
    AuthenticationFailed,
    /// Connection failed, timed out, or DNS did not resolve.
    NetworkError,
    /// The backend returned a server-side error status.
    ServerError,
    /// The backend's response could not be parsed.
    InvalidResponse,
    /// Missing or invalid adapter configuration.
    ConfigurationError,
    /// Unexpected internal state (filesystem failures and the like).
    InternalError,
}

impl ProviderErrorCode {
    /// Returns a stable snake_case name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }

    /// Returns `true` when the backend was unreachable or refused us,
    /// i.e. the run-aborting "provider unavailable" family.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::NetworkError | Self::ServerError
        )
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from a calendar backend adapter.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Tags this error with the adapter it came from.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the adapter name, if tagged.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() || err.is_connect() {
            ProviderErrorCode::NetworkError
        } else if err.is_status() {
            ProviderErrorCode::ServerError
        } else if err.is_decode() {
            ProviderErrorCode::InvalidResponse
        } else {
            ProviderErrorCode::NetworkError
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for adapter operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_family() {
        assert!(ProviderErrorCode::NetworkError.is_unavailable());
        assert!(ProviderErrorCode::AuthenticationFailed.is_unavailable());
        assert!(ProviderErrorCode::ServerError.is_unavailable());
        assert!(!ProviderErrorCode::InvalidResponse.is_unavailable());
        assert!(!ProviderErrorCode::ConfigurationError.is_unavailable());
    }

    #[test]
    fn error_creation() {
        let err = ProviderError::authentication("token expired");
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "token expired");
        assert!(err.provider().is_none());
    }

    #[test]
    fn display_includes_provider_tag() {
        let err = ProviderError::network("connection refused").with_provider("caldav");
        let display = format!("{}", err);
        assert!(display.contains("[caldav]"));
        assert!(display.contains("network_error"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ProviderError::internal("failed to persist cache").with_source(io_err);
        assert!(err.source().is_some());
    }
}
