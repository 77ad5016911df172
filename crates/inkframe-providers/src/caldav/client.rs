//! HTTP client for CalDAV operations.
//!
//! Speaks just enough WebDAV for a calendar fetch: a REPORT with a Depth
//! header, an XML body, and HTTP Basic credentials.

use reqwest::{Client, Method, StatusCode};
use tracing::{trace, warn};

use crate::error::{ProviderError, ProviderResult};

use super::config::CaldavConfig;

/// HTTP client for CalDAV operations.
pub struct CaldavClient {
    client: Client,
    config: CaldavConfig,
}

impl CaldavClient {
    /// Creates a client from the given configuration.
    pub fn new(config: CaldavConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Performs a calendar-query REPORT against the configured collection
    /// and returns the multistatus body.
    pub async fn report(&self, body: &str) -> ProviderResult<String> {
        let url = self.config.collection_url();

        let method = Method::from_bytes(b"REPORT")
            .map_err(|_| ProviderError::internal("invalid HTTP method"))?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", "1")
            .body(body.to_string());

        if let (Some(username), Some(password)) =
            (&self.config.username, &self.config.password)
        {
            request = request.basic_auth(username, Some(password));
        }

        trace!(url = %url, "sending REPORT");

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("REPORT request failed: {e}")))?;

        let status = response.status();
        trace!(status = %status, "received response");

        match status {
            StatusCode::OK | StatusCode::MULTI_STATUS => response
                .text()
                .await
                .map_err(|e| ProviderError::network(format!("failed to read response: {e}"))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                ProviderError::authentication("server rejected the configured credentials"),
            ),
            s if s.is_server_error() => {
                Err(ProviderError::server(format!("server error ({s})")))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, body = %body, "unexpected response status");
                Err(ProviderError::invalid_response(format!(
                    "unexpected status {s}"
                )))
            }
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CaldavConfig {
        &self.config
    }
}
