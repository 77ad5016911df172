//! OAuth credential persistence and refresh.
//!
//! The interactive consent flow happens outside this program; what lands
//! here is a persisted credential file (authorized-user style JSON with a
//! refresh token). On each run the store reloads it, refreshes the access
//! token if it has expired, and persists the result back, so the next run
//! starts warm.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// Google's OAuth2 token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh slack so we never present a token about to expire mid-request.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// The persisted credential set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Long-lived refresh token from the consent flow.
    pub refresh_token: Option<String>,
    /// Current access token, if one has been minted.
    #[serde(default)]
    pub access_token: Option<String>,
    /// When the access token expires.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    /// Returns `true` if the access token is missing or expired at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_none() {
            return true;
        }
        match self.expiry {
            Some(expiry) => now >= expiry,
            // No recorded expiry: assume still valid
            None => false,
        }
    }
}

/// Loads, refreshes, and persists OAuth credentials.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
}

impl CredentialStore {
    /// Creates a store backed by the given credential file.
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self {
            path: path.into(),
            http,
        }
    }

    /// Returns the credential file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a bearer token valid for the next request, refreshing and
    /// persisting if the stored access token has expired.
    pub async fn get_valid_credentials(&self) -> ProviderResult<String> {
        let mut creds = self.load()?;

        if creds.needs_refresh(Utc::now()) {
            self.refresh(&mut creds).await?;
            self.persist(&creds)?;
        } else {
            debug!("stored access token still valid");
        }

        creds
            .access_token
            .ok_or_else(|| ProviderError::authentication("no access token after refresh"))
    }

    /// Reads the credential file.
    pub fn load(&self) -> ProviderResult<StoredCredentials> {
        let bytes = fs::read(&self.path).map_err(|err| {
            ProviderError::authentication(format!(
                "no stored credentials at {} (complete the consent flow first): {err}",
                self.path.display()
            ))
        })?;
        serde_json::from_slice(&bytes).map_err(|err| {
            ProviderError::authentication(format!(
                "credential file {} is unreadable: {err}",
                self.path.display()
            ))
            .with_source(err)
        })
    }

    /// Writes the credential file back (after a refresh).
    pub fn persist(&self, creds: &StoredCredentials) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ProviderError::internal(format!("failed to create credential dir: {err}"))
                    .with_source(err)
            })?;
        }
        let bytes = serde_json::to_vec_pretty(creds).map_err(|err| {
            ProviderError::internal(format!("failed to encode credentials: {err}"))
                .with_source(err)
        })?;
        fs::write(&self.path, bytes).map_err(|err| {
            ProviderError::internal(format!("failed to persist credentials: {err}"))
                .with_source(err)
        })?;
        debug!(path = %self.path.display(), "persisted credentials");
        Ok(())
    }

    async fn refresh(&self, creds: &mut StoredCredentials) -> ProviderResult<()> {
        let refresh_token = creds.refresh_token.clone().ok_or_else(|| {
            ProviderError::authentication(
                "access token expired and no refresh token is stored; re-run the consent flow",
            )
        })?;

        debug!("refreshing expired access token");

        let params = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.http.post(TOKEN_ENDPOINT).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token refresh failed with status {status}"
            )));
        }

        let body: RefreshResponse = response.json().await?;

        creds.access_token = Some(body.access_token);
        creds.expiry = body.expires_in.map(|secs| {
            Utc::now() + chrono::Duration::seconds(secs - EXPIRY_BUFFER_SECS)
        });

        info!("refreshed access token");
        Ok(())
    }
}
