//! Google Calendar backend.
//!
//! Talks to the Calendar API v3 with an OAuth2 bearer token. Token
//! acquisition (the interactive consent flow) is external; this module
//! only reloads persisted credentials, refreshing the access token when it
//! has expired. Wire results are cached on disk so repeated runs within
//! the TTL do not hit the API.

mod auth;
mod client;
mod config;
mod source;

pub use auth::{CredentialStore, StoredCredentials};
pub use client::{GoogleCalendarClient, GoogleEvent, GoogleEventTime};
pub use config::GoogleConfig;
pub use source::GoogleSource;
