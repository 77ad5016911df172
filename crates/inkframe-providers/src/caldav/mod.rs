//! CalDAV backend.
//!
//! Issues a calendar-query REPORT against a calendar collection and parses
//! the ICS payloads out of the multistatus response. Works against any
//! RFC 4791 server (Radicale, Nextcloud, Baikal) with HTTP Basic auth.

mod client;
mod config;
mod source;
mod xml;

pub use client::CaldavClient;
pub use config::CaldavConfig;
pub use source::CaldavSource;
pub use xml::{calendar_query_body, parse_calendar_data};
