//! Outlook backend.
//!
//! Talks to the Microsoft Graph `calendarView` endpoint with a bearer
//! token supplied by the environment (minting one is external; a device
//! code or client-credentials flow both work). The view is requested in
//! UTC, so wire timestamps carry no offset of their own.

mod client;
mod config;
mod source;

pub use client::{GraphCalendarClient, GraphDateTime, GraphEvent};
pub use config::OutlookConfig;
pub use source::OutlookSource;
