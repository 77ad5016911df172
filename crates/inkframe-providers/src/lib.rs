//! CalendarSource trait and the four backend adapters.
//!
//! This crate provides the abstraction layer for calendar backends:
//!
//! - [`CalendarSource`] - The trait every backend implements
//! - [`FetchCache`] - Durable TTL cache for wire payloads
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │  Graph API  │ │CalDAV server│ │  ICS feed   │ │ Calendar API│
//! └──────┬──────┘ └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!        │               │               │               │
//!        ▼               ▼               ▼               ▼
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │OutlookSource│ │CaldavSource │ │IcsFeedSource│ │GoogleSource │
//! └──────┬──────┘ └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!        │               │               │               │
//!        │            CalendarSource     │               │
//!        └───────────────┴───────┬───────┴───────────────┘
//!                                ▼
//!                       Vec<CalendarEvent>
//!               (window-filtered, sorted, truncated)
//! ```
//!
//! Each adapter caches its own wire payload through [`FetchCache`] and owns
//! its normalization, including the exclusive-to-inclusive conversion of
//! all-day end dates.

pub mod cache;
pub mod caldav;
pub mod error;
pub mod google;
pub mod ics;
pub mod ics_feed;
pub mod outlook;
pub mod source;

// Re-export main types at crate root
pub use cache::FetchCache;
pub use caldav::{CaldavConfig, CaldavSource};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::{GoogleConfig, GoogleSource};
pub use ics::{IcsEvent, IcsTime, parse_ics};
pub use ics_feed::{IcsFeedConfig, IcsFeedSource};
pub use outlook::{OutlookConfig, OutlookSource};
pub use source::{BoxFuture, CalendarSource};
