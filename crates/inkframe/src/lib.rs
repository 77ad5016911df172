//! inkframe: render upcoming calendar events into an e-paper SVG.
//!
//! The binary runs once per invocation (cron or a systemd timer drives
//! it): pick a calendar backend, fetch events for the coming year, lay
//! them into the template's fixed slots, and substitute the result into
//! the display SVG.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod svg;

pub use config::Config;
pub use error::{AppError, AppResult};
