//! The `CalendarSource` trait: the single capability every backend
//! adapter implements.
//!
//! Adapters are constructed with everything a fetch needs (calendar
//! identifier, result cap, time window); the trait itself carries no
//! parameters. Exactly one adapter is active per run.

use std::future::Future;
use std::pin::Pin;

use inkframe_core::{CalendarEvent, TimeWindow, sort_chronologically};

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object safe so the orchestrator can hold a
/// `Box<dyn CalendarSource>` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A calendar backend that can fetch events for its configured window.
///
/// Implementations must return events whose start falls inside the window,
/// chronologically ordered, and at most the configured maximum. Events the
/// backend sends in a shape the adapter cannot normalize are skipped with a
/// warning rather than failing the fetch; backend unavailability (network,
/// auth) is an error and propagates.
pub trait CalendarSource: Send + Sync {
    /// A short name identifying the backend (e.g. "google", "caldav").
    fn name(&self) -> &'static str;

    /// Fetches, normalizes, and orders the events for this run.
    fn get_calendar_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>>;
}

impl std::fmt::Debug for dyn CalendarSource + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarSource")
            .field("name", &self.name())
            .finish()
    }
}

/// Shared post-processing every adapter applies after normalization:
/// keep events starting inside `[window.start, window.end)`, order them
/// chronologically, and cap the count.
///
/// Window membership is judged on the start boundary. An all-day event
/// that began earlier today is therefore excluded unless the window start
/// was rolled back to midnight.
pub(crate) fn finalize_events(
    mut events: Vec<CalendarEvent>,
    window: &TimeWindow,
    max_results: usize,
) -> Vec<CalendarEvent> {
    events.retain(|e| window.contains_event_time(&e.start));
    sort_chronologically(&mut events);
    events.truncate(max_results);
    events
}
