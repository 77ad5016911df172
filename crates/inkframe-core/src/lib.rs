//! Core types for inkframe: the normalized event model, time windows,
//! date-range formatting, and fixed-slot display assembly.

pub mod event;
pub mod format;
pub mod slots;
pub mod time;
pub mod tracing;

pub use event::{CalendarEvent, sort_chronologically};
pub use format::{format_event, format_range, formatted_date, formatted_day};
pub use slots::{DEFAULT_SLOT_COUNT, Slot, SlotSet};
pub use time::{EventTime, TimeWindow};
