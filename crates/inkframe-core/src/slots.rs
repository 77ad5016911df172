//! Fixed-slot output assembly.
//!
//! The display template has a fixed number of event slots. The assembler
//! maps an ordered event list onto exactly that many
//! (datetime label, description label) pairs, padding the tail with empty
//! strings so every template placeholder gets substituted.

use std::collections::BTreeMap;

use crate::event::CalendarEvent;
use crate::format::format_event;

/// Default number of display slots.
///
/// Increasing this requires a matching SVG template with more placeholders.
pub const DEFAULT_SLOT_COUNT: usize = 10;

/// One display slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Formatted date/time range, empty for unfilled slots.
    pub datetime_label: String,
    /// Event summary, empty for unfilled slots.
    pub description_label: String,
}

impl Slot {
    /// Returns `true` if both labels are empty.
    pub fn is_empty(&self) -> bool {
        self.datetime_label.is_empty() && self.description_label.is_empty()
    }
}

/// A complete, fixed-size set of display slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSet {
    slots: Vec<Slot>,
}

impl SlotSet {
    /// Maps events onto `slot_count` slots in order.
    ///
    /// Slot `i` (1-based) holds event `i-1`; slots past the end of the list
    /// are empty. The caller is responsible for having capped the fetch at
    /// `slot_count`; extra events are not expected here and are ignored.
    pub fn assemble(events: &[CalendarEvent], slot_count: usize) -> Self {
        let slots = (0..slot_count)
            .map(|i| match events.get(i) {
                Some(event) => Slot {
                    datetime_label: format_event(event),
                    description_label: event.summary.clone(),
                },
                None => Slot::default(),
            })
            .collect();
        Self { slots }
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the set has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding an event.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Iterates over slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Produces the template substitution map consumed by the SVG renderer:
    /// `CAL_DATETIME_{1..N}` and `CAL_DESC_{1..N}`.
    pub fn template_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let label_id = i + 1;
            values.insert(
                format!("CAL_DATETIME_{label_id}"),
                slot.datetime_label.clone(),
            );
            values.insert(format!("CAL_DESC_{label_id}"), slot.description_label.clone());
        }
        values
    }
}
