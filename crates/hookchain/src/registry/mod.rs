//! Hook registry for storing hooks by event name
//!
//! The registry maps each event name to an [`EventEntry`] holding that event's
//! hooks. It only ever grows: hooks are appended, never removed or replaced.
//! Ordering is lazy; entries are sorted by priority the first time they are
//! triggered after a registration.
//!
//! # Examples
//!
//! ```ignore
//! use hookchain::registry::HookRegistry;
//! use hookchain::{Registration, Reply};
//!
//! let mut registry = HookRegistry::<String, (), String>::new();
//! registry.append("file_saved", Registration::new(|_| Reply::ok(())).priority(5).into());
//! registry.append("file_saved", Registration::new(|_| Reply::ok(())).priority(1).into());
//!
//! let ordered = registry.ordered("file_saved").unwrap();
//! assert_eq!(ordered[0].priority(), 1);
//! ```

pub mod args;
pub mod entry;

pub use entry::EventEntry;

use std::{collections::HashMap, sync::Arc};

use tracing::trace;

use crate::types::HandlerRecord;

/// Event name to hooks mapping owned by one dispatcher
pub struct HookRegistry<A, T, E> {
    entries: HashMap<String, EventEntry<A, T, E>>,
}

impl<A, T, E> HookRegistry<A, T, E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Append a record to the entry for `event`, creating the entry if needed
    pub fn append(&mut self, event: &str, record: HandlerRecord<A, T, E>) {
        self.entries
            .entry(event.to_string())
            .or_default()
            .push(record);
    }

    /// Get the entry for an event
    pub fn entry(&self, event: &str) -> Option<&EventEntry<A, T, E>> {
        self.entries.get(event)
    }

    /// Sort the entry for `event` if it is not known to be sorted
    ///
    /// No-op for unknown events.
    pub fn ensure_sorted(&mut self, event: &str) {
        if let Some(entry) = self.entries.get_mut(event) {
            if entry.ensure_sorted() {
                trace!(event = %event, hook_count = entry.len(), "Sorted hooks by priority");
            }
        }
    }

    /// Records for `event` in execution order
    ///
    /// Returns `None` if nothing was ever registered for the event. The
    /// returned vector is a snapshot; later registrations do not affect it.
    pub fn ordered(&mut self, event: &str) -> Option<Vec<Arc<HandlerRecord<A, T, E>>>> {
        self.ensure_sorted(event);
        self.entries.get(event).map(|entry| entry.handlers().to_vec())
    }

    /// Whether hooks exist for `event`
    pub fn contains(&self, event: &str) -> bool {
        self.entries.contains_key(event)
    }

    /// Number of hooks registered for `event`
    pub fn hook_count(&self, event: &str) -> usize {
        self.entries.get(event).map_or(0, EventEntry::len)
    }

    /// All event names with at least one hook, sorted alphabetically
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<A, T, E> Default for HookRegistry<A, T, E> {
    fn default() -> Self {
        Self::new()
    }
}
