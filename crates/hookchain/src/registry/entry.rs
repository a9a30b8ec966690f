//! Per-event hook storage

use std::sync::Arc;

use crate::types::HandlerRecord;

/// Hooks registered for one event name
///
/// Records are kept in insertion order until [`EventEntry::ensure_sorted`]
/// reorders them by priority. The `sorted` flag caches that work and is
/// cleared by every append that leaves more than one record.
pub struct EventEntry<A, T, E> {
    handlers: Vec<Arc<HandlerRecord<A, T, E>>>,
    sorted: bool,
}

impl<A, T, E> EventEntry<A, T, E> {
    /// Create an empty entry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            sorted: true,
        }
    }

    /// Append a record
    pub fn push(&mut self, record: HandlerRecord<A, T, E>) {
        self.handlers.push(Arc::new(record));
        self.sorted = self.handlers.len() <= 1;
    }

    /// Sort records by ascending priority, keeping registration order for ties
    ///
    /// Returns `true` if a sort actually ran.
    pub fn ensure_sorted(&mut self) -> bool {
        if self.sorted || self.handlers.len() <= 1 {
            return false;
        }

        // sort_by_key is stable
        self.handlers.sort_by_key(|record| record.priority());
        self.sorted = true;
        true
    }

    /// Whether the records are known to be in execution order
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Records in their current order
    pub fn handlers(&self) -> &[Arc<HandlerRecord<A, T, E>>] {
        &self.handlers
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no record has been appended
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<A, T, E> Default for EventEntry<A, T, E> {
    fn default() -> Self {
        Self::new()
    }
}
