//! Journal implementation
//!
//! Events are kept in a deque ordered by descending sequence. New sequence
//! numbers only grow, so recording always inserts at the front.

use std::collections::{HashSet, VecDeque};

use crate::error::{ChainFsError, Result};

use super::{Event, EventKind, SequenceCounter};

/// Ordered record of all events of one engine, newest first
#[derive(Debug, Default)]
pub struct Journal {
    events: VecDeque<Event>,
    sequence: SequenceCounter,
}

impl Journal {
    /// Create an empty journal with its own sequence counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty journal drawing numbers from a shared counter
    pub fn with_sequence(sequence: SequenceCounter) -> Self {
        Self {
            events: VecDeque::new(),
            sequence,
        }
    }

    /// Record a new event and return its sequence number
    pub fn record(&mut self, kind: EventKind, file: &str, text: impl Into<Vec<u8>>) -> u64 {
        let sequence = self.sequence.next();
        let event = Event::new(kind, file, text, sequence);
        tracing::debug!(seq = sequence, kind = ?kind, file = file, "Journal event recorded");
        self.events.push_front(event);
        sequence
    }

    /// Replace all events with loaded ones
    ///
    /// Events are re-sorted newest first and the sequence counter is raised
    /// past the highest loaded number. Duplicate sequence numbers are rejected.
    pub fn replace(&mut self, mut events: Vec<Event>) -> Result<()> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.sequence) {
                return Err(ChainFsError::Format(format!(
                    "duplicate journal sequence number {}",
                    event.sequence
                )));
            }
        }

        events.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        if let Some(newest) = events.first() {
            self.sequence.advance_to(newest.sequence);
        }
        self.events = events.into();
        Ok(())
    }

    /// Drop every event (the sequence counter is left untouched)
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Stable newest-first copy of the events
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    /// Iterate events newest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Event> + '_ {
        self.events.iter()
    }

    /// Event at `index`, counting from the newest (0)
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn sequence(&self) -> &SequenceCounter {
        &self.sequence
    }
}
