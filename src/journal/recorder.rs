//! Replay context for file operations
//!
//! File table operations report their events through a `Recorder`. A live
//! recorder appends to the journal; a replay recorder drops everything, so
//! operations re-executed by the undo engine leave no trace.

use super::{EventKind, Journal};

pub struct Recorder<'a> {
    journal: Option<&'a mut Journal>,
}

impl<'a> Recorder<'a> {
    /// Record into `journal`
    pub fn live(journal: &'a mut Journal) -> Self {
        Self {
            journal: Some(journal),
        }
    }

    /// Suppress recording
    pub fn replay() -> Self {
        Self { journal: None }
    }

    pub fn is_replaying(&self) -> bool {
        self.journal.is_none()
    }

    pub fn record(&mut self, kind: EventKind, file: &str, text: impl Into<Vec<u8>>) {
        if let Some(journal) = self.journal.as_deref_mut() {
            journal.record(kind, file, text);
        }
    }
}
