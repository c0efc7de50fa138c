//! Undo Engine
//!
//! Replays inverse (or forward) file operations driven by a newest-first
//! snapshot of the journal. Every replayed operation runs with a replay
//! recorder, so nothing it does is journaled.
//!
//! ## Inversion
//! | Event        | Undo                                   |
//! |--------------|----------------------------------------|
//! | CreateFile   | delete the file                        |
//! | AppendToFile | cut the appended bytes off the content |
//! | DeleteFile   | re-create the file, empty              |
//! | ClearFile    | append the removed content back        |
//! | Undo(n)      | redo the n events it reverted          |
//!
//! Redo of an Undo(n) event at index `i` re-applies `events[i + n]` down to
//! `events[i + 1]`, oldest first. Re-applying an Undo event undoes its own
//! window again.

use crate::error::{ChainFsError, Result};
use crate::fs::FileTable;
use crate::journal::{Event, EventKind, Recorder};

/// Runs undo/redo windows over one journal snapshot
///
/// Indices always refer to the same snapshot, taken once per top-level undo.
pub(crate) struct Replayer<'a> {
    table: &'a mut FileTable,
    events: &'a [Event],
}

impl<'a> Replayer<'a> {
    pub(crate) fn new(table: &'a mut FileTable, events: &'a [Event]) -> Self {
        Self { table, events }
    }

    /// Invert `count` events starting at `start`, newest first
    pub(crate) fn undo_window(&mut self, start: usize, count: usize) -> Result<()> {
        for index in start..start + count {
            self.invert(index)?;
        }
        Ok(())
    }

    fn invert(&mut self, index: usize) -> Result<()> {
        let event = self.event(index)?;
        let mut rec = Recorder::replay();
        tracing::debug!(index, seq = event.sequence, kind = ?event.kind, "Undoing event");

        match event.kind {
            EventKind::CreateFile => self.table.delete_file(&event.file, &mut rec),
            EventKind::AppendToFile => {
                let content = self.table.read_file(&event.file);
                let keep = content.len().saturating_sub(event.text.len());
                self.table.write_file(&event.file, &content[..keep], &mut rec)?;
            }
            EventKind::DeleteFile => self.table.create_file(&event.file, &mut rec)?,
            EventKind::ClearFile => {
                self.table
                    .append_file(&event.file, &event.text, &mut rec)?;
            }
            EventKind::Undo => {
                let count = event.undo_count()?;
                for offset in (1..=count).rev() {
                    self.apply(index + offset)?;
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, index: usize) -> Result<()> {
        let event = self.event(index)?;
        let mut rec = Recorder::replay();
        tracing::debug!(index, seq = event.sequence, kind = ?event.kind, "Redoing event");

        match event.kind {
            EventKind::CreateFile => self.table.create_file(&event.file, &mut rec)?,
            EventKind::AppendToFile => {
                self.table
                    .append_file(&event.file, &event.text, &mut rec)?;
            }
            EventKind::DeleteFile => self.table.delete_file(&event.file, &mut rec),
            EventKind::ClearFile => self.table.clear_file_content(&event.file, &mut rec),
            EventKind::Undo => self.undo_window(index + 1, event.undo_count()?)?,
        }
        Ok(())
    }

    fn event(&self, index: usize) -> Result<&'a Event> {
        let events = self.events;
        events.get(index).ok_or_else(|| {
            ChainFsError::JournalCorruption(format!(
                "undo window reaches event {} but the journal holds {}",
                index,
                events.len()
            ))
        })
    }
}
