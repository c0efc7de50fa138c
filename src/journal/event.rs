//! Journal event definitions

use std::borrow::Cow;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::{ChainFsError, Result};

/// Rendering of event timestamps, both on disk and in the log printout
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Kinds of journaled operations, with their on-disk codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    CreateFile = 0,
    AppendToFile = 1,
    DeleteFile = 2,
    ClearFile = 3,
    Undo = 4,
}

impl EventKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EventKind::CreateFile),
            1 => Some(EventKind::AppendToFile),
            2 => Some(EventKind::DeleteFile),
            3 => Some(EventKind::ClearFile),
            4 => Some(EventKind::Undo),
            _ => None,
        }
    }
}

/// One completed mutation
///
/// `text` carries the appended bytes (AppendToFile), the removed content
/// (ClearFile) or the decimal count of undone events (Undo). File content is
/// arbitrary bytes, so the text is kept as bytes too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,

    /// Target file, empty for Undo events
    pub file: String,

    pub text: Vec<u8>,

    /// Local time, whole seconds
    pub timestamp: NaiveDateTime,

    /// Process-wide creation order
    pub sequence: u64,
}

impl Event {
    /// Create an event stamped with the current local time
    pub fn new(
        kind: EventKind,
        file: impl Into<String>,
        text: impl Into<Vec<u8>>,
        sequence: u64,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            kind,
            file: file.into(),
            text: text.into(),
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            sequence,
        }
    }

    /// Text for display; invalid UTF-8 is replaced
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Number of events an Undo event reverted
    pub fn undo_count(&self) -> Result<usize> {
        std::str::from_utf8(&self.text)
            .ok()
            .and_then(|count| count.parse().ok())
            .ok_or_else(|| {
                ChainFsError::JournalCorruption(format!(
                    "undo event #{} has a non-numeric count {:?}",
                    self.sequence,
                    self.text_lossy()
                ))
            })
    }
}
