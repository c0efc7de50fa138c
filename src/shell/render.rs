//! Console presentation of directory listings and the journal

use crate::fs::FileTable;
use crate::journal::{Event, EventKind, Journal};

/// One line per file: right-aligned name and size
pub fn directory_listing(table: &FileTable) -> String {
    table
        .names()
        .map(|name| format!("{:>63} | Size: {:>4} bytes", name, table.file_size(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per event, newest first
pub fn journal_listing(journal: &Journal) -> String {
    journal.iter().map(log_line).collect::<Vec<_>>().join("\n")
}

pub fn log_line(event: &Event) -> String {
    let stamp = event.formatted_timestamp();
    match event.kind {
        EventKind::Undo => format!("{} |{:71}| {}", stamp, "", describe(event)),
        _ => format!("{} | File: {:>63} | {}", stamp, event.file, describe(event)),
    }
}

/// What an event did, in words
pub fn describe(event: &Event) -> String {
    let text = event.text_lossy();
    let text = text.escape_debug();
    match event.kind {
        EventKind::CreateFile => "Created".to_string(),
        EventKind::AppendToFile => format!("Appended: {}", text),
        EventKind::DeleteFile => "Deleted".to_string(),
        EventKind::ClearFile => format!("Content removed: {}", text),
        EventKind::Undo => format!("Undid the last {} actions", text),
    }
}
