//! Journal codec
//!
//! Serializes the journal section of a disk image. Numbers are written as
//! ASCII decimal digits preceded by a one-byte digit count.

use bytes::{Buf, BufMut};
use chrono::NaiveDateTime;

use crate::error::{ChainFsError, Result};

use super::{Event, EventKind, TIMESTAMP_FORMAT};

// =============================================================================
// Encoding
// =============================================================================

/// Encode events in the given order (the journal passes newest first)
pub fn encode_journal<'a, B, I>(events: I, buf: &mut B)
where
    B: BufMut,
    I: ExactSizeIterator<Item = &'a Event>,
{
    put_decimal(buf, events.len() as u64);

    for event in events {
        buf.put_u8(event.kind.code());
        put_short_bytes(buf, event.file.as_bytes());

        put_decimal(buf, event.text.len() as u64);
        buf.put_slice(&event.text);

        put_short_bytes(buf, event.formatted_timestamp().as_bytes());
        put_decimal(buf, event.sequence);
    }
}

/// Digit count (1) + ASCII digits
fn put_decimal<B: BufMut>(buf: &mut B, value: u64) {
    put_short_bytes(buf, value.to_string().as_bytes());
}

/// Length (1) + bytes; callers keep `bytes` under 256
fn put_short_bytes<B: BufMut>(buf: &mut B, bytes: &[u8]) {
    buf.put_u8(bytes.len() as u8);
    buf.put_slice(bytes);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a journal section, returning events in stored order
pub fn decode_journal<B: Buf>(buf: &mut B) -> Result<Vec<Event>> {
    let count = get_decimal(buf, "event count")?;

    let mut events = Vec::new();
    for index in 0..count {
        events.push(decode_event(buf, index)?);
    }
    Ok(events)
}

fn decode_event<B: Buf>(buf: &mut B, index: u64) -> Result<Event> {
    let code = get_u8(buf, "event kind")?;
    let kind = EventKind::from_code(code).ok_or_else(|| {
        ChainFsError::Format(format!("event {}: unknown event kind {}", index, code))
    })?;

    let file = get_string(buf, "file name", |buf| get_short_bytes(buf, "file name"))?;

    let text_len = get_decimal(buf, "text length")?;
    let text = take(buf, text_len as usize, "event text")?;

    let stamp = get_string(buf, "timestamp", |buf| get_short_bytes(buf, "timestamp"))?;
    let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).map_err(|e| {
        ChainFsError::Format(format!("event {}: bad timestamp {:?}: {}", index, stamp, e))
    })?;

    let sequence = get_decimal(buf, "sequence")?;

    Ok(Event {
        kind,
        file,
        text,
        timestamp,
        sequence,
    })
}

fn get_u8<B: Buf>(buf: &mut B, field: &str) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(truncated(field, 1, 0));
    }
    Ok(buf.get_u8())
}

fn take<B: Buf>(buf: &mut B, len: usize, field: &str) -> Result<Vec<u8>> {
    if buf.remaining() < len {
        return Err(truncated(field, len, buf.remaining()));
    }
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    Ok(bytes)
}

fn get_short_bytes<B: Buf>(buf: &mut B, field: &str) -> Result<Vec<u8>> {
    let len = get_u8(buf, field)?;
    take(buf, len as usize, field)
}

fn get_decimal<B: Buf>(buf: &mut B, field: &str) -> Result<u64> {
    let digits = get_short_bytes(buf, field)?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(ChainFsError::Format(format!(
            "{}: expected decimal digits, got {:?}",
            field,
            String::from_utf8_lossy(&digits)
        )));
    }

    // All ASCII digits, so the only failure left is overflow
    std::str::from_utf8(&digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ChainFsError::Format(format!("{}: number out of range", field)))
}

fn get_string<B, F>(buf: &mut B, field: &str, read: F) -> Result<String>
where
    B: Buf,
    F: FnOnce(&mut B) -> Result<Vec<u8>>,
{
    let bytes = read(buf)?;
    String::from_utf8(bytes)
        .map_err(|_| ChainFsError::Format(format!("{}: not valid UTF-8", field)))
}

fn truncated(field: &str, needed: usize, left: usize) -> ChainFsError {
    ChainFsError::Format(format!(
        "journal truncated reading {}: need {} bytes, {} left",
        field, needed, left
    ))
}
