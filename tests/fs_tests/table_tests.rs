//! File Table Tests
//!
//! These tests verify:
//! - Chains grow cluster by cluster with exact used-byte accounting
//! - Create/write/append/clear/delete semantics and the events they record
//! - Name truncation
//! - Directory and cluster capacity limits

use chainfs::disk::{CLUSTER_COUNT, CLUSTER_DATA_SIZE, MAX_FILES, MAX_NAME_LEN};
use chainfs::fs::{truncate_name, FileTable};
use chainfs::journal::{EventKind, Journal, Recorder};
use chainfs::ChainFsError;

// =============================================================================
// Helper Functions
// =============================================================================

/// Used-byte counts of a file's chain, head first
fn chain_usage(table: &FileTable, name: &str) -> Vec<u8> {
    table
        .clusters()
        .chain(table.head(name))
        .map(|(_, cluster)| cluster.used)
        .collect()
}

/// Recorded event kinds, newest first
fn kinds(journal: &Journal) -> Vec<EventKind> {
    journal.iter().map(|e| e.kind).collect()
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_write_then_read_multi_cluster() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let text = vec![b'q'; 600];

    table
        .write_file("a", &text, &mut Recorder::live(&mut journal))
        .unwrap();

    assert_eq!(table.read_file("a"), text);
    assert_eq!(table.file_size("a"), 600);
    assert_eq!(chain_usage(&table, "a"), vec![255, 255, 90]);
    assert_eq!(table.allocated(), 3);
}

#[test]
fn test_read_absent_file_is_empty() {
    let table = FileTable::new();

    assert!(table.read_file("missing").is_empty());
    assert_eq!(table.file_size("missing"), 0);
}

#[test]
fn test_append_fills_tail_before_allocating() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);

    table.append_file("a", &[b'x'; 200], &mut rec).unwrap();
    table.append_file("a", &[b'y'; 55], &mut rec).unwrap();
    assert_eq!(chain_usage(&table, "a"), vec![255]);

    table.append_file("a", b"z", &mut rec).unwrap();
    assert_eq!(chain_usage(&table, "a"), vec![255, 1]);

    let mut expected = vec![b'x'; 200];
    expected.extend_from_slice(&[b'y'; 55]);
    expected.push(b'z');
    assert_eq!(table.read_file("a"), expected);
    assert_eq!(table.file_size("a"), 256);
}

#[test]
fn test_append_empty_text_is_noop() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();

    table
        .append_file("a", b"", &mut Recorder::live(&mut journal))
        .unwrap();

    assert!(!table.contains("a"));
    assert!(journal.is_empty());
    assert_eq!(table.allocated(), 0);
}

#[test]
fn test_size_matches_content_after_mixed_operations() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);

    table.write_file("a", &[1u8; 700], &mut rec).unwrap();
    table.append_file("a", &[2u8; 65], &mut rec).unwrap();
    table.clear_file_content("a", &mut rec);
    table.append_file("a", &[3u8; 300], &mut rec).unwrap();
    table.write_file("b", b"short", &mut rec).unwrap();
    table.append_file("b", &[4u8; 250], &mut rec).unwrap();

    for name in ["a", "b"] {
        assert_eq!(table.file_size(name), table.read_file(name).len());
    }
    assert_eq!(table.file_size("a"), 300);
    assert_eq!(table.file_size("b"), 255);
    assert_eq!(table.allocated(), 3);
}

// =============================================================================
// Event Recording Tests
// =============================================================================

#[test]
fn test_create_new_file_records_create() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();

    table
        .create_file("a", &mut Recorder::live(&mut journal))
        .unwrap();

    assert!(table.contains("a"));
    assert_eq!(kinds(&journal), vec![EventKind::CreateFile]);
    assert_eq!(journal.get(0).unwrap().file, "a");
}

#[test]
fn test_create_existing_file_clears_content() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);
    table.write_file("a", b"old", &mut rec).unwrap();

    table.create_file("a", &mut rec).unwrap();

    assert!(table.contains("a"));
    assert!(table.read_file("a").is_empty());
    assert_eq!(table.allocated(), 0);

    drop(rec);
    assert_eq!(
        kinds(&journal),
        vec![EventKind::ClearFile, EventKind::AppendToFile, EventKind::CreateFile]
    );
    assert_eq!(journal.get(0).unwrap().text, b"old");
}

#[test]
fn test_create_existing_empty_file_records_nothing() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);
    table.create_file("a", &mut rec).unwrap();

    table.create_file("a", &mut rec).unwrap();

    drop(rec);
    assert_eq!(kinds(&journal), vec![EventKind::CreateFile]);
}

#[test]
fn test_append_to_absent_file_creates_it() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();

    table
        .append_file("a", b"hi", &mut Recorder::live(&mut journal))
        .unwrap();

    assert_eq!(table.read_file("a"), b"hi");
    assert_eq!(
        kinds(&journal),
        vec![EventKind::AppendToFile, EventKind::CreateFile]
    );
    assert_eq!(journal.get(0).unwrap().text, b"hi");
}

#[test]
fn test_append_event_carries_full_text() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let text = "z".repeat(700);

    table
        .write_file("a", text.as_bytes(), &mut Recorder::live(&mut journal))
        .unwrap();

    let appends: Vec<_> = journal
        .iter()
        .filter(|e| e.kind == EventKind::AppendToFile)
        .collect();
    assert_eq!(appends.len(), 1);
    assert_eq!(appends[0].text, text.as_bytes());
}

#[test]
fn test_delete_records_clear_then_delete() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);
    table.write_file("a", b"x", &mut rec).unwrap();

    table.delete_file("a", &mut rec);

    assert!(!table.contains("a"));
    assert_eq!(table.allocated(), 0);

    drop(rec);
    let newest: Vec<_> = journal.iter().take(2).collect();
    assert_eq!(newest[0].kind, EventKind::DeleteFile);
    assert_eq!(newest[0].file, "a");
    assert_eq!(newest[1].kind, EventKind::ClearFile);
    assert_eq!(newest[1].text, b"x");
}

#[test]
fn test_delete_empty_file_records_only_delete() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);
    table.create_file("a", &mut rec).unwrap();

    table.delete_file("a", &mut rec);

    drop(rec);
    assert_eq!(
        kinds(&journal),
        vec![EventKind::DeleteFile, EventKind::CreateFile]
    );
}

#[test]
fn test_delete_absent_file_is_noop() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();

    table.delete_file("ghost", &mut Recorder::live(&mut journal));

    assert!(journal.is_empty());
}

#[test]
fn test_clear_empty_file_records_nothing() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);
    table.create_file("a", &mut rec).unwrap();

    table.clear_file_content("a", &mut rec);

    drop(rec);
    assert_eq!(journal.len(), 1);
}

#[test]
fn test_replay_recorder_records_nothing() {
    let mut table = FileTable::new();
    let mut rec = Recorder::replay();
    assert!(rec.is_replaying());

    table.write_file("a", b"data", &mut rec).unwrap();
    table.delete_file("a", &mut rec);
    table.create_file("b", &mut rec).unwrap();

    assert!(!table.contains("a"));
    assert!(table.contains("b"));
}

// =============================================================================
// Name Truncation Tests
// =============================================================================

#[test]
fn test_long_names_are_truncated() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let long = "n".repeat(200);

    table
        .write_file(&long, b"body", &mut Recorder::live(&mut journal))
        .unwrap();

    let names: Vec<&str> = table.names().collect();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].len(), MAX_NAME_LEN);
    assert!(table.contains(&long));
    assert_eq!(table.read_file(&long), b"body");
    assert_eq!(table.read_file(&long[..MAX_NAME_LEN]), b"body");
}

#[test]
fn test_truncation_respects_char_boundaries() {
    // 70 two-byte chars = 140 bytes; 63 of them fit exactly in 126 bytes
    let name = "я".repeat(70);
    assert_eq!(truncate_name(&name), "я".repeat(63));

    // 1 + 2 * 70 bytes; the cut falls inside a char and backs off one byte
    let odd = format!("a{}", "я".repeat(70));
    let cut = truncate_name(&odd);
    assert_eq!(cut.len(), 125);
    assert_eq!(cut, format!("a{}", "я".repeat(62)));

    assert_eq!(truncate_name("short"), "short");
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_directory_full() {
    let mut table = FileTable::new();
    let mut rec = Recorder::replay();

    for i in 0..MAX_FILES {
        table.create_file(&format!("f{:03}", i), &mut rec).unwrap();
    }

    let result = table.create_file("one-too-many", &mut rec);
    assert!(matches!(result, Err(ChainFsError::DirectoryFull { .. })));
    assert_eq!(table.len(), MAX_FILES);

    // Re-creating an existing entry still works
    table.create_file("f000", &mut rec).unwrap();
}

#[test]
fn test_out_of_space_keeps_existing_files_readable() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let mut rec = Recorder::live(&mut journal);

    let big = vec![b'a'; (CLUSTER_COUNT - 1) * CLUSTER_DATA_SIZE];
    table.write_file("a", &big, &mut rec).unwrap();
    table.write_file("b", b"b", &mut rec).unwrap();
    assert_eq!(table.allocated(), CLUSTER_COUNT);

    // "a" has a full tail, so growing it needs a 256th cluster
    let result = table.append_file("a", b"more", &mut rec);
    assert!(matches!(result, Err(ChainFsError::OutOfSpace { .. })));

    assert_eq!(table.read_file("a"), big);
    assert_eq!(table.read_file("b"), b"b");
    assert_eq!(table.allocated(), CLUSTER_COUNT);

    drop(rec);
    // The failed append was not journaled
    assert_eq!(journal.get(0).unwrap().kind, EventKind::AppendToFile);
    assert_eq!(journal.get(0).unwrap().file, "b");
}

#[test]
fn test_out_of_space_retains_partial_chain() {
    let mut table = FileTable::new();
    let mut journal = Journal::new();
    let text = vec![b'x'; (CLUSTER_COUNT + 1) * CLUSTER_DATA_SIZE];

    let result = table.write_file("a", &text, &mut Recorder::live(&mut journal));

    assert!(matches!(result, Err(ChainFsError::OutOfSpace { .. })));
    assert_eq!(table.allocated(), CLUSTER_COUNT);
    assert_eq!(table.file_size("a"), CLUSTER_COUNT * CLUSTER_DATA_SIZE);
    assert_eq!(table.read_file("a"), &text[..CLUSTER_COUNT * CLUSTER_DATA_SIZE]);
    assert_eq!(kinds(&journal), vec![EventKind::CreateFile]);
}

#[test]
fn test_out_of_space_on_first_cluster_leaves_file_empty() {
    let mut table = FileTable::new();
    let mut rec = Recorder::replay();
    table
        .write_file("a", &vec![b'a'; CLUSTER_COUNT * CLUSTER_DATA_SIZE], &mut rec)
        .unwrap();

    let result = table.append_file("b", b"x", &mut rec);

    assert!(matches!(result, Err(ChainFsError::OutOfSpace { .. })));
    assert!(table.contains("b"));
    assert_eq!(table.file_size("b"), 0);
    assert!(table.head("b").is_none());
}
