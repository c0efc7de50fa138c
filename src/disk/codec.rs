//! Disk image codec
//!
//! Converts a file table and its journal to/from one flat byte image.
//! Saving always defragments: clusters are renumbered 1..=N following the
//! table's name order, so the free space is always a single tail range.

use std::collections::{BTreeMap, HashSet};

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{ChainFsError, Result};
use crate::fs::FileTable;
use crate::journal::{decode_journal, encode_journal, Event, Journal};

use super::{
    ClusterAllocator, ClusterId, CLUSTER_AREA_OFFSET, CLUSTER_COUNT, CLUSTER_DATA_SIZE,
    CLUSTER_SLOT_SIZE, DIRECTORY_OFFSET, DIR_ENTRY_SIZE, FREE_MAP_SIZE, JOURNAL_OFFSET,
    MAX_NAME_LEN,
};

/// Engine state recovered from an image
#[derive(Debug)]
pub struct DecodedImage {
    pub table: FileTable,

    /// Events in stored order (newest first for images this crate writes)
    pub events: Vec<Event>,
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode the whole engine state, defragmenting clusters on the way
pub fn encode_image(table: &FileTable, journal: &Journal) -> Bytes {
    let mut image = BytesMut::zeroed(JOURNAL_OFFSET);

    // Step 1: Directory and clusters, numbering clusters in table order
    let mut next_number = 1usize;
    for (slot, (name, head)) in table.entries().enumerate() {
        let offset = DIRECTORY_OFFSET + slot * DIR_ENTRY_SIZE;
        let entry = &mut image[offset..offset + DIR_ENTRY_SIZE];
        let name = name.as_bytes();
        entry[0] = name.len() as u8;
        entry[1..1 + name.len()].copy_from_slice(name);
        entry[DIR_ENTRY_SIZE - 1] = if head.is_some() { next_number as u8 } else { 0 };

        for (_, cluster) in table.clusters().chain(head) {
            let offset = cluster_offset(next_number);
            let slot = &mut image[offset..offset + CLUSTER_SLOT_SIZE];
            slot[0] = cluster.used;
            slot[1] = if cluster.next.is_some() {
                (next_number + 1) as u8
            } else {
                0
            };
            slot[2..2 + cluster.used as usize].copy_from_slice(cluster.payload());
            next_number += 1;
        }
    }
    let written = next_number - 1;
    debug_assert_eq!(written, table.allocated());

    // Step 2: File count and free-space descriptor
    image[FREE_MAP_SIZE] = table.len() as u8;
    if written >= CLUSTER_COUNT {
        image[0] = 0;
        image[1] = 0;
    } else {
        image[0] = (written + 1) as u8;
        image[1] = CLUSTER_COUNT as u8;
    }

    // Step 3: Journal, newest first
    encode_journal(journal.iter(), &mut image);

    tracing::debug!(
        files = table.len(),
        clusters = written,
        events = journal.len(),
        bytes = image.len(),
        "Image encoded"
    );
    image.freeze()
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an image into a fresh file table and its journal events
pub fn decode_image(image: &[u8]) -> Result<DecodedImage> {
    if image.len() < JOURNAL_OFFSET {
        return Err(ChainFsError::Format(format!(
            "image truncated: expected at least {} bytes, got {}",
            JOURNAL_OFFSET,
            image.len()
        )));
    }

    // Step 1: Which cluster numbers hold data
    let occupied = parse_free_map(&image[..FREE_MAP_SIZE])?;

    // Step 2: Load every occupied cluster, remembering its on-disk link
    let mut clusters = ClusterAllocator::new();
    let mut ids: [Option<ClusterId>; CLUSTER_COUNT + 1] = [None; CLUSTER_COUNT + 1];
    let mut links = Vec::new();
    for number in (1..=CLUSTER_COUNT).filter(|&n| occupied[n]) {
        let offset = cluster_offset(number);
        let slot = &image[offset..offset + CLUSTER_SLOT_SIZE];

        let id = clusters.allocate()?;
        let cluster = &mut clusters[id];
        cluster.used = slot[0];
        cluster.data.copy_from_slice(&slot[2..]);
        ids[number] = Some(id);

        if slot[1] != 0 {
            links.push((number, id, slot[1] as usize));
        }
    }

    // Step 3: Link chains
    for (number, id, next) in links {
        let target = ids[next].ok_or_else(|| {
            ChainFsError::Format(format!("cluster {} links to free cluster {}", number, next))
        })?;
        clusters[id].next = Some(target);
    }

    // Step 4: Directory
    let file_count = image[FREE_MAP_SIZE] as usize;
    let mut entries = BTreeMap::new();
    for slot in 0..file_count {
        let offset = DIRECTORY_OFFSET + slot * DIR_ENTRY_SIZE;
        let entry = &image[offset..offset + DIR_ENTRY_SIZE];

        let name_len = entry[0] as usize;
        if name_len > MAX_NAME_LEN {
            return Err(ChainFsError::Format(format!(
                "directory slot {}: name length {} exceeds {}",
                slot, name_len, MAX_NAME_LEN
            )));
        }
        let name = std::str::from_utf8(&entry[1..1 + name_len]).map_err(|_| {
            ChainFsError::Format(format!("directory slot {}: name is not valid UTF-8", slot))
        })?;

        let head = match entry[DIR_ENTRY_SIZE - 1] as usize {
            0 => None,
            number => Some(ids[number].ok_or_else(|| {
                ChainFsError::Format(format!(
                    "file {:?} starts at free cluster {}",
                    name, number
                ))
            })?),
        };

        if entries.insert(name.to_string(), head).is_some() {
            return Err(ChainFsError::Format(format!("duplicate file name {:?}", name)));
        }
    }

    // Step 5: Every chain must be exclusive, acyclic and full up to its tail
    let mut reached = HashSet::new();
    for (name, head) in &entries {
        let mut cursor = *head;
        while let Some(id) = cursor {
            if !reached.insert(id) {
                return Err(ChainFsError::Format(format!(
                    "chain of file {:?} reuses a cluster",
                    name
                )));
            }
            let cluster = &clusters[id];
            if cluster.next.is_some() && cluster.used as usize != CLUSTER_DATA_SIZE {
                return Err(ChainFsError::Format(format!(
                    "chain of file {:?} has a partially used interior cluster",
                    name
                )));
            }
            cursor = cluster.next;
        }
    }

    let orphans: Vec<ClusterId> = ids
        .iter()
        .flatten()
        .copied()
        .filter(|id| !reached.contains(id))
        .collect();
    if !orphans.is_empty() {
        tracing::warn!(clusters = orphans.len(), "Discarding clusters not owned by any file");
        for id in orphans {
            clusters.discard(id);
        }
    }

    // Step 6: Journal
    let mut rest = &image[JOURNAL_OFFSET..];
    let events = decode_journal(&mut rest)?;
    if rest.has_remaining() {
        tracing::debug!(bytes = rest.remaining(), "Ignoring bytes after the journal");
    }

    Ok(DecodedImage {
        table: FileTable::from_parts(entries, clusters),
        events,
    })
}

/// Parse the free-space descriptor into an occupancy table indexed by
/// cluster number (index 0 unused)
fn parse_free_map(map: &[u8]) -> Result<[bool; CLUSTER_COUNT + 1]> {
    let mut occupied = [false; CLUSTER_COUNT + 1];
    // First cluster number not yet classified
    let mut cursor = 1usize;

    for pair in map.chunks_exact(2) {
        let (start, end) = (pair[0] as usize, pair[1] as usize);

        if start == 0 && end == 0 {
            occupied[cursor..].fill(true);
            return Ok(occupied);
        }

        if start < cursor || end < start {
            return Err(ChainFsError::Format(format!(
                "free-space range [{}, {}] is out of order",
                start, end
            )));
        }

        occupied[cursor..start].fill(true);
        if end == CLUSTER_COUNT {
            return Ok(occupied);
        }
        cursor = end + 1;
    }

    Err(ChainFsError::Format(
        "free-space descriptor has no terminating range".to_string(),
    ))
}

/// Byte offset of the slot for cluster `number` (1-based)
fn cluster_offset(number: usize) -> usize {
    CLUSTER_AREA_OFFSET + (number - 1) * CLUSTER_SLOT_SIZE
}
