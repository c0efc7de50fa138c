//! Tests for the cluster allocator
//!
//! These tests verify:
//! - Fresh clusters are zeroed and unlinked
//! - The hard capacity of 255 clusters
//! - Chain release and the allocated count
//! - Chain iteration order

use chainfs::disk::{ClusterAllocator, ClusterId, CLUSTER_COUNT, CLUSTER_DATA_SIZE};
use chainfs::ChainFsError;

// =============================================================================
// Helper Functions
// =============================================================================

/// Allocate `len` clusters linked in allocation order, returning their ids
fn build_chain(allocator: &mut ClusterAllocator, len: usize) -> Vec<ClusterId> {
    let ids: Vec<ClusterId> = (0..len).map(|_| allocator.allocate().unwrap()).collect();
    for pair in ids.windows(2) {
        allocator[pair[0]].next = Some(pair[1]);
    }
    ids
}

// =============================================================================
// Allocation Tests
// =============================================================================

#[test]
fn test_new_allocator_is_empty() {
    let allocator = ClusterAllocator::new();

    assert_eq!(allocator.allocated(), 0);
    assert_eq!(allocator.capacity(), CLUSTER_COUNT);
    assert!(!allocator.is_full());
}

#[test]
fn test_allocate_returns_zeroed_cluster() {
    let mut allocator = ClusterAllocator::new();

    let id = allocator.allocate().unwrap();
    let cluster = allocator.get(id).unwrap();

    assert_eq!(cluster.used, 0);
    assert!(cluster.next.is_none());
    assert!(cluster.data.iter().all(|&b| b == 0));
    assert_eq!(cluster.free_space(), CLUSTER_DATA_SIZE);
    assert!(cluster.payload().is_empty());
    assert_eq!(allocator.allocated(), 1);
}

#[test]
fn test_allocate_until_out_of_space() {
    let mut allocator = ClusterAllocator::new();

    for _ in 0..CLUSTER_COUNT {
        allocator.allocate().unwrap();
    }
    assert!(allocator.is_full());

    let result = allocator.allocate();
    assert!(matches!(
        result,
        Err(ChainFsError::OutOfSpace { capacity }) if capacity == CLUSTER_COUNT
    ));

    // Nothing was allocated by the failed call
    assert_eq!(allocator.allocated(), CLUSTER_COUNT);
}

#[test]
fn test_ids_are_not_reused_after_release() {
    let mut allocator = ClusterAllocator::new();

    let first = allocator.allocate().unwrap();
    allocator.release(Some(first));
    let second = allocator.allocate().unwrap();

    assert_ne!(first, second);
    assert!(allocator.get(first).is_none());
    assert_eq!(allocator.allocated(), 1);
}

// =============================================================================
// Release Tests
// =============================================================================

#[test]
fn test_release_whole_chain() {
    let mut allocator = ClusterAllocator::new();
    let ids = build_chain(&mut allocator, 3);
    let other = allocator.allocate().unwrap();

    let released = allocator.release(Some(ids[0]));

    assert_eq!(released, 3);
    assert_eq!(allocator.allocated(), 1);
    assert!(ids.iter().all(|&id| allocator.get(id).is_none()));
    assert!(allocator.get(other).is_some());
}

#[test]
fn test_release_none_is_noop() {
    let mut allocator = ClusterAllocator::new();
    allocator.allocate().unwrap();

    assert_eq!(allocator.release(None), 0);
    assert_eq!(allocator.allocated(), 1);
}

#[test]
fn test_release_frees_capacity() {
    let mut allocator = ClusterAllocator::new();
    let ids = build_chain(&mut allocator, CLUSTER_COUNT);
    assert!(allocator.allocate().is_err());

    allocator.release(Some(ids[0]));

    assert_eq!(allocator.allocated(), 0);
    assert!(allocator.allocate().is_ok());
}

// =============================================================================
// Chain Tests
// =============================================================================

#[test]
fn test_chain_iterates_head_to_tail() {
    let mut allocator = ClusterAllocator::new();
    let ids = build_chain(&mut allocator, 4);

    let walked: Vec<ClusterId> = allocator.chain(Some(ids[0])).map(|(id, _)| id).collect();

    assert_eq!(walked, ids);
    assert_eq!(allocator.tail(ids[0]), ids[3]);
    assert_eq!(allocator.tail(ids[3]), ids[3]);
}

#[test]
fn test_chain_of_none_is_empty() {
    let allocator = ClusterAllocator::new();
    assert_eq!(allocator.chain(None).count(), 0);
}

#[test]
fn test_cluster_payload_tracks_used_bytes() {
    let mut allocator = ClusterAllocator::new();
    let id = allocator.allocate().unwrap();

    let cluster = &mut allocator[id];
    cluster.data[..3].copy_from_slice(b"abc");
    cluster.used = 3;

    assert_eq!(allocator[id].payload(), b"abc");
    assert_eq!(allocator[id].free_space(), CLUSTER_DATA_SIZE - 3);
    assert!(!allocator[id].is_full());

    allocator[id].used = CLUSTER_DATA_SIZE as u8;
    assert!(allocator[id].is_full());
    assert_eq!(allocator[id].free_space(), 0);
}
