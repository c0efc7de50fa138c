//! Cluster allocation
//!
//! Clusters live in an arena keyed by `ClusterId`. Ids are handed out from a
//! counter that only grows within a session; physical cluster numbers are
//! assigned later, when an image is saved.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use crate::error::{ChainFsError, Result};

use super::{CLUSTER_COUNT, CLUSTER_DATA_SIZE};

/// In-memory handle of an allocated cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

/// A fixed-size storage unit, one link of a file's chain
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Meaningful bytes in `data`; interior clusters are always full
    pub used: u8,

    /// Raw payload
    pub data: [u8; CLUSTER_DATA_SIZE],

    /// Following cluster of the chain, `None` for the tail
    pub next: Option<ClusterId>,
}

impl Cluster {
    fn empty() -> Self {
        Self {
            used: 0,
            data: [0u8; CLUSTER_DATA_SIZE],
            next: None,
        }
    }

    /// The meaningful bytes of this cluster
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.used as usize]
    }

    /// Bytes still free at the end of the payload
    pub fn free_space(&self) -> usize {
        CLUSTER_DATA_SIZE - self.used as usize
    }

    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }
}

/// Hands out clusters up to a hard capacity
///
/// The allocated count is the number of live clusters in the arena, so it
/// can never drift from the chains that own them.
#[derive(Debug)]
pub struct ClusterAllocator {
    clusters: HashMap<ClusterId, Cluster>,
    next_id: u64,
    capacity: usize,
}

impl ClusterAllocator {
    /// Create an empty allocator with the image capacity
    pub fn new() -> Self {
        Self {
            clusters: HashMap::new(),
            next_id: 1,
            capacity: CLUSTER_COUNT,
        }
    }

    /// Allocate a zeroed cluster
    ///
    /// Fails with `OutOfSpace` (allocating nothing) when the capacity is reached.
    pub fn allocate(&mut self) -> Result<ClusterId> {
        if self.clusters.len() >= self.capacity {
            return Err(ChainFsError::OutOfSpace {
                capacity: self.capacity,
            });
        }

        let id = ClusterId(self.next_id);
        self.next_id += 1;
        self.clusters.insert(id, Cluster::empty());
        Ok(id)
    }

    /// Release a whole chain starting at `head`
    ///
    /// Returns the number of clusters released.
    pub fn release(&mut self, head: Option<ClusterId>) -> usize {
        let mut released = 0;
        let mut cursor = head;
        while let Some(id) = cursor {
            let Some(cluster) = self.clusters.remove(&id) else {
                break;
            };
            cursor = cluster.next;
            released += 1;
        }
        released
    }

    /// Drop a single cluster without following its chain
    pub(crate) fn discard(&mut self, id: ClusterId) -> bool {
        self.clusters.remove(&id).is_some()
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn get_mut(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        self.clusters.get_mut(&id)
    }

    /// Iterate a chain from `head` to its tail
    pub fn chain(&self, head: Option<ClusterId>) -> ChainIter<'_> {
        ChainIter {
            allocator: self,
            cursor: head,
        }
    }

    /// Last cluster of the chain starting at `head`
    pub fn tail(&self, head: ClusterId) -> ClusterId {
        self.chain(Some(head))
            .last()
            .map(|(id, _)| id)
            .unwrap_or(head)
    }

    /// Number of clusters currently allocated
    pub fn allocated(&self) -> usize {
        self.clusters.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.allocated() >= self.capacity
    }
}

/// Arena access; ids handed out by this allocator stay valid until released
impl Index<ClusterId> for ClusterAllocator {
    type Output = Cluster;

    fn index(&self, id: ClusterId) -> &Cluster {
        &self.clusters[&id]
    }
}

impl IndexMut<ClusterId> for ClusterAllocator {
    fn index_mut(&mut self, id: ClusterId) -> &mut Cluster {
        self.clusters
            .get_mut(&id)
            .unwrap_or_else(|| panic!("dangling cluster id {:?}", id))
    }
}

impl Default for ClusterAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the clusters of one chain, head first
pub struct ChainIter<'a> {
    allocator: &'a ClusterAllocator,
    cursor: Option<ClusterId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (ClusterId, &'a Cluster);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let cluster = self.allocator.clusters.get(&id)?;
        self.cursor = cluster.next;
        Some((id, cluster))
    }
}
