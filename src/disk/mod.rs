//! Disk Module
//!
//! Cluster storage and the flat disk image format.
//!
//! ## Responsibilities
//! - Hand out clusters up to the fixed capacity
//! - Own every cluster chain through numbered slots
//! - Encode/decode the whole engine state to one byte image
//! - Defragment cluster numbering on every save
//!
//! ## Image Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Free-space descriptor (256)                              │
//! │   [start][end] pairs of free cluster ranges              │
//! │   terminated by end == 255 or by a (0, 0) pair           │
//! ├──────────────────────────────────────────────────────────┤
//! │ File count (1)                                           │
//! ├──────────────────────────────────────────────────────────┤
//! │ Directory: 255 slots × 128                               │
//! │   [NameLen (1)][Name (126)][HeadCluster (1)]             │
//! ├──────────────────────────────────────────────────────────┤
//! │ Clusters: 255 slots × 257                                │
//! │   [UsedBytes (1)][NextCluster (1)][Data (255)]           │
//! ├──────────────────────────────────────────────────────────┤
//! │ Journal (variable, see journal::codec)                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Cluster numbers run 1..=255; 0 means "no cluster".

mod cluster;
mod codec;

pub use cluster::{ChainIter, Cluster, ClusterAllocator, ClusterId};
pub use codec::{decode_image, encode_image, DecodedImage};

// =============================================================================
// Layout Constants
// =============================================================================

/// Number of cluster slots in an image
pub const CLUSTER_COUNT: usize = 255;

/// Payload bytes per cluster
pub const CLUSTER_DATA_SIZE: usize = 255;

/// On-disk cluster slot: used (1) + next (1) + data (255)
pub const CLUSTER_SLOT_SIZE: usize = 2 + CLUSTER_DATA_SIZE;

/// Size of the free-space descriptor
pub const FREE_MAP_SIZE: usize = 256;

/// On-disk directory slot: name_len (1) + name (126) + head (1)
pub const DIR_ENTRY_SIZE: usize = 128;

/// Maximum file name length in bytes
pub const MAX_NAME_LEN: usize = 126;

/// Maximum number of directory entries
pub const MAX_FILES: usize = CLUSTER_COUNT;

/// Offset of the directory table (after free map and file count)
pub const DIRECTORY_OFFSET: usize = FREE_MAP_SIZE + 1;

/// Offset of the cluster area
pub const CLUSTER_AREA_OFFSET: usize = DIRECTORY_OFFSET + MAX_FILES * DIR_ENTRY_SIZE;

/// Offset of the journal (end of the fixed-size part of the image)
pub const JOURNAL_OFFSET: usize = CLUSTER_AREA_OFFSET + CLUSTER_COUNT * CLUSTER_SLOT_SIZE;
