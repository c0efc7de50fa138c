//! # ChainFS
//!
//! An educational block file system living in one disk image, with:
//! - Files stored as singly-linked chains of 255-byte clusters
//! - A fixed capacity of 255 clusters and 255 directory entries
//! - Defragmenting save / validating load of a byte-exact image format
//! - A journal of every mutation supporting multi-level undo (and undo of undo)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Shell (one session)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                              │
//! │        (live recorder for calls, replay for undo)           │
//! └──────┬──────────────────────┬───────────────────────┬───────┘
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//!  ┌───────────┐         ┌─────────────┐         ┌─────────────┐
//!  │   Undo    │────────▶│ File Table  │────────▶│   Journal   │
//!  │ (replay)  │         │  (BTreeMap) │ record  │ (newest 1st)│
//!  └───────────┘         └──────┬──────┘         └──────┬──────┘
//!                               │                       │
//!                               ▼                       │
//!                        ┌─────────────┐                │
//!                        │  Clusters   │                │
//!                        │ (allocator) │                │
//!                        └──────┬──────┘                │
//!                               ▼                       ▼
//!                        ┌─────────────────────────────────┐
//!                        │        Disk image codec         │
//!                        └─────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod disk;
pub mod fs;
pub mod journal;
pub mod shell;
pub mod engine;

mod undo;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChainFsError, Result};
pub use config::Config;
pub use engine::{Engine, SharedEngine};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ChainFS
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
