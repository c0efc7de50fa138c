//! Error types for ChainFS
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ChainFsError
pub type Result<T> = std::result::Result<T, ChainFsError>;

/// Unified error type for ChainFS operations
#[derive(Debug, Error)]
pub enum ChainFsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Space Errors
    // -------------------------------------------------------------------------
    #[error("Out of space: all {capacity} clusters are allocated")]
    OutOfSpace { capacity: usize },

    #[error("Directory full: at most {capacity} files fit in the directory table")]
    DirectoryFull { capacity: usize },

    // -------------------------------------------------------------------------
    // Image Errors
    // -------------------------------------------------------------------------
    #[error("Malformed disk image: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Journal Errors
    // -------------------------------------------------------------------------
    #[error("Journal corruption detected: {0}")]
    JournalCorruption(String),

    #[error("Invalid undo count {requested}: the journal holds {available} events")]
    InvalidRange { requested: i64, available: usize },

    // -------------------------------------------------------------------------
    // Shell Errors
    // -------------------------------------------------------------------------
    #[error("Command error: {0}")]
    Command(String),
}
