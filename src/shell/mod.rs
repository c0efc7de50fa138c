//! Shell Module
//!
//! Text command surface of the interactive session.
//!
//! ## Commands
//! - `touch <name>`      create an empty file (or empty an existing one)
//! - `cat <name>`        print a file
//! - `cat ><name>`       overwrite a file with the next input line
//! - `cat >><name>`      append the next input line to a file
//! - `rm -f <name>`      delete a file
//! - `dir`               list files with their sizes
//! - `show log`          print the journal, newest first
//! - `undo <n>`          undo the last n journaled operations
//! - `save <path>`       write the disk image
//! - `load <path>`       replace the state with a disk image
//! - `exit`              leave the session

mod command;
pub mod render;

pub use command::Command;

use crate::error::ChainFsError;

/// Shown when an undo count is out of range
pub const INVALID_UNDO_MESSAGE: &str =
    "Cannot undo: the count must be between 0 and the number of journaled actions";

/// User-facing message for an error
pub fn error_message(error: &ChainFsError) -> String {
    match error {
        ChainFsError::InvalidRange { .. } => INVALID_UNDO_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
