//! Event Journal Module
//!
//! Append-only record of every mutating file operation, newest first.
//!
//! ## Responsibilities
//! - Assign process-wide sequence numbers to new events
//! - Keep events ordered by descending sequence
//! - Suppress recording while the undo engine replays operations
//! - Serialize/deserialize the journal section of a disk image
//!
//! ## Section Format
//! ```text
//! ┌────────────┬──────────────┐
//! │ DigLen (1) │ Count digits │
//! └────────────┴──────────────┘
//! Then, for each event (newest first):
//! ┌──────────┬─────────┬──────┬────────────┬────────────┬──────┬──────────┬──────────┬──────────┬───────────┐
//! │ Kind (1) │ Len (1) │ Name │ DigLen (1) │ Len digits │ Text │ Len (1)  │ DD.MM... │DigLen (1)│ Seq digits│
//! └──────────┴─────────┴──────┴────────────┴────────────┴──────┴──────────┴──────────┴──────────┴───────────┘
//! ```

mod codec;
mod event;
mod log;
mod recorder;
mod sequence;

pub use codec::{decode_journal, encode_journal};
pub use event::{Event, EventKind, TIMESTAMP_FORMAT};
pub use log::Journal;
pub use recorder::Recorder;
pub use sequence::SequenceCounter;
