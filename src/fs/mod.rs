//! File Table Module
//!
//! Maps file names to the cluster chains holding their content.
//!
//! ## Responsibilities
//! - Create, write, append, clear and delete files
//! - Grow chains cluster by cluster through the allocator
//! - Report each mutation to the journal through a `Recorder`
//!
//! ## Data Structure Choice
//! Entries live in a BTreeMap keyed by name. The ordering matters: a saved
//! image numbers clusters in name order.

mod table;

pub use table::{truncate_name, FileTable};
