//! Engine Module
//!
//! The file-system engine that coordinates all components.
//!
//! ## Responsibilities
//! - Route file operations to the file table with a live journal recorder
//! - Run undo windows over a journal snapshot and journal the undo itself
//! - Save/load the whole state as one disk image
//! - Execute parsed shell commands

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::disk::{decode_image, encode_image};
use crate::error::{ChainFsError, Result};
use crate::fs::FileTable;
use crate::journal::{EventKind, Journal, Recorder, SequenceCounter};
use crate::shell::{render, Command};
use crate::undo::Replayer;

/// An engine behind the per-instance exclusive lock callers need for
/// concurrent use
pub type SharedEngine = Arc<Mutex<Engine>>;

/// The file-system engine
///
/// ## Concurrency Model
/// None inside: every operation runs to completion on `&mut self`. Callers
/// sharing an instance wrap it in a `SharedEngine`. Only the sequence
/// counter may be shared between instances (see `with_sequence`).
#[derive(Debug)]
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Files and the clusters they own
    table: FileTable,

    /// Every journaled mutation, newest first
    journal: Journal,
}

impl Engine {
    /// Create an empty engine with its own sequence counter
    pub fn new() -> Self {
        Self::with_sequence(SequenceCounter::new())
    }

    /// Create an empty engine drawing event numbers from `sequence`
    pub fn with_sequence(sequence: SequenceCounter) -> Self {
        Self {
            config: Config::default(),
            table: FileTable::new(),
            journal: Journal::with_sequence(sequence),
        }
    }

    /// Open an engine with the given config
    ///
    /// Loads `config.image_path` when it names an existing file.
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_sequence(config, SequenceCounter::new())
    }

    /// Open an engine with the given config and a shared sequence counter
    pub fn open_with_sequence(config: Config, sequence: SequenceCounter) -> Result<Self> {
        let mut engine = Self::with_sequence(sequence);

        if let Some(path) = config.image_path.as_deref() {
            if path.is_file() {
                engine.load(path)?;
            } else {
                tracing::info!("No image at {}, starting empty", path.display());
            }
        }

        engine.config = config;
        Ok(engine)
    }

    /// Execute a command
    ///
    /// Returns the text to show the user, if any
    pub fn execute(&mut self, command: Command) -> Result<Option<String>> {
        tracing::trace!("Executing {:?}", command);
        match command {
            Command::Touch { name } => {
                self.create_file(&name)?;
                Ok(None)
            }
            Command::Cat { name } => Ok(Some(self.read_file(&name))),
            Command::Write { name, text } => {
                self.write_file(&name, &text)?;
                Ok(None)
            }
            Command::Append { name, text } => {
                self.append_file(&name, &text)?;
                Ok(None)
            }
            Command::Remove { name } => {
                self.delete_file(&name);
                Ok(None)
            }
            Command::Dir => Ok(Some(render::directory_listing(&self.table))),
            Command::ShowLog => Ok(Some(render::journal_listing(&self.journal))),
            Command::Undo { count } => {
                self.undo(count)?;
                Ok(None)
            }
            Command::Save { path } => {
                self.save(&path)?;
                Ok(None)
            }
            Command::Load { path } => {
                self.load(&path)?;
                Ok(None)
            }
            Command::Exit => Ok(None),
        }
    }

    // =========================================================================
    // File Operations
    // =========================================================================

    /// Create an empty file, or clear an existing one
    pub fn create_file(&mut self, name: &str) -> Result<()> {
        self.table
            .create_file(name, &mut Recorder::live(&mut self.journal))
    }

    /// Replace the content of a file (creating it when absent)
    pub fn write_file(&mut self, name: &str, text: &str) -> Result<()> {
        self.table
            .write_file(name, text.as_bytes(), &mut Recorder::live(&mut self.journal))
    }

    /// Append to a file (creating it when absent)
    pub fn append_file(&mut self, name: &str, text: &str) -> Result<()> {
        self.table
            .append_file(name, text.as_bytes(), &mut Recorder::live(&mut self.journal))
    }

    /// Delete a file; absent files are ignored
    pub fn delete_file(&mut self, name: &str) {
        self.table
            .delete_file(name, &mut Recorder::live(&mut self.journal))
    }

    /// Content of a file as text; empty for absent or empty files
    pub fn read_file(&self, name: &str) -> String {
        String::from_utf8_lossy(&self.table.read_file(name)).into_owned()
    }

    /// Raw content of a file
    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        self.table.read_file(name)
    }

    /// Size of a file in bytes; 0 for absent or empty files
    pub fn file_size(&self, name: &str) -> usize {
        self.table.file_size(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    // =========================================================================
    // Undo
    // =========================================================================

    /// Undo the `count` most recent journaled operations
    ///
    /// Fails with `InvalidRange` (changing nothing) unless
    /// `0 <= count <= journal size`. A successful non-zero undo is itself
    /// journaled as an Undo event, so it can be undone in turn.
    pub fn undo(&mut self, count: i64) -> Result<()> {
        let available = self.journal.len();
        let window = usize::try_from(count)
            .ok()
            .filter(|&n| n <= available)
            .ok_or(ChainFsError::InvalidRange {
                requested: count,
                available,
            })?;

        if window == 0 {
            return Ok(());
        }

        let snapshot = self.journal.snapshot();
        Replayer::new(&mut self.table, &snapshot).undo_window(0, window)?;

        self.journal
            .record(EventKind::Undo, "", window.to_string());
        tracing::info!(count = window, "Undo complete");
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the engine state to a disk image, defragmenting clusters
    pub fn save(&self, path: &Path) -> Result<()> {
        let image = encode_image(&self.table, &self.journal);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&image)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        tracing::info!(
            "Saved {} files, {} clusters, {} events to {}",
            self.table.len(),
            self.table.allocated(),
            self.journal.len(),
            path.display()
        );
        Ok(())
    }

    /// Replace the engine state with a disk image
    ///
    /// The current state is dropped first: on failure the engine is empty.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.table = FileTable::new();
        self.journal.clear();

        let image = fs::read(path)?;
        let decoded = decode_image(&image)?;
        self.journal.replace(decoded.events)?;
        self.table = decoded.table;

        tracing::info!(
            "Loaded {} files, {} clusters, {} events from {}",
            self.table.len(),
            self.table.allocated(),
            self.journal.len(),
            path.display()
        );
        Ok(())
    }

    /// Close the engine, saving to the configured image when requested
    pub fn close(self) -> Result<()> {
        if self.config.save_on_close {
            if let Some(path) = self.config.image_path.as_deref() {
                self.save(path)?;
            }
        }
        Ok(())
    }

    /// Wrap the engine in its exclusive lock
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn table(&self) -> &FileTable {
        &self.table
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Number of clusters in use
    pub fn allocated_clusters(&self) -> usize {
        self.table.allocated()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
