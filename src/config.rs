//! Configuration for ChainFS
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a ChainFS engine instance
#[derive(Debug, Clone, Default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Image Configuration
    // -------------------------------------------------------------------------
    /// Disk image loaded on open (when the file exists) and written on close
    /// (when `save_on_close` is set)
    pub image_path: Option<PathBuf>,

    /// Save the engine to `image_path` when it is closed
    pub save_on_close: bool,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the disk image path
    pub fn image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.image_path = Some(path.into());
        self
    }

    /// Save to the image path on close
    pub fn save_on_close(mut self, enabled: bool) -> Self {
        self.config.save_on_close = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
