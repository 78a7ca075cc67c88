//! Database configuration.
//!
//! The core only cares about the on-disk path and its own version stamp; the
//! three boolean toggles below are honoured by external components (the
//! crawler and scheduler), not by anything in this crate. They travel with
//! the config struct anyway so a single sidecar file can describe the whole
//! system's settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How `Database::open` should treat a missing or existing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail if the path does not already contain a database.
    Open,
    /// Open an existing database, or create one if the path is empty/missing.
    CreateIfMissing,
    /// Create a new database; fail if one already exists at the path.
    Create,
}

/// Top-level configuration for a `Database` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the KV backend's files and the version stamp.
    pub path: PathBuf,

    /// Whether the crawler should descend into dot-directories and index
    /// dot-files. Not consulted by the core.
    #[serde(default)]
    pub index_hidden: bool,

    /// Whether the scheduler may crawl while running on battery. Not
    /// consulted by the core.
    #[serde(default)]
    pub index_on_battery: bool,

    /// Enables verbose diagnostics in external components. Not consulted by
    /// the core beyond being threaded through so one config file covers the
    /// whole system.
    #[serde(default)]
    pub debug_mode: bool,
}

impl Config {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index_hidden: false,
            index_on_battery: false,
            debug_mode: false,
        }
    }

    pub fn with_index_hidden(mut self, value: bool) -> Self {
        self.index_hidden = value;
        self
    }

    pub fn with_index_on_battery(mut self, value: bool) -> Self {
        self.index_on_battery = value;
        self
    }

    pub fn with_debug_mode(mut self, value: bool) -> Self {
        self.debug_mode = value;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
