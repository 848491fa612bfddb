//! On-disk layout of the configuration root.
//!
//! ```text
//! <config_root>/
//!   hyprctl.json            active configuration
//!   collections/
//!     home.json             snapshot "home"
//!     work.json             snapshot "work"
//! ```
//!
//! [`StorageLayout`] is built once at start-up and handed by reference to
//! whatever needs to find these files.  Nothing in the workspace holds the
//! root as global state.

use std::path::{Path, PathBuf};

use crate::domain::collection::collection_file_name;

/// Fixed file name of the active configuration inside the root.
pub const ACTIVE_CONFIG_FILE: &str = "hyprctl.json";

/// Name of the subdirectory holding collection snapshots.
pub const COLLECTIONS_DIR: &str = "collections";

/// Paths derived from a single configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    config_root: PathBuf,
}

impl StorageLayout {
    /// Creates a layout rooted at `config_root`.
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
        }
    }

    /// The configuration root directory.
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Path of the active configuration file.
    pub fn active_config_path(&self) -> PathBuf {
        self.config_root.join(ACTIVE_CONFIG_FILE)
    }

    /// Directory that holds every collection snapshot.
    pub fn collections_dir(&self) -> PathBuf {
        self.config_root.join(COLLECTIONS_DIR)
    }

    /// Path of the snapshot for `name`.
    ///
    /// `name` is used verbatim.  Callers that accept user input for a new
    /// snapshot must run it through
    /// [`sanitize_name`](crate::domain::collection::sanitize_name) first.
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.collections_dir().join(collection_file_name(name))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
