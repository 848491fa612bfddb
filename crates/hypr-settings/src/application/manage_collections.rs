//! CollectionStore: named snapshots of the active configuration.
//!
//! The store copies one file back and forth:
//!
//! ```text
//!  save "work":  <root>/hyprctl.json  ──copy──▶  <root>/collections/work.json
//!  load "work":  <root>/collections/work.json  ──copy──▶  <root>/hyprctl.json
//!                then ConfigApplier::apply()
//! ```
//!
//! # Failure contract
//!
//! `save_collection`, `delete_collection` and the copy half of
//! `load_collection` never return an error: any failure is logged with
//! `tracing::warn!` and reported as `false`.  The one exception is the
//! [`ConfigApplier`] call that follows a successful load; its error is handed
//! back to the caller unchanged as `Err(ApplyError)`.
//!
//! # Concurrency
//!
//! The store assumes a single actor.  Two concurrent saves of the same name
//! race with last-writer-wins semantics.  Shared access must go through an
//! external lock (the command bridge wraps the store in a mutex).

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hypr_settings_core::{
    collection_name_from_file_name, sanitize_name, validate_name, CollectionError, StorageLayout,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error raised while re-applying the active configuration after a load.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The apply program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The apply program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The active configuration could not be read.
    #[error("failed to read active configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The active configuration is not valid JSON.
    #[error("active configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The active configuration is JSON but not a shape that maps to keywords.
    #[error("unsupported active configuration layout: {0}")]
    Shape(String),
}

/// Re-applies the active configuration to the running compositor.
///
/// Called by [`CollectionStore::load_collection`] after the snapshot has been
/// copied over the active configuration file.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigApplier: Send + Sync {
    /// Applies the current contents of the active configuration.
    fn apply(&self) -> Result<(), ApplyError>;
}

/// Manages named snapshots of the active configuration file.
pub struct CollectionStore {
    layout: StorageLayout,
    applier: Arc<dyn ConfigApplier>,
}

impl CollectionStore {
    /// Creates a store over `layout` without touching the file system.
    pub fn new(layout: &StorageLayout, applier: Arc<dyn ConfigApplier>) -> Self {
        Self {
            layout: layout.clone(),
            applier,
        }
    }

    /// Creates a store and makes sure the collection directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Io`] if the directory cannot be created.
    pub fn open(
        layout: &StorageLayout,
        applier: Arc<dyn ConfigApplier>,
    ) -> Result<Self, CollectionError> {
        let store = Self::new(layout, applier);
        store.ensure_storage_ready()?;
        Ok(store)
    }

    /// The layout this store reads and writes.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Creates the collection directory (and its parents) if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Io`] on an unwritable file system.
    pub fn ensure_storage_ready(&self) -> Result<(), CollectionError> {
        let dir = self.layout.collections_dir();
        fs::create_dir_all(&dir).map_err(|e| CollectionError::io(&dir, e))
    }

    /// Returns the names of all collections in lexicographic order.
    ///
    /// A missing or unreadable collection directory yields an empty list.
    pub fn list_collections(&self) -> Vec<String> {
        let dir = self.layout.collections_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("collection directory {} does not exist", dir.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("cannot read collection directory {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if entry.file_type().ok()?.is_dir() {
                    return None;
                }
                let file_name = entry.file_name().into_string().ok()?;
                collection_name_from_file_name(&file_name).map(str::to_owned)
            })
            .collect();
        names.sort();
        names
    }

    /// Returns `true` if a snapshot file exists for `name` (used verbatim).
    pub fn collection_exists(&self, name: &str) -> bool {
        self.layout.collection_path(name).exists()
    }

    /// Saves the active configuration as collection `name`.
    ///
    /// Path separators in `name` are replaced with `_`.  An existing
    /// collection with the same name is overwritten.
    ///
    /// Returns `false` for an empty name or when the copy fails.  A failed copy
    /// leaves no partial snapshot behind.
    pub fn save_collection(&self, name: &str) -> bool {
        match self.try_save(name) {
            Ok(path) => {
                info!("saved collection '{name}' to {}", path.display());
                true
            }
            Err(CollectionError::EmptyName) => {
                debug!("refusing to save a collection with an empty name");
                false
            }
            Err(e) => {
                warn!("error saving collection '{name}': {e}");
                false
            }
        }
    }

    /// Replaces the active configuration with collection `name` and applies it.
    ///
    /// `name` is used verbatim to locate the snapshot.
    ///
    /// Returns `Ok(false)` when the snapshot does not exist or the copy fails;
    /// in both cases the active configuration is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`ApplyError`] of the configured applier if re-applying the
    /// freshly copied configuration fails.  The copy is not rolled back.
    pub fn load_collection(&self, name: &str) -> Result<bool, ApplyError> {
        let snapshot = match self.existing_collection(name) {
            Ok(path) => path,
            Err(e) => {
                debug!("cannot load collection '{name}': {e}");
                return Ok(false);
            }
        };

        let active = self.layout.active_config_path();
        if let Err(e) = copy_preserving_metadata(&snapshot, &active) {
            warn!("error loading collection '{name}': {e}");
            return Ok(false);
        }

        info!("loaded collection '{name}' into {}", active.display());
        self.applier.apply()?;
        Ok(true)
    }

    /// Deletes collection `name` (used verbatim).
    ///
    /// Returns `false` if it does not exist or cannot be removed.
    pub fn delete_collection(&self, name: &str) -> bool {
        let path = match self.existing_collection(name) {
            Ok(path) => path,
            Err(e) => {
                debug!("cannot delete collection '{name}': {e}");
                return false;
            }
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted collection '{name}'");
                true
            }
            Err(e) => {
                warn!(
                    "error deleting collection '{name}': {}",
                    CollectionError::io(&path, e)
                );
                false
            }
        }
    }

    /// Path of the snapshot for `name`, or [`CollectionError::NotFound`].
    fn existing_collection(&self, name: &str) -> Result<PathBuf, CollectionError> {
        let path = self.layout.collection_path(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(CollectionError::NotFound { path })
        }
    }

    fn try_save(&self, name: &str) -> Result<PathBuf, CollectionError> {
        validate_name(name)?;
        let target = self.layout.collection_path(&sanitize_name(name));
        copy_preserving_metadata(&self.layout.active_config_path(), &target)?;
        Ok(target)
    }
}

/// File name of the hidden staging file a copy is written to before being
/// renamed over its target.  It does not depend on the target name, so any
/// target name the file system accepts can be staged.
const STAGING_FILE_NAME: &str = ".staging.tmp";

/// Staging file in the same directory as `target`.
fn staging_path(target: &Path) -> PathBuf {
    target.with_file_name(STAGING_FILE_NAME)
}

/// Copies `src` to `dst` with permissions and timestamps, replacing `dst`.
///
/// The data is written to a staging file next to `dst` and renamed into place,
/// so `dst` is either fully replaced or not touched at all.
fn copy_preserving_metadata(src: &Path, dst: &Path) -> Result<(), CollectionError> {
    let staging = staging_path(dst);
    let result = stage_copy(src, &staging).and_then(|()| {
        fs::rename(&staging, dst).map_err(|e| CollectionError::io(dst, e))
    });
    if result.is_err() {
        // The staging file may or may not exist depending on where it failed.
        let _ = fs::remove_file(&staging);
    }
    result
}

fn stage_copy(src: &Path, staging: &Path) -> Result<(), CollectionError> {
    let mut reader = File::open(src).map_err(|e| CollectionError::io(src, e))?;
    let metadata = reader.metadata().map_err(|e| CollectionError::io(src, e))?;

    let mut writer = File::create(staging).map_err(|e| CollectionError::io(staging, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| CollectionError::io(staging, e))?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    writer
        .set_times(times)
        .map_err(|e| CollectionError::io(staging, e))?;
    drop(writer);

    // Permissions last: a read-only source would otherwise block set_times.
    fs::set_permissions(staging, metadata.permissions())
        .map_err(|e| CollectionError::io(staging, e))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
