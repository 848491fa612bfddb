//! # hypr-settings-core
//!
//! Shared library for the Hyprland settings tool containing the rules that
//! govern *collections*: named snapshots of the active configuration file.
//!
//! This crate has zero dependencies on the file system, child processes or UI
//! frameworks.  It only decides *what* the paths and names are; the
//! `hypr-settings` crate performs the actual I/O.
//!
//! - **`domain::collection`** – name sanitization, the `.json` marker, and the
//!   error taxonomy shared by every collection operation.
//! - **`domain::layout`** – [`StorageLayout`], the explicit description of the
//!   configuration root and where the active file and the collection directory
//!   live inside it.

pub mod domain;

// Re-export the most-used items at the crate root so callers can write
// `hypr_settings_core::StorageLayout` instead of the full module path.
pub use domain::collection::{
    collection_file_name, collection_name_from_file_name, sanitize_name, validate_name,
    CollectionError, COLLECTION_EXTENSION,
};
pub use domain::layout::{StorageLayout, ACTIVE_CONFIG_FILE, COLLECTIONS_DIR};
