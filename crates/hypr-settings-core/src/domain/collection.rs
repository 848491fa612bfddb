//! Collection naming rules.
//!
//! A collection is stored as `<collections_dir>/<name>.json`.  The name doubles
//! as the label shown to the user, so the only transformation applied on save
//! is [`sanitize_name`], which neutralises path separators.

use std::path::PathBuf;

use thiserror::Error;

/// File extension (without the dot) that marks a file as a collection.
pub const COLLECTION_EXTENSION: &str = "json";

/// Characters replaced by [`sanitize_name`].
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Replacement for every path separator found in a collection name.
const SEPARATOR_REPLACEMENT: char = '_';

/// Error type for collection operations.
///
/// The public store operations report these only through logs and a `false`
/// return value; the enum exists so the failure reason is still typed up to
/// the point where it is reported.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The caller passed an empty collection name.
    #[error("collection name must not be empty")]
    EmptyName,

    /// No snapshot file exists at the expected path.
    #[error("collection not found at {path}")]
    NotFound { path: PathBuf },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectionError {
    /// Wraps an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejects names that cannot identify a collection.
///
/// # Errors
///
/// Returns [`CollectionError::EmptyName`] when `name` is empty.  Whitespace is
/// *not* trimmed here; the entry dialog trims before calling the store.
pub fn validate_name(name: &str) -> Result<(), CollectionError> {
    if name.is_empty() {
        return Err(CollectionError::EmptyName);
    }
    Ok(())
}

/// Replaces every `/` and `\` in `name` with `_`.
///
/// The result can be joined onto the collection directory without addressing
/// anything outside of it.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if PATH_SEPARATORS.contains(&c) {
                SEPARATOR_REPLACEMENT
            } else {
                c
            }
        })
        .collect()
}

/// Returns the file name a collection called `name` is stored under.
pub fn collection_file_name(name: &str) -> String {
    format!("{name}.{COLLECTION_EXTENSION}")
}

/// Extracts the collection name from a directory entry's file name.
///
/// Returns `None` when the file does not carry the collection marker.
pub fn collection_name_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(COLLECTION_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_replaces_forward_slash() {
        assert_eq!(sanitize_name("a/b"), "a_b");
    }

    #[test]
    fn test_sanitize_name_replaces_backslash() {
        assert_eq!(sanitize_name(r"a\b\c"), "a_b_c");
    }

    #[test]
    fn test_sanitize_name_neutralises_parent_traversal() {
        // Arrange
        let hostile = "../../etc/passwd";

        // Act
        let sanitized = sanitize_name(hostile);

        // Assert – dots survive but no separator does, so the name is a
        // single path component.
        assert_eq!(sanitized, ".._.._etc_passwd");
        assert_eq!(std::path::Path::new(&sanitized).components().count(), 1);
    }

    #[test]
    fn test_sanitize_name_leaves_plain_names_untouched() {
        assert_eq!(sanitize_name("work setup"), "work setup");
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(validate_name(""), Err(CollectionError::EmptyName)));
    }

    #[test]
    fn test_validate_name_accepts_whitespace_only() {
        // Trimming is the dialog's job, not the store's.
        assert!(validate_name("  ").is_ok());
    }

    #[test]
    fn test_collection_file_name_appends_marker() {
        assert_eq!(collection_file_name("home"), "home.json");
    }

    #[test]
    fn test_collection_name_from_file_name_strips_marker() {
        assert_eq!(collection_name_from_file_name("work.json"), Some("work"));
    }

    #[test]
    fn test_collection_name_from_file_name_keeps_inner_dots() {
        assert_eq!(
            collection_name_from_file_name("v1.2.json"),
            Some("v1.2")
        );
    }

    #[test]
    fn test_collection_name_from_file_name_ignores_other_extensions() {
        assert_eq!(collection_name_from_file_name("notes.txt"), None);
        assert_eq!(collection_name_from_file_name("archive.json.bak"), None);
        assert_eq!(collection_name_from_file_name("json"), None);
    }

    #[test]
    fn test_collection_name_from_file_name_requires_dot_before_marker() {
        assert_eq!(collection_name_from_file_name("notjson"), None);
    }

    #[test]
    fn test_collection_error_io_display_contains_path() {
        let err = CollectionError::io(
            "/tmp/x.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x.json"), "got {msg}");
        assert!(msg.contains("denied"), "got {msg}");
    }
}
