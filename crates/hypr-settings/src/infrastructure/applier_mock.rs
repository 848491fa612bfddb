//! Recording configuration applier for tests.
//!
//! The real [`HyprctlApplier`](super::hyprctl::HyprctlApplier) talks to a
//! running compositor, which is not available in CI.  `RecordingApplier`
//! instead snapshots the active configuration each time it is asked to apply
//! it, so a test can check both *that* apply ran and *what* it saw.
//!
//! # Usage in tests
//!
//! ```ignore
//! let applier = Arc::new(RecordingApplier::new(layout.active_config_path()));
//! let store = CollectionStore::open(&layout, applier.clone())?;
//!
//! store.load_collection("work")?;
//!
//! assert_eq!(applier.applied().len(), 1);
//! ```
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return
//! [`ApplyError::Failed`], which exercises the propagation path of
//! `load_collection`.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::application::manage_collections::{ApplyError, ConfigApplier};

/// Applier that records the active configuration contents on every call.
#[derive(Debug, Default)]
pub struct RecordingApplier {
    active_config: PathBuf,
    /// Contents of the active configuration at each `apply` call, in order.
    /// `None` when the file could not be read at that moment.
    pub applied: Mutex<Vec<Option<String>>>,
    /// When `true`, `apply` records the call and then fails.
    pub should_fail: bool,
}

impl RecordingApplier {
    /// Creates an applier that reads `active_config` when applying.
    pub fn new(active_config: impl Into<PathBuf>) -> Self {
        Self {
            active_config: active_config.into(),
            ..Self::default()
        }
    }

    /// Creates an applier whose every call fails.
    pub fn failing(active_config: impl Into<PathBuf>) -> Self {
        Self {
            should_fail: true,
            ..Self::new(active_config)
        }
    }

    /// Returns a copy of everything recorded so far.
    pub fn applied(&self) -> Vec<Option<String>> {
        self.applied
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ConfigApplier for RecordingApplier {
    fn apply(&self) -> Result<(), ApplyError> {
        let snapshot = std::fs::read_to_string(&self.active_config).ok();
        if let Ok(mut applied) = self.applied.lock() {
            applied.push(snapshot);
        }
        if self.should_fail {
            return Err(ApplyError::Failed {
                program: "recording-applier".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    #[test]
    fn test_recording_applier_captures_file_contents() {
        // Arrange
        let path = std::env::temp_dir().join(format!("hypr_settings_rec_{}.json", Uuid::new_v4()));
        std::fs::write(&path, "{}").unwrap();
        let applier = RecordingApplier::new(&path);

        // Act
        applier.apply().unwrap();

        // Assert
        assert_eq!(applier.applied(), vec![Some("{}".to_string())]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_recording_applier_records_missing_file_as_none() {
        let applier = RecordingApplier::new("/nonexistent/hyprctl.json");
        applier.apply().unwrap();
        assert_eq!(applier.applied(), vec![None]);
    }

    #[test]
    fn test_failing_applier_records_then_fails() {
        let applier = RecordingApplier::failing("/nonexistent/hyprctl.json");

        let result = applier.apply();

        assert!(matches!(result, Err(ApplyError::Failed { .. })));
        assert_eq!(applier.applied().len(), 1);
    }
}
