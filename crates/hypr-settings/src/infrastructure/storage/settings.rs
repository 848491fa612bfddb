//! TOML-based persistence of the tool's own settings.
//!
//! Reads and writes `AppSettings` to
//! `$XDG_CONFIG_HOME/hypr-settings/settings.toml` (falling back to
//! `~/.config/hypr-settings/settings.toml`).
//!
//! ```toml
//! [storage]
//! config_root = "/home/me/.config/com.ml4w.hyprlandsettings"
//!
//! [apply]
//! enabled = true
//! hyprctl_program = "hyprctl"
//!
//! [logging]
//! log_level = "info"
//! ```
//!
//! Every field has a serde default, so the tool works on first run (before a
//! settings file exists) and with files written by older versions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hypr_settings_core::StorageLayout;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::manage_collections::ConfigApplier;
use crate::infrastructure::hyprctl::{HyprctlApplier, NoopApplier, DEFAULT_HYPRCTL_PROGRAM};

/// Directory name of this tool below the platform config directory.
const SETTINGS_DIR_NAME: &str = "hypr-settings";

/// File name of the settings file.
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Directory name of the Hyprland settings library below the platform config
/// directory.  This is where `hyprctl.json` and `collections/` live.
const CONFIG_ROOT_DIR_NAME: &str = "com.ml4w.hyprlandsettings";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub apply: ApplySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the active configuration and the collections live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Configuration root.  `None` means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_root: Option<PathBuf>,
}

/// How a loaded collection is applied to the compositor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplySettings {
    /// Whether loading a collection re-applies it immediately.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Program invoked with `--batch` to apply keywords.
    #[serde(default = "default_hyprctl_program")]
    pub hyprctl_program: String,
}

/// Logging behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// Overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_hyprctl_program() -> String {
    DEFAULT_HYPRCTL_PROGRAM.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            hyprctl_program: default_hyprctl_program(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppSettings {
    /// Resolves the storage layout: the explicit `config_root` if set,
    /// otherwise the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] when no root is
    /// configured and the platform default cannot be determined.
    pub fn storage_layout(&self) -> Result<StorageLayout, SettingsError> {
        let root = match &self.storage.config_root {
            Some(root) => root.clone(),
            None => default_config_root()?,
        };
        Ok(StorageLayout::new(root))
    }

    /// Builds the applier described by the `[apply]` section for `layout`.
    pub fn applier(&self, layout: &StorageLayout) -> Arc<dyn ConfigApplier> {
        if self.apply.enabled {
            Arc::new(HyprctlApplier::new(
                self.apply.hyprctl_program.clone(),
                layout.active_config_path(),
            ))
        } else {
            Arc::new(NoopApplier)
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(platform_config_dir()
        .ok_or(SettingsError::NoPlatformConfigDir)?
        .join(SETTINGS_DIR_NAME)
        .join(SETTINGS_FILE_NAME))
}

/// Default configuration root of the Hyprland settings library.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn default_config_root() -> Result<PathBuf, SettingsError> {
    Ok(platform_config_dir()
        .ok_or(SettingsError::NoPlatformConfigDir)?
        .join(CONFIG_ROOT_DIR_NAME))
}

/// Loads `AppSettings` from the default location.
///
/// # Errors
///
/// See [`load_settings_from`].
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads `AppSettings` from `path`, returning defaults if the file does not
/// exist yet.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `settings` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        // XDG_CONFIG_HOME or ~/.config; an empty XDG_CONFIG_HOME counts as unset.
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
