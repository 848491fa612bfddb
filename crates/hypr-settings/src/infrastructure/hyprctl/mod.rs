//! Applies the active configuration to a running Hyprland instance.
//!
//! The active configuration (`hyprctl.json`) is a flat list of Hyprland
//! keywords and their values.  Applying it means issuing one
//! `hyprctl keyword <key> <value>` per entry; all of them are sent in a single
//! `hyprctl --batch` invocation.
//!
//! Two JSON layouts are understood:
//!
//! ```json
//! { "general:gaps_in": 5, "decoration:rounding": 10 }
//! ```
//!
//! ```json
//! [ { "key": "general:gaps_in", "value": "5" } ]
//! ```
//!
//! Keywords are applied in file order for both layouts.  A key or value that
//! contains `;` or a line break is rejected, since `hyprctl` would split it
//! into separate instructions.

use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;
use tracing::{debug, info};

use crate::application::manage_collections::{ApplyError, ConfigApplier};

/// Default program used to talk to the compositor.
pub const DEFAULT_HYPRCTL_PROGRAM: &str = "hyprctl";

/// Separator between instructions in a `--batch` argument.
const BATCH_SEPARATOR: &str = " ; ";

/// Characters `hyprctl` treats as instruction boundaries inside `--batch`.
const BATCH_BREAKS: &[char] = &[';', '\n', '\r'];

/// [`ConfigApplier`] that feeds the active configuration to `hyprctl`.
#[derive(Debug, Clone)]
pub struct HyprctlApplier {
    program: String,
    active_config: PathBuf,
}

impl HyprctlApplier {
    /// Creates an applier that reads `active_config` and runs `program`.
    pub fn new(program: impl Into<String>, active_config: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            active_config: active_config.into(),
        }
    }

    /// Reads the active configuration and turns it into keyword instructions.
    ///
    /// # Errors
    ///
    /// [`ApplyError::Read`], [`ApplyError::Parse`] or [`ApplyError::Shape`].
    pub fn instructions(&self) -> Result<Vec<String>, ApplyError> {
        let content =
            std::fs::read_to_string(&self.active_config).map_err(|source| ApplyError::Read {
                path: self.active_config.clone(),
                source,
            })?;
        let json: Value = serde_json::from_str(&content)?;
        keyword_instructions(&json)
    }
}

impl ConfigApplier for HyprctlApplier {
    fn apply(&self) -> Result<(), ApplyError> {
        let instructions = self.instructions()?;
        if instructions.is_empty() {
            debug!("active configuration is empty, nothing to apply");
            return Ok(());
        }

        let batch = instructions.join(BATCH_SEPARATOR);
        debug!("{} --batch {batch}", self.program);

        let output = Command::new(&self.program)
            .arg("--batch")
            .arg(&batch)
            .output()
            .map_err(|source| ApplyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ApplyError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("applied {} keyword(s) via {}", instructions.len(), self.program);
        Ok(())
    }
}

/// [`ConfigApplier`] that does nothing.  Used when applying is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopApplier;

impl ConfigApplier for NoopApplier {
    fn apply(&self) -> Result<(), ApplyError> {
        debug!("applying is disabled, skipping");
        Ok(())
    }
}

/// Converts a parsed active configuration into `keyword <key> <value>` lines.
///
/// # Errors
///
/// Returns [`ApplyError::Shape`] when the JSON is neither a keyword object nor
/// an array of `{ "key", "value" }` entries, or when a value is not a scalar.
pub fn keyword_instructions(json: &Value) -> Result<Vec<String>, ApplyError> {
    match json {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| keyword(key, value))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| -> Result<String, ApplyError> {
                let key = item.get("key").and_then(Value::as_str).ok_or_else(|| {
                    ApplyError::Shape(format!("entry without a string \"key\": {item}"))
                })?;
                let value = item
                    .get("value")
                    .ok_or_else(|| ApplyError::Shape(format!("entry without a \"value\": {item}")))?;
                keyword(key, value)
            })
            .collect(),
        other => Err(ApplyError::Shape(format!(
            "expected an object or an array, found {}",
            json_kind(other)
        ))),
    }
}

fn keyword(key: &str, value: &Value) -> Result<String, ApplyError> {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(ApplyError::Shape(format!(
                "value of {key} must be a scalar, found {}",
                json_kind(other)
            )))
        }
    };
    if let Some(bad) = [key, rendered.as_str()]
        .into_iter()
        .find(|part| part.contains(BATCH_BREAKS))
    {
        return Err(ApplyError::Shape(format!(
            "keyword {key} cannot be batched: {bad:?} contains ';' or a line break"
        )));
    }
    Ok(format!("keyword {key} {rendered}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
