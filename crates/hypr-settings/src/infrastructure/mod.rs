//! Infrastructure layer.
//!
//! Contains OS-facing adapters: the settings file, the `hyprctl` applier and
//! the command bridge that front-ends call into.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hypr_settings_core`, but MUST NOT be imported by the `application` layer.

pub mod applier_mock;
pub mod hyprctl;
pub mod storage;
pub mod ui_bridge;
