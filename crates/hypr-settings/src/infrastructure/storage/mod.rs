//! Storage infrastructure: settings file persistence.
//!
//! The `settings` sub-module reads and writes the tool's own TOML settings
//! (where the configuration root is, how to apply a loaded configuration,
//! the log level).  The collection snapshots themselves are handled by the
//! application-layer store, since they are plain file copies.

pub mod settings;
