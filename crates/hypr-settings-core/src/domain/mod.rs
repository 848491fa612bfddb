//! Domain rules for collections.
//!
//! Everything here is pure: functions take strings and paths and return
//! strings and paths.  Code in the outer layers (application, infrastructure)
//! depends on these rules, but they never depend on those layers, which keeps
//! them trivially unit-testable on any platform.

/// Naming rules and the error taxonomy for collection snapshots.
pub mod collection;

/// Where the active configuration and the collection directory live.
pub mod layout;
