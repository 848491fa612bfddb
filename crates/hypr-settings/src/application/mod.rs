//! Application layer use cases.
//!
//! Code here orchestrates the domain rules from `hypr-settings-core` to fulfil
//! a user goal.  It depends on abstractions (the [`ConfigApplier`] trait)
//! rather than on concrete infrastructure, so the store can be exercised in
//! tests without a running compositor.
//!
//! # Sub-modules
//!
//! - **`manage_collections`** – The collection store: save, list, load and
//!   delete named snapshots of the active configuration.
//!
//! - **`collections_panel`** – Toolkit-free view model of the "Collections"
//!   settings group: rows, confirmation dialogs, and response routing.
//!
//! [`ConfigApplier`]: manage_collections::ConfigApplier

pub mod collections_panel;
pub mod manage_collections;
