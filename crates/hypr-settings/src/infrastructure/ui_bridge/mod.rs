//! Command bridge: exposes the collection operations to front-ends.
//!
//! A GUI shell, an IPC endpoint or the bundled CLI call the async functions
//! in this module.  Each one locks the shared [`AppState`], runs one store or
//! panel operation, and answers with a [`CommandResult`] whose JSON shape is
//! always `{ success: bool, data: T | null, error: string | null }`.
//!
//! # Synchronisation
//!
//! [`CollectionStore`] has no synchronisation of its own: two overlapping
//! saves of the same name would race on the file system.  Every command here
//! goes through a single `tokio::sync::Mutex`, so operations are applied one
//! at a time no matter how many front-end requests are in flight.
//!
//! # Failure mapping
//!
//! The store reports save/delete/load-copy failures only as `false`; the
//! bridge turns those into short `CommandResult::err` messages.  An error from
//! re-applying a loaded configuration is passed through with its full text.

use std::sync::Arc;

use hypr_settings_core::sanitize_name;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{
    collections_panel::{CollectionsPanel, Dialog, PanelAction, PanelOutcome, PanelView},
    manage_collections::CollectionStore,
};

// ── Shared application state ──────────────────────────────────────────────────

/// State shared by every command.
///
/// Lock order is `store` then `panel`.
pub struct AppState {
    /// The collection store.  The mutex is the only thing serialising access.
    pub store: Mutex<CollectionStore>,
    /// The collections panel and its registered refresh callbacks.
    pub panel: Mutex<CollectionsPanel>,
}

impl AppState {
    /// Wraps `store` with a fresh panel.
    pub fn new(store: CollectionStore) -> Arc<Self> {
        Self::with_panel(store, CollectionsPanel::new())
    }

    /// Wraps `store` with a panel that already has refresh callbacks attached.
    pub fn with_panel(store: CollectionStore, panel: CollectionsPanel) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            panel: Mutex::new(panel),
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Result of a save: the name the snapshot was stored under and whether an
/// existing snapshot was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub name: String,
    pub overwritten: bool,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the names of all collections in lexicographic order.
pub async fn get_collections(state: Arc<AppState>) -> CommandResult<Vec<String>> {
    let store = state.store.lock().await;
    CommandResult::ok(store.list_collections())
}

/// Returns the full panel view.
pub async fn get_panel(state: Arc<AppState>) -> CommandResult<PanelView> {
    let store = state.store.lock().await;
    let panel = state.panel.lock().await;
    CommandResult::ok(panel.render(&store))
}

/// Saves the active configuration as `name`.
pub async fn save_collection(state: Arc<AppState>, name: String) -> CommandResult<SaveReport> {
    if name.is_empty() {
        return CommandResult::err("collection name must not be empty");
    }

    let store = state.store.lock().await;
    let stored_as = sanitize_name(&name);
    let overwritten = store.collection_exists(&stored_as);
    if !store.save_collection(&name) {
        return CommandResult::err(format!("could not save collection '{name}'"));
    }
    if overwritten {
        debug!("collection '{stored_as}' replaced an existing snapshot");
    }
    CommandResult::ok(SaveReport {
        name: stored_as,
        overwritten,
    })
}

/// Loads collection `name` into the active configuration and applies it.
pub async fn load_collection(state: Arc<AppState>, name: String) -> CommandResult<()> {
    let store = state.store.lock().await;
    match store.load_collection(&name) {
        Ok(true) => CommandResult::ok(()),
        Ok(false) if !store.collection_exists(&name) => {
            CommandResult::err(format!("collection '{name}' not found"))
        }
        Ok(false) => CommandResult::err(format!("could not load collection '{name}'")),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Deletes collection `name`.
pub async fn delete_collection(state: Arc<AppState>, name: String) -> CommandResult<()> {
    let store = state.store.lock().await;
    if !store.collection_exists(&name) {
        return CommandResult::err(format!("collection '{name}' not found"));
    }
    if !store.delete_collection(&name) {
        return CommandResult::err(format!("could not delete collection '{name}'"));
    }
    CommandResult::ok(())
}

/// Returns the dialog to present for `action`.
pub async fn request_dialog(state: Arc<AppState>, action: PanelAction) -> CommandResult<Dialog> {
    let panel = state.panel.lock().await;
    CommandResult::ok(panel.request(action))
}

/// Routes a dialog response through the panel.
///
/// Succeeds for cancelled, blank and failed outcomes too; the outcome itself
/// tells the front-end what happened.  Only an apply error is reported as a
/// failed command.
pub async fn respond_to_dialog(
    state: Arc<AppState>,
    dialog: Dialog,
    response: String,
    entry_text: String,
) -> CommandResult<PanelOutcome> {
    let store = state.store.lock().await;
    let mut panel = state.panel.lock().await;
    match panel.respond(&store, &dialog, &response, &entry_text) {
        Ok(outcome) => CommandResult::ok(outcome),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
