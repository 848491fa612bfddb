//! CollectionsPanel: view model of the "Collections" settings group.
//!
//! The panel describes what a front-end should show without depending on any
//! widget toolkit:
//!
//! ```text
//! ┌ Collections ───────────────────────────────────────────────┐
//! │ Save and load different Hyprland configurations            │
//! │                          [Save Current Settings as Collection]
//! │ home                                        [open] [delete] │
//! │ work                                        [open] [delete] │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Interaction is a two-step exchange.  A click becomes a [`PanelAction`];
//! [`CollectionsPanel::request`] turns it into a [`Dialog`] for the front-end
//! to present; the user's choice comes back through
//! [`CollectionsPanel::respond`], which runs the store operation.  After a
//! successful operation the panel re-renders and hands the new view to every
//! callback registered with [`CollectionsPanel::on_refresh`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::manage_collections::{ApplyError, CollectionStore};

pub const GROUP_TITLE: &str = "Collections";
pub const GROUP_DESCRIPTION: &str = "Save and load different Hyprland configurations";
pub const ADD_BUTTON_LABEL: &str = "Save Current Settings as Collection";

/// Response id that dismisses any dialog.
pub const RESPONSE_CANCEL: &str = "cancel";
pub const RESPONSE_SAVE: &str = "save";
pub const RESPONSE_LOAD: &str = "load";
pub const RESPONSE_DELETE: &str = "delete";

/// Something the user asked the panel to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum PanelAction {
    /// Save the active configuration under a name entered in the dialog.
    Save,
    /// Load the named collection.
    Load(String),
    /// Delete the named collection.
    Delete(String),
}

/// Visual emphasis of a button or dialog response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    Default,
    Suggested,
    Destructive,
}

/// A button attached to a collection row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowButton {
    pub action: PanelAction,
    pub icon_name: &'static str,
    pub tooltip: &'static str,
    pub appearance: Appearance,
}

/// One listed collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRow {
    pub name: String,
    pub buttons: Vec<RowButton>,
}

/// Everything a front-end needs to draw the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub title: &'static str,
    pub description: &'static str,
    pub add_button_label: &'static str,
    pub rows: Vec<CollectionRow>,
}

/// One choice offered by a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogResponse {
    pub id: String,
    pub label: String,
    pub appearance: Appearance,
}

/// A dialog the front-end must present before an action runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub action: PanelAction,
    pub heading: String,
    pub body: String,
    pub responses: Vec<DialogResponse>,
    /// Whether the dialog carries a single-line text entry (the save dialog).
    pub has_entry: bool,
}

impl Dialog {
    /// Id of the response that confirms the action.
    pub fn accept_id(&self) -> &'static str {
        match self.action {
            PanelAction::Save => RESPONSE_SAVE,
            PanelAction::Load(_) => RESPONSE_LOAD,
            PanelAction::Delete(_) => RESPONSE_DELETE,
        }
    }
}

/// What happened after a dialog response was routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "view", rename_all = "snake_case")]
pub enum PanelOutcome {
    /// The user dismissed the dialog.
    Cancelled,
    /// The save dialog was confirmed with a blank name.
    EmptyName,
    /// The store reported failure; nothing to refresh.
    Failed,
    /// The operation succeeded and the panel was re-rendered.
    Refreshed(PanelView),
}

type RefreshHandler = Box<dyn FnMut(&PanelView) + Send>;

/// View model and response router for the collections group.
#[derive(Default)]
pub struct CollectionsPanel {
    refresh_handlers: Vec<RefreshHandler>,
}

impl CollectionsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked with the fresh view after every successful
    /// operation.
    pub fn on_refresh(&mut self, handler: impl FnMut(&PanelView) + Send + 'static) {
        self.refresh_handlers.push(Box::new(handler));
    }

    /// Builds the view from the store's current listing.
    pub fn render(&self, store: &CollectionStore) -> PanelView {
        let rows = store
            .list_collections()
            .into_iter()
            .map(|name| CollectionRow {
                buttons: vec![
                    RowButton {
                        action: PanelAction::Load(name.clone()),
                        icon_name: "folder-open-symbolic",
                        tooltip: "Load this collection",
                        appearance: Appearance::Default,
                    },
                    RowButton {
                        action: PanelAction::Delete(name.clone()),
                        icon_name: "edit-delete-symbolic",
                        tooltip: "Delete this collection",
                        appearance: Appearance::Destructive,
                    },
                ],
                name,
            })
            .collect();

        PanelView {
            title: GROUP_TITLE,
            description: GROUP_DESCRIPTION,
            add_button_label: ADD_BUTTON_LABEL,
            rows,
        }
    }

    /// Describes the dialog to present for `action`.
    pub fn request(&self, action: PanelAction) -> Dialog {
        let (heading, body, accept_label, appearance, has_entry) = match &action {
            PanelAction::Save => (
                "Save Collection".to_string(),
                "Enter a name for your collection".to_string(),
                "Save",
                Appearance::Suggested,
                true,
            ),
            PanelAction::Load(name) => (
                "Load Collection".to_string(),
                format!(
                    "Are you sure you want to load the collection '{name}'?\n\
                     This will replace your current settings."
                ),
                "Load",
                Appearance::Suggested,
                false,
            ),
            PanelAction::Delete(name) => (
                "Delete Collection".to_string(),
                format!("Are you sure you want to delete the collection '{name}'?"),
                "Delete",
                Appearance::Destructive,
                false,
            ),
        };

        let mut dialog = Dialog {
            action,
            heading,
            body,
            responses: Vec::new(),
            has_entry,
        };
        dialog.responses = vec![
            DialogResponse {
                id: RESPONSE_CANCEL.to_string(),
                label: "Cancel".to_string(),
                appearance: Appearance::Default,
            },
            DialogResponse {
                id: dialog.accept_id().to_string(),
                label: accept_label.to_string(),
                appearance,
            },
        ];
        dialog
    }

    /// Routes the user's `response` to `dialog`.
    ///
    /// `entry_text` is the content of the save dialog's entry; it is trimmed
    /// and ignored for the other dialogs.  Any response other than the
    /// dialog's accept id counts as a cancel.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApplyError`] of a load whose snapshot was copied but
    /// could not be applied.
    pub fn respond(
        &mut self,
        store: &CollectionStore,
        dialog: &Dialog,
        response: &str,
        entry_text: &str,
    ) -> Result<PanelOutcome, ApplyError> {
        if response != dialog.accept_id() {
            debug!("dialog '{}' dismissed with '{response}'", dialog.heading);
            return Ok(PanelOutcome::Cancelled);
        }

        let succeeded = match &dialog.action {
            PanelAction::Save => {
                let name = entry_text.trim();
                if name.is_empty() {
                    return Ok(PanelOutcome::EmptyName);
                }
                store.save_collection(name)
            }
            PanelAction::Load(name) => store.load_collection(name)?,
            PanelAction::Delete(name) => store.delete_collection(name),
        };

        if !succeeded {
            return Ok(PanelOutcome::Failed);
        }
        Ok(PanelOutcome::Refreshed(self.refresh(store)))
    }

    fn refresh(&mut self, store: &CollectionStore) -> PanelView {
        let view = self.render(store);
        for handler in &mut self.refresh_handlers {
            handler(&view);
        }
        view
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use hypr_settings_core::StorageLayout;
    use uuid::Uuid;

    use crate::application::manage_collections::MockConfigApplier;

    fn temp_store(applier: MockConfigApplier) -> CollectionStore {
        let root = std::env::temp_dir().join(format!("hypr_settings_panel_{}", Uuid::new_v4()));
        let layout = StorageLayout::new(root);
        let store = CollectionStore::open(&layout, Arc::new(applier)).expect("open store");
        std::fs::write(layout.active_config_path(), "{}").unwrap();
        store
    }

    fn idle_applier() -> MockConfigApplier {
        let mut applier = MockConfigApplier::new();
        applier.expect_apply().never();
        applier
    }

    fn cleanup(store: &CollectionStore) {
        std::fs::remove_dir_all(store.layout().config_root()).ok();
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_empty_store_has_header_and_no_rows() {
        let store = temp_store(idle_applier());
        let view = CollectionsPanel::new().render(&store);

        assert_eq!(view.title, "Collections");
        assert_eq!(view.add_button_label, "Save Current Settings as Collection");
        assert!(view.rows.is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_render_lists_rows_with_load_and_delete_buttons() {
        // Arrange
        let store = temp_store(idle_applier());
        assert!(store.save_collection("work"));
        assert!(store.save_collection("home"));

        // Act
        let view = CollectionsPanel::new().render(&store);

        // Assert
        let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["home", "work"]);
        let buttons = &view.rows[0].buttons;
        assert_eq!(buttons[0].action, PanelAction::Load("home".to_string()));
        assert_eq!(buttons[1].action, PanelAction::Delete("home".to_string()));
        assert_eq!(buttons[1].appearance, Appearance::Destructive);

        cleanup(&store);
    }

    // ── request ───────────────────────────────────────────────────────────────

    #[test]
    fn test_request_save_dialog_has_entry_and_suggested_save() {
        let dialog = CollectionsPanel::new().request(PanelAction::Save);

        assert_eq!(dialog.heading, "Save Collection");
        assert!(dialog.has_entry);
        assert_eq!(dialog.responses[0].id, "cancel");
        assert_eq!(dialog.responses[1].id, "save");
        assert_eq!(dialog.responses[1].appearance, Appearance::Suggested);
    }

    #[test]
    fn test_request_load_dialog_warns_about_replacement() {
        let dialog = CollectionsPanel::new().request(PanelAction::Load("work".to_string()));

        assert_eq!(dialog.heading, "Load Collection");
        assert_eq!(
            dialog.body,
            "Are you sure you want to load the collection 'work'?\nThis will replace your current settings."
        );
        assert!(!dialog.has_entry);
    }

    #[test]
    fn test_request_delete_dialog_is_destructive() {
        let dialog = CollectionsPanel::new().request(PanelAction::Delete("old".to_string()));

        assert_eq!(dialog.accept_id(), "delete");
        assert_eq!(dialog.responses[1].appearance, Appearance::Destructive);
    }

    // ── respond ───────────────────────────────────────────────────────────────

    #[test]
    fn test_respond_save_trims_name_and_refreshes() {
        // Arrange
        let store = temp_store(idle_applier());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut panel = CollectionsPanel::new();
        let sink = Arc::clone(&seen);
        panel.on_refresh(move |view| sink.lock().unwrap().push(view.rows.len()));
        let dialog = panel.request(PanelAction::Save);

        // Act
        let outcome = panel
            .respond(&store, &dialog, RESPONSE_SAVE, "  gaming  ")
            .expect("save never propagates");

        // Assert
        assert!(matches!(outcome, PanelOutcome::Refreshed(ref v) if v.rows[0].name == "gaming"));
        assert_eq!(*seen.lock().unwrap(), vec![1]);

        cleanup(&store);
    }

    #[test]
    fn test_respond_save_with_blank_entry_does_nothing() {
        let store = temp_store(idle_applier());
        let mut panel = CollectionsPanel::new();
        let dialog = panel.request(PanelAction::Save);

        let outcome = panel.respond(&store, &dialog, RESPONSE_SAVE, "   ").unwrap();

        assert_eq!(outcome, PanelOutcome::EmptyName);
        assert!(store.list_collections().is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_respond_cancel_skips_operation_and_refresh() {
        // Arrange
        let store = temp_store(idle_applier());
        assert!(store.save_collection("keep"));
        let refreshed = Arc::new(Mutex::new(0));
        let mut panel = CollectionsPanel::new();
        let counter = Arc::clone(&refreshed);
        panel.on_refresh(move |_| *counter.lock().unwrap() += 1);
        let dialog = panel.request(PanelAction::Delete("keep".to_string()));

        // Act
        let outcome = panel.respond(&store, &dialog, RESPONSE_CANCEL, "").unwrap();

        // Assert
        assert_eq!(outcome, PanelOutcome::Cancelled);
        assert_eq!(store.list_collections(), vec!["keep".to_string()]);
        assert_eq!(*refreshed.lock().unwrap(), 0);

        cleanup(&store);
    }

    #[test]
    fn test_respond_with_wrong_accept_id_counts_as_cancel() {
        let store = temp_store(idle_applier());
        assert!(store.save_collection("keep"));
        let mut panel = CollectionsPanel::new();
        let dialog = panel.request(PanelAction::Delete("keep".to_string()));

        let outcome = panel.respond(&store, &dialog, RESPONSE_LOAD, "").unwrap();

        assert_eq!(outcome, PanelOutcome::Cancelled);
        assert!(store.collection_exists("keep"));

        cleanup(&store);
    }

    #[test]
    fn test_respond_delete_missing_reports_failed_without_refresh() {
        let store = temp_store(idle_applier());
        let refreshed = Arc::new(Mutex::new(0));
        let mut panel = CollectionsPanel::new();
        let counter = Arc::clone(&refreshed);
        panel.on_refresh(move |_| *counter.lock().unwrap() += 1);
        let dialog = panel.request(PanelAction::Delete("ghost".to_string()));

        let outcome = panel.respond(&store, &dialog, RESPONSE_DELETE, "").unwrap();

        assert_eq!(outcome, PanelOutcome::Failed);
        assert_eq!(*refreshed.lock().unwrap(), 0);

        cleanup(&store);
    }

    #[test]
    fn test_respond_load_propagates_apply_error() {
        // Arrange
        let mut applier = MockConfigApplier::new();
        applier
            .expect_apply()
            .times(1)
            .returning(|| Err(ApplyError::Shape("broken".to_string())));
        let store = temp_store(applier);
        assert!(store.save_collection("x"));
        let mut panel = CollectionsPanel::new();
        let dialog = panel.request(PanelAction::Load("x".to_string()));

        // Act
        let result = panel.respond(&store, &dialog, RESPONSE_LOAD, "");

        // Assert
        assert!(matches!(result, Err(ApplyError::Shape(_))));

        cleanup(&store);
    }

    #[test]
    fn test_dialog_serializes_action_with_tag() {
        let dialog = CollectionsPanel::new().request(PanelAction::Load("work".to_string()));
        let json = serde_json::to_value(&dialog).unwrap();
        assert_eq!(json["action"]["kind"], "load");
        assert_eq!(json["action"]["name"], "work");
    }
}
