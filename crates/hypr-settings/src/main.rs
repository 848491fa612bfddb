//! Hyprland settings collections, command-line front-end.
//!
//! Saves, lists, loads and deletes named snapshots ("collections") of the
//! active Hyprland settings file.
//!
//! # Usage
//!
//! ```text
//! hypr-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list     List collection names
//!   save     Save the active configuration as a collection
//!   load     Replace the active configuration with a collection and apply it
//!   delete   Delete a collection
//!   panel    Print the collections panel
//!
//! Options:
//!   --config-root <PATH>   Configuration root [env: HYPR_SETTINGS_ROOT]
//!   --settings <PATH>      Settings file      [env: HYPR_SETTINGS_FILE]
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load settings            -- settings.toml, defaults if absent
//!  └─ init tracing             -- RUST_LOG, else logging.log_level
//!  └─ CollectionStore::open()  -- creates <root>/collections
//!  └─ AppState::with_panel()   -- store + panel behind async mutexes
//!  └─ ui_bridge::<command>()   -- every subcommand goes through the bridge
//! ```
//!
//! Command output goes to stdout; logs and confirmation prompts go to stderr.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hypr_settings_core::StorageLayout;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hypr_settings::application::collections_panel::{
    CollectionsPanel, Dialog, PanelAction, PanelOutcome, RESPONSE_CANCEL,
};
use hypr_settings::application::manage_collections::{CollectionStore, ConfigApplier};
use hypr_settings::infrastructure::hyprctl::NoopApplier;
use hypr_settings::infrastructure::storage::settings::{
    load_settings, load_settings_from, AppSettings, SettingsError,
};
use hypr_settings::infrastructure::ui_bridge::{self, AppState, CommandResult};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Manage named snapshots of the Hyprland settings.
#[derive(Debug, Parser)]
#[command(
    name = "hypr-settings",
    about = "Save, list, load and delete Hyprland settings collections",
    version
)]
struct Cli {
    /// Configuration root holding hyprctl.json and collections/.
    ///
    /// Overrides `storage.config_root` from the settings file.
    #[arg(long, env = "HYPR_SETTINGS_ROOT")]
    config_root: Option<PathBuf>,

    /// Settings file to read instead of the platform default.
    #[arg(long, env = "HYPR_SETTINGS_FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List collection names in lexicographic order.
    List {
        /// Print a JSON array instead of one name per line.
        #[arg(long)]
        json: bool,
    },

    /// Save the active configuration as a collection.
    ///
    /// An existing collection with the same name is replaced.
    Save {
        /// Collection name; `/` and `\` are replaced with `_`.
        name: String,
    },

    /// Replace the active configuration with a collection and apply it.
    Load {
        name: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
        /// Copy the collection without applying it to the compositor.
        #[arg(long)]
        no_apply: bool,
    },

    /// Delete a collection.
    Delete {
        name: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the collections panel (title, rows and their actions).
    Panel {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Loads the settings file named on the command line, or the default one.
    fn load_settings(&self) -> anyhow::Result<AppSettings> {
        let settings = match &self.settings {
            Some(path) => load_settings_from(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            // Without a platform config dir there is no settings file to read.
            None => match load_settings() {
                Err(SettingsError::NoPlatformConfigDir) => AppSettings::default(),
                other => other.context("failed to load settings")?,
            },
        };
        Ok(settings)
    }

    /// Resolves the storage layout, giving `--config-root` precedence.
    fn storage_layout(&self, settings: &AppSettings) -> anyhow::Result<StorageLayout> {
        match &self.config_root {
            Some(root) => Ok(StorageLayout::new(root)),
            None => settings
                .storage_layout()
                .context("failed to resolve the configuration root"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;

    // Initialise structured logging.  `RUST_LOG` wins over the settings file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let layout = cli.storage_layout(&settings)?;
    let applier: Arc<dyn ConfigApplier> = match &cli.command {
        Command::Load { no_apply: true, .. } => Arc::new(NoopApplier),
        _ => settings.applier(&layout),
    };
    let store = CollectionStore::open(&layout, applier).with_context(|| {
        format!(
            "failed to prepare collection directory {}",
            layout.collections_dir().display()
        )
    })?;
    info!("using configuration root {}", layout.config_root().display());

    let mut panel = CollectionsPanel::new();
    panel.on_refresh(|view| debug!("panel refreshed with {} collection(s)", view.rows.len()));

    let state = AppState::with_panel(store, panel);
    run(cli.command, state).await
}

async fn run(command: Command, state: Arc<AppState>) -> anyhow::Result<()> {
    match command {
        Command::List { json } => {
            let names = into_data(ui_bridge::get_collections(state).await)?;
            if json {
                print_json(&names)?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }

        Command::Save { name } => {
            let report = into_data(ui_bridge::save_collection(state, name.trim().to_string()).await)?;
            if report.overwritten {
                println!("replaced collection '{}'", report.name);
            } else {
                println!("saved collection '{}'", report.name);
            }
        }

        Command::Load { name, yes, .. } => {
            confirm_and_run(state, PanelAction::Load(name.clone()), yes).await?;
            println!("loaded collection '{name}'");
        }

        Command::Delete { name, yes } => {
            confirm_and_run(state, PanelAction::Delete(name.clone()), yes).await?;
            println!("deleted collection '{name}'");
        }

        Command::Panel { json } => {
            let view = into_data(ui_bridge::get_panel(state).await)?;
            if json {
                print_json(&view)?;
            } else {
                println!("{}", view.title);
                println!("  {}", view.description);
                println!("  [{}]", view.add_button_label);
                for row in &view.rows {
                    let actions: Vec<&str> = row.buttons.iter().map(|b| b.tooltip).collect();
                    println!("  {:<24} {}", row.name, actions.join(" | "));
                }
            }
        }
    }
    Ok(())
}

/// Presents the action's dialog (unless `assume_yes`) and routes the answer.
async fn confirm_and_run(
    state: Arc<AppState>,
    action: PanelAction,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let dialog = into_data(ui_bridge::request_dialog(Arc::clone(&state), action.clone()).await)?;
    let response = if assume_yes || ask(&dialog)? {
        dialog.accept_id()
    } else {
        RESPONSE_CANCEL
    };

    let outcome = into_data(
        ui_bridge::respond_to_dialog(state, dialog, response.to_string(), String::new())
            .await,
    )?;

    match (outcome, &action) {
        (PanelOutcome::Refreshed(_), _) => Ok(()),
        (PanelOutcome::Cancelled, _) => bail!("cancelled"),
        (_, PanelAction::Load(name)) => bail!("could not load collection '{name}'"),
        (_, PanelAction::Delete(name)) => bail!("could not delete collection '{name}'"),
        (_, PanelAction::Save) => bail!("could not save collection"),
    }
}

/// Prints the dialog to stderr and reads a yes/no answer from stdin.
fn ask(dialog: &Dialog) -> anyhow::Result<bool> {
    let mut stderr = std::io::stderr();
    writeln!(stderr, "{}", dialog.heading)?;
    write!(stderr, "{} [y/N] ", dialog.body)?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Unwraps a bridge response, turning `success: false` into an error.
fn into_data<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    if !result.success {
        bail!(result.error.unwrap_or_else(|| "command failed".to_string()));
    }
    result.data.context("command returned no data")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
