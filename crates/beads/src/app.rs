//! Application context for CLI command execution.
//!
//! `App` owns the store handle and hands it to command implementations as
//! an explicit parameter, so Validator/Executor calls compose and test in
//! isolation instead of reaching for process-wide state.

use crate::commands::init::{find_beads_root, BeadsConfig, BEADS_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::storage::{create_store, IssueStore};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
pub struct App {
    /// The storage backend.
    store: Box<dyn IssueStore>,

    /// Path to the beads directory (.beads).
    beads_dir: PathBuf,

    /// Issue ID prefix from configuration.
    prefix: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("beads_dir", &self.beads_dir)
            .field("prefix", &self.prefix)
            .field("store", &"<dyn IssueStore>")
            .finish()
    }
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Searches up the directory tree for a `.beads/` directory, loads the
    /// configuration, and opens the store.
    ///
    /// # Errors
    ///
    /// Fails when no beads repository is found, or when the configuration
    /// or data file cannot be loaded.
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_beads_root(working_dir).ok_or_else(|| {
            Error::Config("Not a beads repository (run `beads init` first)".to_string())
        })?;

        let beads_dir = root_dir.join(BEADS_DIR_NAME);
        let config_path = beads_dir.join(CONFIG_FILE_NAME);

        let config = BeadsConfig::load(&config_path).await?;
        let backend = config.storage.to_backend(&root_dir)?;
        let store = create_store(backend, config.issue_prefix.clone()).await?;

        Ok(Self {
            store,
            beads_dir,
            prefix: config.issue_prefix,
        })
    }

    /// Mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut dyn IssueStore {
        self.store.as_mut()
    }

    /// Immutable reference to the store.
    pub fn store(&self) -> &dyn IssueStore {
        self.store.as_ref()
    }

    /// The issue ID prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path to the beads directory.
    #[must_use]
    pub fn beads_dir(&self) -> &Path {
        &self.beads_dir
    }

    /// Persist store state. Called after mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }
}

/// Resolve the acting user for audit fields.
///
/// `BEADS_ACTOR` wins, then the OS username, then a fixed fallback.
#[must_use]
pub fn resolve_actor() -> String {
    std::env::var("BEADS_ACTOR")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "cli".to_string())
}
