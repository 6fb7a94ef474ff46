//! Persisted settings for omnifocus-logbook.
//!
//! This module handles the `~/.omnifocus-logbook/settings.yaml` file. It owns
//! the sync time that the logbook reads from, plus the formatting options
//! consumed by whatever renders the tasks into notes.

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default heading of the logbook section in a daily note.
pub const DEFAULT_SECTION_HEADING: &str = "## Logbook";

/// Default number of seconds between periodic syncs.
pub const DEFAULT_SYNC_FREQUENCY_SECONDS: u64 = 30 * 60;

/// Default prefix added to imported tag names.
pub const DEFAULT_TAG_PREFIX: &str = "logbook/";

/// Default checkbox mark for dropped tasks.
pub const DEFAULT_CANCELLED_MARK: &str = "c";

/// User settings.
///
/// Missing fields take their default values, so older settings files keep
/// loading as options are added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whether the user accepted the read-only access disclaimer.
    pub has_accepted_disclaimer: bool,

    /// Unix timestamp of the last successful sync; 0 means never.
    pub latest_sync_time: i64,

    /// Include task notes in the synced document.
    pub does_sync_note_body: bool,

    /// Kept for old settings files; folders replaced projects.
    pub does_sync_project: bool,

    /// Add an empty line before each folder heading.
    pub does_add_newline_before_headings: bool,

    /// Whether periodic syncing is enabled.
    pub is_sync_enabled: bool,

    /// Seconds between periodic syncs.
    pub sync_interval: u64,

    /// Markdown heading of the logbook section.
    pub section_heading: String,

    /// Prefix added to OmniFocus tags (e.g. `#logbook/work`).
    pub tag_prefix: String,

    /// Mark used for dropped tasks.
    pub canceled_mark: String,

    /// Override for the OmniFocus database location. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            has_accepted_disclaimer: false,
            latest_sync_time: 0,
            does_sync_note_body: true,
            does_sync_project: false,
            does_add_newline_before_headings: false,
            is_sync_enabled: false,
            sync_interval: DEFAULT_SYNC_FREQUENCY_SECONDS,
            section_heading: DEFAULT_SECTION_HEADING.to_string(),
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            canceled_mark: DEFAULT_CANCELLED_MARK.to_string(),
            database_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a file, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Record a successful sync at `now` (unix seconds).
    pub fn record_sync(&mut self, now: i64) {
        self.latest_sync_time = now;
    }

    /// Forget the sync history so the next sync starts from the beginning.
    pub fn reset_sync_history(&mut self) {
        self.latest_sync_time = 0;
    }

    /// Resolve the OmniFocus database path.
    ///
    /// Uses the configured override if any, otherwise the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the path needs `~` expansion and the home
    /// directory cannot be determined.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        let resolved = match &self.database_path {
            Some(path) => paths::expand_home(path),
            None => paths::default_database_path(),
        };
        resolved.ok_or_else(|| Error::Config("Cannot determine home directory".into()))
    }
}
