//! Path utilities for locating settings and the OmniFocus database.
//!
//! Settings live in `~/.omnifocus-logbook/`. The OmniFocus database path is
//! never read from globals: it is resolved here once and then passed
//! explicitly to [`crate::storage::SqliteLogbook`].

use std::path::{Path, PathBuf};

/// The base directory name for omnifocus-logbook data.
const DATA_DIR_NAME: &str = ".omnifocus-logbook";

/// The settings filename.
pub const SETTINGS_FILENAME: &str = "settings.yaml";

/// Default location of the OmniFocus `SQLite` cache, relative to `~`.
pub const DEFAULT_OMNIFOCUS_DB_PATH: &str = "~/Library/Containers/com.omnigroup.OmniFocus3/Data/Library/Caches/com.omnigroup.OmniFocus3/OmniFocusDatabase2";

/// Get the base data directory for omnifocus-logbook.
///
/// Returns `~/.omnifocus-logbook/` or `None` if the home directory
/// cannot be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Get the default settings file path.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Get the default OmniFocus database path with `~` expanded.
#[must_use]
pub fn default_database_path() -> Option<PathBuf> {
    expand_home(Path::new(DEFAULT_OMNIFOCUS_DB_PATH))
}

/// Expand a leading `~` component to the home directory.
///
/// Paths without a leading `~` are returned unchanged. Returns `None` only
/// when expansion is needed and the home directory is unknown.
#[must_use]
pub fn expand_home(path: &Path) -> Option<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
        Err(_) => Some(path.to_path_buf()),
    }
}
