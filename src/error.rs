//! Error types for `omnifocus_logbook`.

/// Errors that can occur while importing the OmniFocus logbook.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draining one of the completion logs failed.
    ///
    /// This is the only failure a sync reports. No rows from the failed drain
    /// are returned, so the caller must not advance its sync time.
    #[error("OmniFocus logbook sync failed: fetch {stage} failed")]
    Sync {
        /// Which log was being drained (`"tasks"` or `"checklist items"`).
        stage: &'static str,
        /// The underlying query failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns true if this is a sync failure.
    #[must_use]
    pub const fn is_sync_failure(&self) -> bool {
        matches!(self, Self::Sync { .. })
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
