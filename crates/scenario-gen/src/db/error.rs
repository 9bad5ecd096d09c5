use std::path::PathBuf;

use thiserror::Error;

/// Failures of the scenario database layer.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database directory could not be created.
    #[error("Cannot prepare database location '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// The `processed_files` JSON column did not round-trip.
    #[error("Invalid processed files for scenario '{name}': {source}")]
    ProcessedFiles {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine a database path")]
    NoPath,

    /// Another thread panicked while holding the connection.
    #[error("Database connection is unavailable after a panic")]
    LockPoisoned,
}
