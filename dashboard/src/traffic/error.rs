use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    /// The database file is missing or could not be opened.
    #[error("traffic database unavailable at {}: {reason}", .path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("traffic query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("traffic query timed out after {0:?}")]
    Timeout(Duration),

    #[error("traffic query task failed: {0}")]
    Task(String),
}
