//! Error types for soil-output.

use soil_sim::PersistenceError;
use thiserror::Error;

/// Errors raised while encoding or storing saved runs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;

impl From<OutputError> for PersistenceError {
    fn from(e: OutputError) -> Self {
        PersistenceError::Backend(e.to_string())
    }
}
