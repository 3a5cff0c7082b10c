//! Store error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the SQLite-backed query store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creating the parent directory for the database file failed
    #[error("failed to create store directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening the database failed
    #[error("failed to open database at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Creating tables or indexes failed
    #[error("schema migration failed")]
    Schema(#[source] rusqlite::Error),

    /// A query or insert failed
    #[error("store operation failed")]
    Query(#[from] rusqlite::Error),
}
