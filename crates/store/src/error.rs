//! Error types for the store crate.

use odcaf_search::SearchError;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised while reading the facility table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failed to open or read
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The configured table does not exist
    #[error("Table not found: {0}")]
    MissingTable(String),

    /// The configured table name is not a plain identifier
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        SearchError::StoreUnavailable(err.to_string())
    }
}
