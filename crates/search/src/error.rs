//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// A query that matches nothing is not an error: it yields an empty
/// collection or [`crate::Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// Limit was non-numeric, negative, or above the allowed maximum
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// Identifier was empty after normalization
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The backing table is missing or cannot be read
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Error code for integration with odcaf-core error handling.
/// Range: 13xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Invalid limit
    InvalidLimit = 13001,
    /// Invalid identifier
    InvalidIdentifier = 13002,
    /// Store unavailable
    StoreUnavailable = 13003,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidLimit(_) => SearchErrorCode::InvalidLimit,
            SearchError::InvalidIdentifier(_) => SearchErrorCode::InvalidIdentifier,
            SearchError::StoreUnavailable(_) => SearchErrorCode::StoreUnavailable,
        }
    }

    /// Returns true for caller mistakes (bad limit or identifier).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidLimit(_) | SearchError::InvalidIdentifier(_)
        )
    }
}
