//! Quote operation errors
//!
//! Validation, import and persistence failures surfaced by the quote store
//! and the widget. Network failures never show up here: the sync client
//! degrades them to empty results.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by quote operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Quote text was empty after trimming
    #[error("Quote text must not be empty")]
    EmptyText,

    /// Quote category was empty after trimming
    #[error("Quote category must not be empty")]
    EmptyCategory,

    /// Filter names a category no quote has
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Import document is not valid JSON or holds an element that is not a quote
    #[error("Failed to parse the import document")]
    InvalidImport(#[source] serde_json::Error),

    /// Import document parsed but is not a JSON array
    #[error("Invalid import format: expected a JSON array of quotes")]
    ImportNotSequence,

    /// Collection could not be serialized
    #[error("Failed to serialize quotes")]
    Serialization(#[source] serde_json::Error),

    /// Persistence write failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuoteError {
    /// Whether this is a user input problem (as opposed to an I/O failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QuoteError::EmptyText
                | QuoteError::EmptyCategory
                | QuoteError::UnknownCategory(_)
                | QuoteError::InvalidImport(_)
                | QuoteError::ImportNotSequence
        )
    }
}

/// Result type for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;
