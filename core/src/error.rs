//! Error types for the search index.

use crate::DocId;
use thiserror::Error;

/// Errors raised by [`SearchServer`](crate::SearchServer) and
/// [`RequestQueue`](crate::RequestQueue).
///
/// Every variant describes bad caller input. Nothing is retried and no
/// operation is partially applied before one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Document id below zero
    #[error("Invalid document id {0}: id is negative")]
    NegativeId(DocId),

    /// Document id already stored
    #[error("Invalid document id {0}: document already exists")]
    DuplicateId(DocId),

    /// A document token contains control characters
    #[error("Invalid term in document: {0:?}")]
    InvalidTerm(String),

    /// A stop word contains control characters
    #[error("Invalid stop word: {0:?}")]
    InvalidStopWord(String),

    /// Malformed query word
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Position lookup past the number of stored documents
    #[error("Document index {index} is out of range (document count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// No document stored under this id
    #[error("Document not found: {0}")]
    DocumentNotFound(DocId),

    /// Status name that is not one of the known statuses
    #[error("Unknown document status: {0}")]
    UnknownStatus(String),
}

impl Error {
    /// True for both id failures: negative and duplicate.
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, Error::NegativeId(_) | Error::DuplicateId(_))
    }
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, Error>;
