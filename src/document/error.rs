//! Document store errors.

/// Errors raised by a document-store backend.
///
/// Callers branch on the capability checks (`is_duplicate_key`,
/// `is_no_documents`) rather than on backend-specific error identity.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("duplicate key on unique index field `{field}`")]
    DuplicateKey { field: String },

    #[error("no documents in result")]
    NoDocuments,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("context cancelled")]
    Cancelled,

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid name `{0}`")]
    InvalidName(String),

    #[error("cannot build unique index on `{field}`: duplicate value {value}")]
    IndexBuild { field: String, value: String },

    #[error("index `{name}` already exists with different options")]
    IndexConflict { name: String },

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DocumentError {
    /// Whether an insert violated a unique index.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Whether a lookup matched nothing.
    #[must_use]
    pub fn is_no_documents(&self) -> bool {
        matches!(self, Self::NoDocuments)
    }

    /// Whether the operation ran past its context deadline.
    #[must_use]
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }

    /// Whether the operation's context was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for document-store operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
