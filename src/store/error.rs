//! Store errors: NotFound, Conflict, Transport.

use std::fmt;

use crate::document::DocumentError;
use crate::meta::{ConflictError, NotFoundError};

/// Error category, for callers that branch without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entity does not exist; expected and recoverable
    NotFound,
    /// Identifier already taken; expected and recoverable
    Conflict,
    /// Infrastructure failure (network, timeout, malformed data, setup)
    Transport,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Errors returned by an entity store.
///
/// Every backing-store failure is translated into exactly one variant.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Anything else, with the attempted operation and the original cause.
    #[error("{operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: DocumentError,
    },
}

impl StoreError {
    pub(crate) fn transport(operation: impl Into<String>, source: DocumentError) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::Transport { .. } => ErrorCategory::Transport,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The not-found payload, if this is a NotFound error.
    #[must_use]
    pub fn as_not_found(&self) -> Option<&NotFoundError> {
        match self {
            Self::NotFound(e) => Some(e),
            _ => None,
        }
    }

    /// The conflict payload, if this is a Conflict error.
    #[must_use]
    pub fn as_conflict(&self) -> Option<&ConflictError> {
        match self {
            Self::Conflict(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_categories() {
        let not_found = StoreError::from(NotFoundError::new("User", "bob"));
        assert_eq!(not_found.category(), ErrorCategory::NotFound);
        assert!(not_found.is_not_found());
        assert_eq!(not_found.as_not_found().unwrap().id, "bob");
        assert!(not_found.as_conflict().is_none());

        let conflict = StoreError::from(ConflictError::new("User", "alice", "taken"));
        assert_eq!(conflict.category(), ErrorCategory::Conflict);
        assert!(conflict.is_conflict());

        let transport = StoreError::transport("error inserting", DocumentError::DeadlineExceeded);
        assert_eq!(transport.category(), ErrorCategory::Transport);
        assert!(transport.is_transport());
        assert!(!transport.is_conflict());
    }

    #[test]
    fn test_transport_preserves_cause() {
        let err = StoreError::transport(
            r#"error finding/decoding user "alice""#,
            DocumentError::Unavailable("connection refused".to_string()),
        );
        assert_eq!(
            err.to_string(),
            r#"error finding/decoding user "alice": backend unavailable: connection refused"#
        );
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "backend unavailable: connection refused");
    }

    #[test]
    fn test_domain_errors_display_through() {
        let err = StoreError::from(NotFoundError::new("User", "bob"));
        assert_eq!(err.to_string(), r#"User "bob" not found."#);
    }
}
