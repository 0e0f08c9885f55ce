//! Domain errors shared across stores.
//!
//! These carry machine-inspectable fields so an upstream service can map
//! them onto its own protocol without parsing messages.

use serde::{Deserialize, Serialize};

/// The requested entity does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} {id:?} not found.")]
pub struct NotFoundError {
    /// Entity type, e.g. `"User"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Requested identifier
    pub id: String,
}

impl NotFoundError {
    /// Create a not-found error.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// An entity with the same identifier already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{reason}")]
pub struct ConflictError {
    /// Entity type, e.g. `"User"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Colliding identifier
    pub id: String,
    /// Human-readable explanation
    pub reason: String,
}

impl ConflictError {
    /// Create a conflict error.
    pub fn new(kind: impl Into<String>, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}
