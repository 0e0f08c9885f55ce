//! Users
//!
//! TigerStyle: The user record and its document-backed store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentDatabase;
use crate::store::{DocumentEntityStore, Entity, StoreResult};

// =============================================================================
// User
// =============================================================================

/// A user known to the API server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, externally assigned identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// When the user was first seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// When the user was locked out; `None` if not locked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<DateTime<Utc>>,
}

impl User {
    /// Create an unlocked user stamped with the current time.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        // Precondition
        assert!(!id.is_empty(), "user id cannot be empty");

        Self {
            id,
            name: name.into(),
            created: Some(Utc::now()),
            locked: None,
        }
    }

    /// Whether the user is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }
}

impl Entity for User {
    const KIND: &'static str = "User";
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// UsersStore
// =============================================================================

/// Users store over a document database's collection type.
pub type UsersStore<C> = DocumentEntityStore<User, C>;

/// Construct the users store, ensuring the unique index on `id`.
///
/// # Errors
/// Returns a transport error when the index cannot be established; the
/// caller should treat this as fatal at startup.
pub async fn new_users_store<D>(database: &D) -> StoreResult<UsersStore<D::Collection>>
where
    D: DocumentDatabase,
{
    DocumentEntityStore::new(database).await
}
