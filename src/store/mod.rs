//! Entity Store - Create and Get over a Document Collection
//!
//! TigerStyle: Storage invariants live in the storage layer.
//!
//! # Architecture
//!
//! ```text
//! caller ──► EntityStore::create / get
//!                 │
//!                 ▼
//!        DocumentEntityStore<T, C> ──► DocumentCollection (C)
//!                 │                          │
//!                 ◄──── DocumentError ───────┘
//!                 │
//!        StoreError::{NotFound, Conflict, Transport}
//! ```
//!
//! Identifier uniqueness is enforced by a unique index created when the
//! store is constructed, never by read-then-write checks.

mod document_store;
mod error;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::Context;

pub use document_store::DocumentEntityStore;
pub use error::{ErrorCategory, StoreError, StoreResult};

/// A uniquely-identified record.
///
/// The identifier is serialized in the document field
/// [`ENTITY_ID_FIELD`](crate::constants::ENTITY_ID_FIELD); all other fields
/// are opaque to the store.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type name used in errors, e.g. `"User"`.
    const KIND: &'static str;

    /// Backing collection name, e.g. `"users"`.
    const COLLECTION: &'static str;

    /// Externally assigned, immutable identifier.
    fn id(&self) -> &str;
}

/// Create and fetch-by-identifier over one collection.
///
/// Implementations are shared by concurrent callers for the life of the
/// process.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Insert a new entity.
    ///
    /// # Errors
    /// - [`StoreError::Conflict`] when the identifier is taken.
    /// - [`StoreError::Transport`] for any other failure.
    async fn create(&self, ctx: &Context, entity: &T) -> StoreResult<()>;

    /// Fetch an entity by identifier.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] when no entity has the identifier.
    /// - [`StoreError::Transport`] for decode or any other failure.
    async fn get(&self, ctx: &Context, id: &str) -> StoreResult<T>;
}
