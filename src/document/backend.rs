//! DocumentDatabase / DocumentCollection - Backend Traits
//!
//! TigerStyle: Abstract document store with simulation-first testing.

use async_trait::async_trait;

use super::error::DocumentResult;
use super::model::{Document, Filter, IndexSpec};
use crate::context::Context;

/// A database: a namespace of named collections.
pub trait DocumentDatabase: Send + Sync {
    /// Collection handle type.
    type Collection: DocumentCollection;

    /// Select a collection by name.
    ///
    /// Returns a cheap handle. Backends create the underlying collection
    /// lazily, so selecting never fails; an invalid name surfaces on the
    /// first operation.
    fn collection(&self, name: &str) -> Self::Collection;
}

/// A named, homogeneous group of documents.
///
/// Handles are safe for unsynchronized concurrent use. Every operation runs
/// under the caller's [`Context`].
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Collection name.
    fn name(&self) -> &str;

    /// Ensure an index exists.
    ///
    /// Creating an index equivalent to an existing one succeeds. Building a
    /// unique index over existing duplicate values fails.
    async fn create_index(&self, ctx: &Context, index: &IndexSpec) -> DocumentResult<()>;

    /// Insert one document.
    ///
    /// Fails with [`DocumentError::DuplicateKey`](super::DocumentError::DuplicateKey)
    /// when a unique index would be violated.
    async fn insert_one(&self, ctx: &Context, doc: Document) -> DocumentResult<()>;

    /// Find the first document matching `filter`.
    ///
    /// Fails with [`DocumentError::NoDocuments`](super::DocumentError::NoDocuments)
    /// when nothing matches.
    async fn find_one(&self, ctx: &Context, filter: &Filter) -> DocumentResult<Document>;
}
