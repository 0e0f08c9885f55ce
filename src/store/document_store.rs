//! DocumentEntityStore - EntityStore over any DocumentCollection.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::{Entity, EntityStore};
use crate::constants::{CREATE_INDEX_TIMEOUT, ENTITY_ID_FIELD};
use crate::context::Context;
use crate::document::{Document, DocumentCollection, DocumentDatabase, Filter, IndexSpec};
use crate::meta::{ConflictError, NotFoundError};

/// Entity store backed by a document collection.
///
/// Holds no locks and does no background work; concurrency control is the
/// collection's.
pub struct DocumentEntityStore<T, C> {
    collection: C,
    _entity: PhantomData<fn() -> T>,
}

impl<T, C> DocumentEntityStore<T, C>
where
    T: Entity,
    C: DocumentCollection,
{
    /// Select `T::COLLECTION` and ensure the unique index on the identifier.
    ///
    /// Safe to run on every start: an existing equivalent index is accepted.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] when the index cannot be established
    /// within [`CREATE_INDEX_TIMEOUT`]. No store is returned in that case.
    pub async fn new<D>(database: &D) -> StoreResult<Self>
    where
        D: DocumentDatabase<Collection = C>,
    {
        Self::with_index_timeout(database, CREATE_INDEX_TIMEOUT).await
    }

    /// Like [`new`](Self::new) with an explicit index creation timeout.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub async fn with_index_timeout<D>(database: &D, timeout: Duration) -> StoreResult<Self>
    where
        D: DocumentDatabase<Collection = C>,
    {
        let collection = database.collection(T::COLLECTION);

        {
            // Scoped: released on every exit path.
            let ctx = Context::background().with_timeout(timeout);
            collection
                .create_index(&ctx, &IndexSpec::unique(ENTITY_ID_FIELD))
                .await
                .map_err(|e| {
                    StoreError::transport(
                        format!("error adding indexes to {} collection", T::COLLECTION),
                        e,
                    )
                })?;
        }

        tracing::debug!(
            collection = T::COLLECTION,
            field = ENTITY_ID_FIELD,
            "Ensured unique index"
        );

        Ok(Self {
            collection,
            _entity: PhantomData,
        })
    }

    /// The backing collection handle.
    #[must_use]
    pub fn collection(&self) -> &C {
        &self.collection
    }
}

/// Lower-cased type name for messages, e.g. `"user"`.
fn noun<T: Entity>() -> String {
    T::KIND.to_lowercase()
}

#[async_trait]
impl<T, C> EntityStore<T> for DocumentEntityStore<T, C>
where
    T: Entity,
    C: DocumentCollection,
{
    async fn create(&self, ctx: &Context, entity: &T) -> StoreResult<()> {
        let id = entity.id();
        // Precondition
        assert!(!id.is_empty(), "entity must have id");

        let result = match Document::encode(entity) {
            Ok(doc) => self.collection.insert_one(ctx, doc).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::debug!(kind = T::KIND, id = %id, "Created entity");
                Ok(())
            }
            Err(e) if e.is_duplicate_key() => Err(ConflictError::new(
                T::KIND,
                id,
                format!("A {} with the ID {:?} already exists.", noun::<T>(), id),
            )
            .into()),
            Err(e) => Err(StoreError::transport(
                format!("error inserting new {} {:?}", noun::<T>(), id),
                e,
            )),
        }
    }

    async fn get(&self, ctx: &Context, id: &str) -> StoreResult<T> {
        // Precondition
        assert!(!id.is_empty(), "id cannot be empty");

        let result = self
            .collection
            .find_one(ctx, &Filter::eq(ENTITY_ID_FIELD, id))
            .await
            .and_then(Document::decode::<T>);

        match result {
            Ok(entity) => {
                // Postcondition
                assert_eq!(entity.id(), id, "returned entity must match requested id");
                Ok(entity)
            }
            Err(e) if e.is_no_documents() => Err(NotFoundError::new(T::KIND, id).into()),
            Err(e) => Err(StoreError::transport(
                format!("error finding/decoding {} {:?}", noun::<T>(), id),
                e,
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
