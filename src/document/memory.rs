//! MemoryDatabase - In-Process Document Store
//!
//! TigerStyle: Simulation backend with the same uniqueness and absence
//! semantics as the production store, plus fault injection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MemoryDatabase                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  collections: name → MemoryCollection (shared handles)      │
//! │  MemoryCollection: RwLock<docs + indexes>, fault queue      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness is checked and the document appended under one write lock,
//! so concurrent inserts of the same key admit exactly one.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::{DocumentCollection, DocumentDatabase};
use super::error::{DocumentError, DocumentResult};
use super::model::{validate_name, Document, Filter, IndexSpec};
use crate::context::Context;

// =============================================================================
// Faults
// =============================================================================

/// A fault applied to the next operation on a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Fail with [`DocumentError::Unavailable`]
    Unavailable,
    /// Stall for the given duration before running, under the caller's context
    Latency(Duration),
}

// =============================================================================
// MemoryDatabase
// =============================================================================

/// In-memory database. Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    collections: Arc<Mutex<HashMap<String, MemoryCollection>>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of collections selected so far.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.collections).keys().cloned().collect();
        names.sort();
        names
    }
}

impl DocumentDatabase for MemoryDatabase {
    type Collection = MemoryCollection;

    fn collection(&self, name: &str) -> MemoryCollection {
        lock(&self.collections)
            .entry(name.to_string())
            .or_insert_with(|| MemoryCollection::new(name))
            .clone()
    }
}

// =============================================================================
// MemoryCollection
// =============================================================================

#[derive(Debug, Default)]
struct CollectionState {
    docs: Vec<Document>,
    indexes: Vec<IndexSpec>,
}

#[derive(Debug, Default)]
struct CollectionInner {
    state: RwLock<CollectionState>,
    faults: Mutex<VecDeque<Fault>>,
}

/// Handle to an in-memory collection. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    name: String,
    inner: Arc<CollectionInner>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inner: Arc::new(CollectionInner::default()),
        }
    }

    /// Queue a fault for the next operation. Faults apply in FIFO order,
    /// one per operation.
    pub fn inject_fault(&self, fault: Fault) {
        lock(&self.inner.faults).push_back(fault);
    }

    /// Number of stored documents.
    pub async fn count(&self) -> usize {
        self.inner.state.read().await.docs.len()
    }

    /// Indexes defined on the collection.
    pub async fn indexes(&self) -> Vec<IndexSpec> {
        self.inner.state.read().await.indexes.clone()
    }

    async fn apply_fault(&self) -> DocumentResult<()> {
        let fault = lock(&self.inner.faults).pop_front();
        match fault {
            Some(Fault::Unavailable) => Err(DocumentError::Unavailable(format!(
                "collection `{}` is unreachable",
                self.name
            ))),
            Some(Fault::Latency(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_index(&self, ctx: &Context, index: &IndexSpec) -> DocumentResult<()> {
        validate_name(&self.name)?;
        validate_name(&index.field)?;

        ctx.run(async {
            self.apply_fault().await?;

            let mut state = self.inner.state.write().await;
            if let Some(existing) = state.indexes.iter().find(|i| i.field == index.field) {
                if existing == index {
                    tracing::trace!(collection = %self.name, index = %index.name(), "Index already exists");
                    return Ok(());
                }
                return Err(DocumentError::IndexConflict { name: index.name() });
            }

            if index.unique {
                let mut seen = Vec::with_capacity(state.docs.len());
                for value in state.docs.iter().filter_map(|d| d.get(&index.field)) {
                    if seen.contains(&value) {
                        return Err(DocumentError::IndexBuild {
                            field: index.field.clone(),
                            value: value.to_string(),
                        });
                    }
                    seen.push(value);
                }
            }

            state.indexes.push(index.clone());
            tracing::debug!(collection = %self.name, index = %index.name(), unique = index.unique, "Created index");
            Ok(())
        })
        .await
    }

    async fn insert_one(&self, ctx: &Context, doc: Document) -> DocumentResult<()> {
        validate_name(&self.name)?;

        ctx.run(async {
            self.apply_fault().await?;

            let mut state = self.inner.state.write().await;
            for index in state.indexes.iter().filter(|i| i.unique) {
                let Some(value) = doc.get(&index.field) else {
                    continue;
                };
                if state.docs.iter().any(|d| d.get(&index.field) == Some(value)) {
                    return Err(DocumentError::DuplicateKey {
                        field: index.field.clone(),
                    });
                }
            }

            state.docs.push(doc);
            tracing::trace!(collection = %self.name, count = state.docs.len(), "Inserted document");
            Ok(())
        })
        .await
    }

    async fn find_one(&self, ctx: &Context, filter: &Filter) -> DocumentResult<Document> {
        validate_name(&self.name)?;

        ctx.run(async {
            self.apply_fault().await?;

            let state = self.inner.state.read().await;
            state
                .docs
                .iter()
                .find(|d| filter.matches(d))
                .cloned()
                .ok_or(DocumentError::NoDocuments)
        })
        .await
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document::new().with("id", id)
    }

    #[tokio::test]
    async fn test_collection_handles_share_state() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();

        db.collection("users").insert_one(&ctx, doc("alice")).await.unwrap();

        let found = db
            .collection("users")
            .find_one(&ctx, &Filter::eq("id", "alice"))
            .await
            .unwrap();
        assert_eq!(found, doc("alice"));
        assert_eq!(db.collection_names(), vec!["users".to_string()]);
    }

    #[tokio::test]
    async fn test_find_one_no_documents() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();

        let err = db
            .collection("users")
            .find_one(&ctx, &Filter::eq("id", "nobody"))
            .await
            .unwrap_err();
        assert!(err.is_no_documents());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicates() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        users.create_index(&ctx, &IndexSpec::unique("id")).await.unwrap();
        users.insert_one(&ctx, doc("alice")).await.unwrap();

        let err = users.insert_one(&ctx, doc("alice")).await.unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(users.count().await, 1);

        // Documents without the field are not indexed.
        users.insert_one(&ctx, Document::new().with("name", "anon")).await.unwrap();
        users.insert_one(&ctx, Document::new().with("name", "anon")).await.unwrap();
        assert_eq!(users.count().await, 3);
    }

    #[tokio::test]
    async fn test_without_index_duplicates_are_allowed() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        users.insert_one(&ctx, doc("alice")).await.unwrap();
        users.insert_one(&ctx, doc("alice")).await.unwrap();
        assert_eq!(users.count().await, 2);
    }

    #[tokio::test]
    async fn test_create_index_is_idempotent() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        users.create_index(&ctx, &IndexSpec::unique("id")).await.unwrap();
        users.create_index(&ctx, &IndexSpec::unique("id")).await.unwrap();
        assert_eq!(users.indexes().await, vec![IndexSpec::unique("id")]);
    }

    #[tokio::test]
    async fn test_create_index_conflicting_options() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        let plain = IndexSpec {
            field: "id".to_string(),
            unique: false,
        };
        users.create_index(&ctx, &plain).await.unwrap();

        let err = users
            .create_index(&ctx, &IndexSpec::unique("id"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::IndexConflict { .. }));
    }

    #[tokio::test]
    async fn test_unique_index_build_fails_on_existing_duplicates() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        users.insert_one(&ctx, doc("alice")).await.unwrap();
        users.insert_one(&ctx, doc("alice")).await.unwrap();

        let err = users
            .create_index(&ctx, &IndexSpec::unique("id"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::IndexBuild { .. }));
        assert!(users.indexes().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_admit_one() {
        let db = MemoryDatabase::new();
        let users = db.collection("users");
        users
            .create_index(&Context::background(), &IndexSpec::unique("id"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let users = users.clone();
            handles.push(tokio::spawn(async move {
                users.insert_one(&Context::background(), doc("alice")).await
            }));
        }

        let mut ok = 0;
        let mut dup = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) if e.is_duplicate_key() => dup += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(dup, 15);
        assert_eq!(users.count().await, 1);
    }

    #[tokio::test]
    async fn test_fault_unavailable_applies_once() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();
        let users = db.collection("users");

        users.inject_fault(Fault::Unavailable);
        let err = users.insert_one(&ctx, doc("alice")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Unavailable(_)));
        assert_eq!(users.count().await, 0);

        users.insert_one(&ctx, doc("alice")).await.unwrap();
        assert_eq!(users.count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_fault_honors_deadline() {
        let db = MemoryDatabase::new();
        let users = db.collection("users");

        users.inject_fault(Fault::Latency(Duration::from_secs(30)));
        let ctx = Context::background().with_timeout(Duration::from_millis(100));
        let err = users.insert_one(&ctx, doc("alice")).await.unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert_eq!(users.count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_collection_name() {
        let db = MemoryDatabase::new();
        let ctx = Context::background();

        let err = db
            .collection("bad name")
            .insert_one(&ctx, doc("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidName(_)));
    }
}
