//! Authx Store - Users Persistence over a Document Store
//!
//! TigerStyle: Storage invariants at the storage layer, explicit errors.
//!
//! Stores and retrieves uniquely-identified entities in a document-oriented
//! backing store and translates storage outcomes into three categories:
//! NotFound, Conflict and Transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Authx Store                    │
//! ├─────────────────────────────────────────────┤
//! │  users        │ User entity, UsersStore      │
//! │  store        │ EntityStore, StoreError      │
//! │  meta         │ NotFoundError, ConflictError │
//! ├─────────────────────────────────────────────┤
//! │  document     │ Memory / Postgres backends   │
//! │  context      │ Deadlines, cancellation      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use authx_store::{new_users_store, Context, EntityStore, MemoryDatabase, User};
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let db = MemoryDatabase::new();
//! let users = new_users_store(&db).await.unwrap();
//! let ctx = Context::background();
//!
//! users.create(&ctx, &User::new("alice", "Alice")).await.unwrap();
//! assert!(users.create(&ctx, &User::new("alice", "Alice")).await.unwrap_err().is_conflict());
//! assert!(users.get(&ctx, "bob").await.unwrap_err().is_not_found());
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod context;
pub mod document;
pub mod meta;
pub mod store;
pub mod users;

// Re-export common types
pub use config::{Config, ConfigError};
pub use context::{CancelHandle, Context};
pub use document::{
    Document, DocumentCollection, DocumentDatabase, DocumentError, DocumentResult, Fault, Filter,
    IndexSpec, MemoryCollection, MemoryDatabase,
};
#[cfg(feature = "postgres")]
pub use document::{PostgresCollection, PostgresDatabase};
pub use meta::{ConflictError, NotFoundError};
pub use store::{DocumentEntityStore, Entity, EntityStore, ErrorCategory, StoreError, StoreResult};
pub use users::{new_users_store, User, UsersStore};
