//! Document Store - Backend Traits and Implementations
//!
//! TigerStyle: Abstract document store with simulation-first testing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │          DocumentDatabase → DocumentCollection               │
//! │     create_index / insert_one / find_one  (+ Context)        │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴─────────┐
//! │ MemoryDatabase  │           │ PostgresDatabase │
//! │   (testing)     │           │  (production)    │
//! └─────────────────┘           └──────────────────┘
//! ```
//!
//! Backend-specific error identity stays inside the backend: callers ask
//! [`DocumentError::is_duplicate_key`] and [`DocumentError::is_no_documents`].

mod backend;
mod error;
mod memory;
mod model;

#[cfg(feature = "postgres")]
mod postgres;

pub use backend::{DocumentCollection, DocumentDatabase};
pub use error::{DocumentError, DocumentResult};
pub use memory::{Fault, MemoryCollection, MemoryDatabase};
pub use model::{validate_name, Document, Filter, IndexSpec};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresCollection, PostgresDatabase};
