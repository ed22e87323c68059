//! # objectgraph-store
//!
//! Record access abstraction for the ObjectGraph engine.
//!
//! This crate defines the contract between generated resolvers and
//! whatever actually stores records. The GraphQL layer never interprets
//! records; it passes find arguments and mutation payloads through and
//! forwards the caller's access context unchanged.
//!
//! ## Overview
//!
//! The main trait is [`RecordStore`], which defines per-object operations:
//! - `find` / `find_one` for queries
//! - `insert` / `update` / `delete` for mutations
//!
//! Every operation takes an optional [`UserSession`], an opaque access
//! context that backends may use to enforce authorization. This crate
//! never inspects it.
//!
//! ## Example
//!
//! ```ignore
//! use objectgraph_store::{FindOptions, RecordStore, StoreError};
//!
//! async fn active_projects(
//!     store: &dyn RecordStore,
//! ) -> Result<Vec<serde_json::Value>, StoreError> {
//!     let options = FindOptions::new()
//!         .with_filters(serde_json::json!([["archived", "=", false]]))
//!         .with_top(10);
//!     store.find("projects", &options, None).await
//! }
//! ```
//!
//! ## Backends
//!
//! [`MemoryStore`] is the bundled in-memory backend. It interprets the
//! structured filter subset that the generated resolvers emit and backs
//! the integration tests of the GraphQL crate.

mod error;
mod memory;
mod traits;
mod types;

pub use error::{ErrorCategory, StoreError};
pub use memory::MemoryStore;
pub use traits::RecordStore;
pub use types::{FindOptions, StoredRecord, UserSession};

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for a shared store trait object.
pub type DynRecordStore = std::sync::Arc<dyn RecordStore>;
