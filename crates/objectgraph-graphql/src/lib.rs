//! # objectgraph-graphql
//!
//! Dynamic GraphQL schema synthesis for ObjectGraph metadata.
//!
//! This crate turns a set of declared objects and their field definitions
//! into a complete GraphQL schema at runtime:
//!
//! - one query root field per object, returning a list with
//!   `fields`/`filters`/`top`/`skip`/`sort` arguments passed through to the
//!   record store
//! - one object type per entity, with scalar fields mapped from declared
//!   types, relationship fields bound to lookup resolvers, and synthesized
//!   reverse fields for master-detail children and enabled sub-resources
//! - three mutation fields per object (`*_INSERT_ONE`, `*_UPDATE_ONE`,
//!   `*_DELETE_ONE`) delegating to the record store
//!
//! Mutually referencing objects are handled by reserving a type identity
//! before the referencing fields are wired, so cyclic metadata builds a
//! finite schema. All relationship resolvers forward the caller's access
//! context unchanged; authorization is the record store's concern.
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Relationship collection, type synthesis, schema assembly,
//!   lazy schema holder
//! - [`context`] - Per-request execution context
//! - [`error`] - Error types for schema building and resolution

pub mod config;
pub mod context;
pub mod error;
mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use schema::{LazySchema, SchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
