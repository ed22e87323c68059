//! # objectgraph-metadata
//!
//! Object and field metadata model for the ObjectGraph schema engine.
//!
//! This crate owns the runtime-mutable metadata that the GraphQL layer
//! synthesizes its schema from:
//!
//! - [`DataSource`] - a named grouping of object definitions
//! - [`ObjectMetadata`] - one entity: a field map plus sub-resource flags
//! - [`FieldDefinition`] - a single field with its declared type and,
//!   for relationship fields, the referenced object
//! - [`MetadataRegistry`] - the registry holding all data sources, with
//!   support for deferred field registration (a field may be registered
//!   before its owning object is declared; it is attached when the object
//!   arrives)
//!
//! Definitions are plain serde types so they can be loaded from JSON
//! documents produced by external tooling. Object names may contain dots;
//! [`normalize_name`] converts them to schema-safe identifiers.
//!
//! ## Example
//!
//! ```ignore
//! use objectgraph_metadata::{FieldDefinition, FieldType, MetadataRegistry, ObjectMetadata};
//!
//! let mut registry = MetadataRegistry::new();
//! registry.add_object(
//!     "default",
//!     ObjectMetadata::new("projects")
//!         .with_field(FieldDefinition::new("name", FieldType::Text))
//!         .with_field(FieldDefinition::lookup("owner", "users")),
//! )?;
//! ```

mod error;
mod registry;
mod types;

pub use error::MetadataError;
pub use registry::MetadataRegistry;
pub use types::{
    DataSource, FieldDefinition, FieldType, ObjectMetadata, ReferenceTo, normalize_name,
};

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;
