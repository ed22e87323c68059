//! Schema synthesis.
//!
//! The build pipeline, in order:
//! 1. [`collect_related`] scans all objects once and produces the
//!    [`ReverseIndex`] of synthesized reverse fields
//! 2. the type cache synthesizes one GraphQL type per reachable object,
//!    reserving each type identity before wiring its relationship fields
//!    so cyclic metadata terminates
//! 3. [`SchemaBuilder`] assembles the query and mutation roots and
//!    packages everything into the final schema
//!
//! [`LazySchema`] wraps the builder for deferred construction and
//! metadata-change invalidation. Both the reverse index and the type
//! cache live inside a single build invocation; nothing carries over
//! between builds.

mod builder;
mod lazy;
mod related;
pub(crate) mod types;

pub use builder::{SchemaBuilder, SchemaBuilderConfig};
pub use lazy::{LazySchema, SchemaState};
pub use related::{RELATED_PREFIX, RelatedEntry, ReverseIndex, USERS_OBJECT, collect_related};
