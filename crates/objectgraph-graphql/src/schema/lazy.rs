//! Lazy schema holder.
//!
//! Wraps a schema that is built on first access and can be invalidated
//! when metadata changes. Every build runs the full pipeline from scratch
//! (relationship collection included), so a rebuild never observes state
//! from a previous build.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::builder::SchemaBuilder;
use crate::error::GraphQLError;

/// State of the lazy schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema has not been built yet.
    Uninitialized,
    /// Schema is currently being built.
    Building,
    /// Schema is ready for use.
    Ready,
    /// Schema build failed.
    Failed,
}

/// Thread-safe lazy schema holder.
///
/// The surrounding system must ensure a build completes before serving
/// requests against it; concurrent callers during a build receive
/// [`GraphQLError::SchemaInitializing`] rather than blocking.
///
/// # Example
///
/// ```ignore
/// let lazy = LazySchema::new(builder);
///
/// // First access triggers the build.
/// let schema = lazy.get_or_build().await?;
///
/// // Metadata changed: next access rebuilds from scratch.
/// lazy.invalidate().await;
/// ```
pub struct LazySchema {
    /// The cached schema (None until built or after invalidation).
    schema: RwLock<Option<Arc<Schema>>>,

    /// Build lock to ensure only one build at a time.
    build_lock: Mutex<()>,

    /// Current state of the schema.
    state: RwLock<SchemaState>,

    /// The schema builder.
    builder: SchemaBuilder,

    /// Last build error message (for diagnostics).
    last_error: RwLock<Option<String>>,
}

impl LazySchema {
    /// Creates a new lazy schema with the given builder.
    #[must_use]
    pub fn new(builder: SchemaBuilder) -> Self {
        Self {
            schema: RwLock::new(None),
            build_lock: Mutex::new(()),
            state: RwLock::new(SchemaState::Uninitialized),
            builder,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the current state of the schema.
    pub async fn state(&self) -> SchemaState {
        *self.state.read().await
    }

    /// Gets the schema, building it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQLError::SchemaInitializing`] if another build is in
    /// progress and [`GraphQLError::SchemaBuildFailed`] if the build fails.
    pub async fn get_or_build(&self) -> Result<Arc<Schema>, GraphQLError> {
        // Fast path: schema already built.
        {
            let schema = self.schema.read().await;
            if let Some(schema) = schema.as_ref() {
                return Ok(Arc::clone(schema));
            }
        }

        let Ok(_guard) = self.build_lock.try_lock() else {
            return Err(GraphQLError::SchemaInitializing);
        };

        // Double-check after acquiring the lock.
        {
            let schema = self.schema.read().await;
            if let Some(schema) = schema.as_ref() {
                return Ok(Arc::clone(schema));
            }
        }

        *self.state.write().await = SchemaState::Building;
        info!("building GraphQL schema");

        match self.builder.build() {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = SchemaState::Ready;
                *self.last_error.write().await = None;
                info!("GraphQL schema built");
                Ok(schema)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "GraphQL schema build failed");
                *self.state.write().await = SchemaState::Failed;
                *self.last_error.write().await = Some(message.clone());
                Err(GraphQLError::SchemaBuildFailed(message))
            }
        }
    }

    /// Gets the schema if it is already built, without triggering a build.
    pub async fn get(&self) -> Option<Arc<Schema>> {
        self.schema.read().await.clone()
    }

    /// Invalidates the cached schema; the next access rebuilds it from the
    /// current metadata.
    pub async fn invalidate(&self) {
        let _guard = self.build_lock.lock().await;

        *self.schema.write().await = None;
        *self.state.write().await = SchemaState::Uninitialized;
        *self.last_error.write().await = None;

        info!("GraphQL schema invalidated, will rebuild on next access");
    }

    /// Returns the last build error, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Returns whether the schema is ready for use.
    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == SchemaState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilderConfig;
    use objectgraph_metadata::{FieldDefinition, FieldType, MetadataRegistry, ObjectMetadata};

    fn lazy_schema() -> LazySchema {
        let mut registry = MetadataRegistry::new();
        registry
            .add_object(
                "default",
                ObjectMetadata::new("projects")
                    .with_field(FieldDefinition::new("name", FieldType::Text)),
            )
            .unwrap();
        let builder = SchemaBuilder::new(Arc::new(registry), SchemaBuilderConfig::default());
        LazySchema::new(builder)
    }

    #[tokio::test]
    async fn test_first_access_builds() {
        let lazy = lazy_schema();
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);
        assert!(lazy.get().await.is_none());

        let schema = lazy.get_or_build().await.unwrap();
        assert!(schema.sdl().contains("type projects"));
        assert!(lazy.is_ready().await);

        // Subsequent accesses share the same schema instance.
        let again = lazy.get_or_build().await.unwrap();
        assert!(Arc::ptr_eq(&schema, &again));
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let lazy = lazy_schema();
        let first = lazy.get_or_build().await.unwrap();

        lazy.invalidate().await;
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);

        let second = lazy.get_or_build().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.sdl(), second.sdl());
    }
}
