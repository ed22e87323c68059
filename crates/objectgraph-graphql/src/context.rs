//! GraphQL execution context.
//!
//! The context is constructed per request and injected into query
//! execution; every generated resolver reads the record store and the
//! caller's access context from it. The access context is opaque here -
//! it is forwarded to the store unchanged, and `None` means an
//! unauthenticated caller.
//!
//! # Example
//!
//! ```ignore
//! use objectgraph_graphql::GraphQLContextBuilder;
//!
//! let context = GraphQLContextBuilder::new()
//!     .with_store(store.clone())
//!     .with_user(Some(session))
//!     .with_request_id("req-123")
//!     .build()?;
//!
//! let response = schema
//!     .execute(async_graphql::Request::new(query).data(context))
//!     .await;
//! ```

use objectgraph_store::{DynRecordStore, UserSession};

/// Per-request execution context for generated resolvers.
///
/// `Clone` is cheap: the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct GraphQLContext {
    /// Record store all resolvers delegate to.
    pub store: DynRecordStore,

    /// Access context of the current caller (`None` for unauthenticated).
    pub user: Option<UserSession>,

    /// Request id for tracing and correlation.
    pub request_id: String,
}

impl GraphQLContext {
    /// Returns whether the request carries an access context.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the caller's id if the access context carries one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(UserSession::user_id)
    }

    /// Creates a new builder for `GraphQLContext`.
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }
}

/// Builder for constructing [`GraphQLContext`].
#[derive(Default)]
pub struct GraphQLContextBuilder {
    store: Option<DynRecordStore>,
    user: Option<UserSession>,
    request_id: Option<String>,
}

impl GraphQLContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record store.
    #[must_use]
    pub fn with_store(mut self, store: DynRecordStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the caller's access context.
    #[must_use]
    pub fn with_user(mut self, user: Option<UserSession>) -> Self {
        self.user = user;
        self
    }

    /// Sets the request id.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let store = self
            .store
            .ok_or(ContextBuilderError::MissingField("store"))?;
        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(GraphQLContext {
            store,
            user: self.user,
            request_id,
        })
    }
}

/// Errors that can occur when building a [`GraphQLContext`].
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use objectgraph_store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_builder_missing_store() {
        let result = GraphQLContextBuilder::new()
            .with_request_id("req-123")
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("store"))
        ));
    }

    #[test]
    fn test_builder_missing_request_id() {
        let result = GraphQLContextBuilder::new()
            .with_store(Arc::new(MemoryStore::new()))
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("request_id"))
        ));
    }

    #[test]
    fn test_context_user_accessors() {
        let context = GraphQLContextBuilder::new()
            .with_store(Arc::new(MemoryStore::new()))
            .with_user(Some(UserSession::new(json!({"user_id": "u1"}))))
            .with_request_id("req-123")
            .build()
            .unwrap();

        assert!(context.is_authenticated());
        assert_eq!(context.user_id(), Some("u1"));

        let anonymous = GraphQLContextBuilder::new()
            .with_store(Arc::new(MemoryStore::new()))
            .with_request_id("req-456")
            .build()
            .unwrap();
        assert!(!anonymous.is_authenticated());
    }
}
