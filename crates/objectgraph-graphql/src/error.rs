//! Error types for GraphQL operations.
//!
//! Resolver-time failures are converted to GraphQL field errors and stay
//! isolated to the field that raised them; only schema construction and
//! lifecycle errors surface through [`GraphQLError`] directly.

use std::fmt;

use objectgraph_store::StoreError;

/// Errors that can occur during GraphQL operations.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema is still being built - client should retry.
    SchemaInitializing,

    /// Schema build failed.
    SchemaBuildFailed(String),

    /// Permission denied by the record store.
    Forbidden(String),

    /// Record not found.
    NotFound {
        /// Object name.
        object: String,
        /// Record id.
        id: String,
    },

    /// Record store error.
    Store(String),

    /// Internal error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaInitializing => {
                write!(f, "GraphQL schema is initializing, please retry")
            }
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::Forbidden(msg) => {
                write!(f, "Forbidden: {msg}")
            }
            Self::NotFound { object, id } => {
                write!(f, "{object}/{id} not found")
            }
            Self::Store(msg) => {
                write!(f, "Record store error: {msg}")
            }
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaInitializing => "SCHEMA_INITIALIZING",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for GraphQLError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { object, id } => Self::NotFound { object, id },
            StoreError::AccessDenied { message } => Self::Forbidden(message),
            other => Self::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::SchemaInitializing.error_code(),
            "SCHEMA_INITIALIZING"
        );
        assert_eq!(
            GraphQLError::SchemaBuildFailed("boom".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
        assert_eq!(
            GraphQLError::NotFound {
                object: "projects".into(),
                id: "p1".into()
            }
            .error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_display() {
        let err = GraphQLError::NotFound {
            object: "projects".into(),
            id: "p1".into(),
        };
        assert_eq!(err.to_string(), "projects/p1 not found");
    }

    #[test]
    fn test_from_store_error() {
        let err = GraphQLError::from(StoreError::not_found("projects", "p1"));
        assert!(matches!(err, GraphQLError::NotFound { .. }));

        let err = GraphQLError::from(StoreError::access_denied("no read on projects"));
        assert!(matches!(err, GraphQLError::Forbidden(_)));

        let err = GraphQLError::from(StoreError::internal("boom"));
        assert!(matches!(err, GraphQLError::Store(_)));
    }
}
