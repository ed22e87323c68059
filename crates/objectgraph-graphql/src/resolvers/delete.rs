//! Delete mutation resolver.
//!
//! Handles `<object>_DELETE_ONE(_id: String!, selector: Json)` mutations.
//! Returns the deleted record, or null when nothing was deleted.

use async_graphql::Error as FieldError;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{get_graphql_context, json_to_graphql_value};
use crate::error::GraphQLError;

/// Resolver for delete mutations.
pub(crate) struct DeleteResolver;

impl DeleteResolver {
    /// Creates a resolver for deleting one record by id.
    pub(crate) fn resolve(
        object_name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let object_name = object_name.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let id = ctx
                    .args
                    .get("_id")
                    .and_then(|v| v.string().ok())
                    .ok_or_else(|| FieldError::new("Missing required argument '_id'"))?
                    .to_string();

                debug!(object = %object_name, id = %id, "processing delete mutation");

                let deleted = gql_ctx
                    .store
                    .delete(&object_name, &id, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(error = %e, object = %object_name, id = %id, "delete failed");
                        GraphQLError::from(e)
                    })?;

                Ok(deleted.map(json_to_graphql_value))
            })
        }
    }
}
