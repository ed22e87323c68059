//! Update mutation resolver.
//!
//! Handles `<object>_UPDATE_ONE(_id: String!, selector: Json, data: Json!)`
//! mutations. The `selector` argument is accepted for interface
//! compatibility; the store is addressed by id alone.

use async_graphql::Error as FieldError;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{get_graphql_context, json_to_graphql_value, value_accessor_to_json};
use crate::error::GraphQLError;

/// Resolver for update mutations.
pub(crate) struct UpdateResolver;

impl UpdateResolver {
    /// Creates a resolver for updating one record by id.
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

                let input = ctx
                    .args
                    .get("data")
                    .ok_or_else(|| FieldError::new("Missing required argument 'data'"))?;
                let data = value_accessor_to_json(&input)?;
                if !data.is_object() {
                    return Err(FieldError::new("Argument 'data' must be an object"));
                }

                debug!(object = %object_name, id = %id, "processing update mutation");

                let updated = gql_ctx
                    .store
                    .update(&object_name, &id, data, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(error = %e, object = %object_name, id = %id, "update failed");
                        GraphQLError::from(e)
                    })?;

                Ok(Some(json_to_graphql_value(updated)))
            })
        }
    }
}
