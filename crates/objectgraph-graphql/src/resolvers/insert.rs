//! Insert mutation resolver.
//!
//! Handles `<object>_INSERT_ONE(data: Json!)` mutations.

use async_graphql::Error as FieldError;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{get_graphql_context, json_to_graphql_value, value_accessor_to_json};
use crate::error::GraphQLError;
use crate::schema::types::ID_FIELD;

/// Resolver for insert mutations.
pub(crate) struct InsertResolver;

impl InsertResolver {
    /// Creates a resolver for inserting one record.
    ///
    /// A payload without an identifier gets a freshly generated one before
    /// the store is called.
    pub(crate) fn resolve(
        object_name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let object_name = object_name.clone();
            FieldFuture::new(async move {
                debug!(object = %object_name, "processing insert mutation");

                let gql_ctx = get_graphql_context(&ctx)?;

                let input = ctx
                    .args
                    .get("data")
                    .ok_or_else(|| FieldError::new("Missing required argument 'data'"))?;
                let mut data = value_accessor_to_json(&input)?;

                let Value::Object(record) = &mut data else {
                    return Err(FieldError::new("Argument 'data' must be an object"));
                };
                if record.get(ID_FIELD).and_then(Value::as_str).is_none() {
                    record.insert(
                        ID_FIELD.to_string(),
                        Value::String(Uuid::new_v4().to_string()),
                    );
                }

                let inserted = gql_ctx
                    .store
                    .insert(&object_name, data, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(error = %e, object = %object_name, "insert failed");
                        GraphQLError::from(e)
                    })?;

                debug!(
                    object = %object_name,
                    id = %inserted.get(ID_FIELD).and_then(|v| v.as_str()).unwrap_or_default(),
                    "record inserted"
                );
                Ok(Some(json_to_graphql_value(inserted)))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_resolver_created() {
        let _resolver = InsertResolver::resolve("projects".to_string());
    }
}
