//! Relationship lookup resolvers.
//!
//! A lookup or master-detail field stores the referenced record's id (or a
//! list of ids when `multiple`). These resolvers turn the stored value
//! into the referenced record(s) by delegating to the record store.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use objectgraph_store::FindOptions;
use serde_json::json;
use tracing::warn;

use super::{get_graphql_context, json_to_graphql_value, parent_field, record_list};
use crate::error::GraphQLError;
use crate::schema::USERS_OBJECT;
use crate::schema::types::ID_FIELD;

/// Resolvers for relationship fields.
pub(crate) struct LookupResolver;

impl LookupResolver {
    /// Creates a resolver for a single-valued relationship field.
    ///
    /// The stored reference value is fetched with `find_one`. Lookups into
    /// the well-known user object always run without an access context.
    pub(crate) fn resolve_one(
        field_name: String,
        target_object: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let field_name = field_name.clone();
            let target_object = target_object.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let id = match parent_field(&ctx, &field_name) {
                    Some(Value::String(id)) => id.clone(),
                    // Nothing stored means nothing to fetch.
                    _ => return Ok(None),
                };

                let session = if target_object == USERS_OBJECT {
                    None
                } else {
                    gql_ctx.user.as_ref()
                };

                let record = gql_ctx
                    .store
                    .find_one(&target_object, &id, &FindOptions::new(), session)
                    .await
                    .map_err(|e| {
                        warn!(
                            error = %e,
                            target = %target_object,
                            id = %id,
                            "store error during lookup"
                        );
                        GraphQLError::from(e)
                    })?;

                Ok(record.map(json_to_graphql_value))
            })
        }
    }

    /// Creates a resolver for a multi-valued lookup field.
    ///
    /// The stored id list is fetched in one `find` call with an
    /// or-combined id filter. An empty list never reaches the store.
    pub(crate) fn resolve_many(
        field_name: String,
        target_object: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let field_name = field_name.clone();
            let target_object = target_object.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let ids: Vec<String> = match parent_field(&ctx, &field_name) {
                    Some(Value::List(items)) => items
                        .iter()
                        .filter_map(|item| match item {
                            Value::String(id) => Some(id.clone()),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                if ids.is_empty() {
                    return Ok(None);
                }

                let mut filters = Vec::with_capacity(ids.len() * 2 - 1);
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        filters.push(json!("or"));
                    }
                    filters.push(json!([ID_FIELD, "=", id]));
                }
                let options =
                    FindOptions::new().with_filters(serde_json::Value::Array(filters));

                let records = gql_ctx
                    .store
                    .find(&target_object, &options, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(
                            error = %e,
                            target = %target_object,
                            "store error during multi-lookup"
                        );
                        GraphQLError::from(e)
                    })?;

                Ok(Some(record_list(records)))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_resolvers_created() {
        let _one = LookupResolver::resolve_one("owner".to_string(), "users".to_string());
        let _many = LookupResolver::resolve_many("members".to_string(), "users".to_string());
    }
}
