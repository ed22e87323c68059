//! Reverse relationship resolver.
//!
//! Backs the synthesized `related__*` fields. Each resolver closes over
//! its own [`RelatedEntry`], so resolution needs no shared lookup state:
//! the filter is built from the entry and the parent record's id.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use objectgraph_store::FindOptions;
use serde_json::json;
use tracing::warn;

use super::{get_graphql_context, parent_field, record_list};
use crate::error::GraphQLError;
use crate::schema::RelatedEntry;
use crate::schema::types::ID_FIELD;

/// Resolver for synthesized reverse relationship fields.
pub(crate) struct RelatedResolver;

impl RelatedResolver {
    /// Creates a resolver for one reverse field.
    ///
    /// Enabled sub-resources are matched through the polymorphic
    /// `(<field>.o, <field>.ids)` owner pair; master-detail children
    /// through plain foreign-key equality. Ordering is whatever the store
    /// returns.
    pub(crate) fn resolve(
        entry: RelatedEntry,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let entry = entry.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let parent_id = match parent_field(&ctx, ID_FIELD) {
                    Some(Value::String(id)) => id.clone(),
                    _ => return Ok(None),
                };

                let filters = if entry.by_enabled {
                    json!([
                        [format!("{}.o", entry.source_field), "=", entry.target_object],
                        [format!("{}.ids", entry.source_field), "=", parent_id]
                    ])
                } else {
                    json!([[entry.source_field, "=", parent_id]])
                };

                let options = FindOptions::new().with_filters(filters);
                let records = gql_ctx
                    .store
                    .find(&entry.source_object, &options, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(
                            error = %e,
                            source = %entry.source_object,
                            field = %entry.field_name,
                            "store error during reverse lookup"
                        );
                        GraphQLError::from(e)
                    })?;

                Ok(Some(record_list(records)))
            })
        }
    }
}
