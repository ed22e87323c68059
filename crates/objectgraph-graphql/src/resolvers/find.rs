//! Root query resolver.
//!
//! Backs the per-object list fields on the query root, e.g.
//! `projects(filters: ..., top: 10, sort: "name")`. Arguments are passed
//! through to the record store verbatim.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use async_graphql::Error as FieldError;
use objectgraph_store::FindOptions;
use tracing::{debug, warn};

use super::{get_graphql_context, record_list, value_accessor_to_json};
use crate::error::GraphQLError;

/// Resolver for root list queries.
pub(crate) struct FindResolver;

impl FindResolver {
    /// Creates a resolver for the root query field of one object.
    pub(crate) fn resolve(
        object_name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let object_name = object_name.clone();
            FieldFuture::new(async move {
                debug!(object = %object_name, "resolving root query");

                let gql_ctx = get_graphql_context(&ctx)?;
                let options = find_options_from_args(&ctx)?;

                let records = gql_ctx
                    .store
                    .find(&object_name, &options, gql_ctx.user.as_ref())
                    .await
                    .map_err(|e| {
                        warn!(error = %e, object = %object_name, "store error during find");
                        GraphQLError::from(e)
                    })?;

                debug!(
                    object = %object_name,
                    count = records.len(),
                    "root query resolved"
                );
                Ok(Some(record_list(records)))
            })
        }
    }
}

/// Builds find options from the root query arguments.
fn find_options_from_args(ctx: &ResolverContext<'_>) -> Result<FindOptions, FieldError> {
    let mut options = FindOptions::new();

    if let Some(fields) = ctx.args.get("fields")
        && let Ok(list) = fields.list()
    {
        let names = list
            .iter()
            .filter_map(|v| v.string().ok().map(str::to_string))
            .collect();
        options = options.with_fields(names);
    }
    if let Some(filters) = ctx.args.get("filters") {
        options = options.with_filters(value_accessor_to_json(&filters)?);
    }
    if let Some(top) = ctx.args.get("top")
        && let Ok(n) = top.i64()
    {
        options = options.with_top(n.max(0) as u32);
    }
    if let Some(skip) = ctx.args.get("skip")
        && let Ok(n) = skip.i64()
    {
        options = options.with_skip(n.max(0) as u32);
    }
    if let Some(sort) = ctx.args.get("sort")
        && let Ok(s) = sort.string()
    {
        options = options.with_sort(s);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_resolver_created() {
        let _resolver = FindResolver::resolve("projects".to_string());
    }
}
