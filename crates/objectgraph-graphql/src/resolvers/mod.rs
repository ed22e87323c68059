//! Generated field resolvers.
//!
//! Every schema field synthesized by this crate is bound to one of the
//! resolver factories here:
//! - `find`: root query fields (list + find arguments)
//! - `lookup`: single and multi-valued relationship fields
//! - `related`: synthesized reverse relationship fields
//! - `insert` / `update` / `delete`: mutation fields
//!
//! Resolvers are thin: they shuttle arguments and the caller's access
//! context to the record store and convert JSON both ways. Store failures
//! become field errors, isolated to the branch that raised them.

mod delete;
mod find;
mod insert;
mod lookup;
mod related;
mod update;

pub(crate) use delete::DeleteResolver;
pub(crate) use find::FindResolver;
pub(crate) use insert::InsertResolver;
pub(crate) use lookup::LookupResolver;
pub(crate) use related::RelatedResolver;
pub(crate) use update::UpdateResolver;

use async_graphql::dynamic::{ResolverContext, ValueAccessor};
use async_graphql::{Error as FieldError, Name, Value};

use crate::context::GraphQLContext;

/// Helper to extract the execution context from a resolver context.
pub(crate) fn get_graphql_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GraphQLContext, FieldError> {
    ctx.data::<GraphQLContext>()
        .map_err(|_| FieldError::new("GraphQL context not available"))
}

/// Reads a field of the parent record.
pub(crate) fn parent_field<'a>(ctx: &'a ResolverContext<'_>, name: &str) -> Option<&'a Value> {
    match ctx.parent_value.as_value() {
        Some(Value::Object(record)) => record.get(&Name::new(name)),
        _ => None,
    }
}

/// Converts a `serde_json::Value` to a GraphQL value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(map) => {
            let map: async_graphql::indexmap::IndexMap<Name, Value> = map
                .into_iter()
                .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Converts a list of records to a GraphQL list value.
pub(crate) fn record_list(records: Vec<serde_json::Value>) -> Value {
    Value::List(records.into_iter().map(json_to_graphql_value).collect())
}

/// Converts an argument accessor to a `serde_json::Value`.
pub(crate) fn value_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<serde_json::Value, FieldError> {
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    if let Ok(b) = value.boolean() {
        return Ok(serde_json::Value::Bool(b));
    }

    if let Ok(i) = value.i64() {
        return Ok(serde_json::Value::Number(i.into()));
    }

    if let Ok(f) = value.f64() {
        return Ok(serde_json::json!(f));
    }

    if let Ok(s) = value.string() {
        return Ok(serde_json::Value::String(s.to_string()));
    }

    if let Ok(list) = value.list() {
        let items: Result<Vec<serde_json::Value>, FieldError> =
            list.iter().map(|v| value_accessor_to_json(&v)).collect();
        return Ok(serde_json::Value::Array(items?));
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v)?);
        }
        return Ok(serde_json::Value::Object(map));
    }

    Ok(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_to_graphql_value_primitives() {
        use serde_json::json;

        assert!(matches!(json_to_graphql_value(json!(null)), Value::Null));
        assert!(matches!(
            json_to_graphql_value(json!(true)),
            Value::Boolean(true)
        ));
        assert!(matches!(json_to_graphql_value(json!(42)), Value::Number(_)));
        assert!(
            matches!(json_to_graphql_value(json!("hello")), Value::String(s) if s == "hello")
        );
    }

    #[test]
    fn test_json_to_graphql_value_complex() {
        use serde_json::json;

        assert!(matches!(
            json_to_graphql_value(json!([1, 2, 3])),
            Value::List(_)
        ));
        assert!(matches!(
            json_to_graphql_value(json!({"name": "Ada"})),
            Value::Object(_)
        ));
    }

    #[test]
    fn test_record_list() {
        use serde_json::json;

        let list = record_list(vec![json!({"_id": "a"}), json!({"_id": "b"})]);
        let Value::List(items) = list else {
            panic!("expected list value");
        };
        assert_eq!(items.len(), 2);
    }
}
