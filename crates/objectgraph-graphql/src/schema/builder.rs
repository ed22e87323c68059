//! Schema assembly.
//!
//! `SchemaBuilder` drives one schema build: collect the reverse index,
//! synthesize a type per object, then assemble the query root (one list
//! field per object with find-style arguments) and the mutation root
//! (insert/update/delete per object). The reverse index and type cache
//! are constructed fresh inside `build()` and dropped with it.

use std::collections::HashSet;
use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, InputValue, Object, Scalar, Schema, TypeRef};
use async_graphql::Value;
use objectgraph_metadata::{MetadataRegistry, normalize_name};
use tracing::{debug, trace, warn};

use super::related::{ReverseIndex, collect_related};
use super::types::{JSON_SCALAR, TypeCache, build_object_type, is_valid_type_name};
use crate::error::GraphQLError;
use crate::resolvers::{DeleteResolver, FindResolver, InsertResolver, UpdateResolver};

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds a GraphQL schema from object metadata.
///
/// The generated schema contains, per object:
/// - a query root field returning a list of the object's type, with
///   `fields`/`filters`/`top`/`skip`/`sort` arguments forwarded to `find`
/// - `<name>_INSERT_ONE`, `<name>_UPDATE_ONE` and `<name>_DELETE_ONE`
///   mutation fields
///
/// # Example
///
/// ```ignore
/// let builder = SchemaBuilder::new(registry, SchemaBuilderConfig::default());
/// let schema = builder.build()?;
/// ```
pub struct SchemaBuilder {
    /// Metadata registry the schema is derived from.
    registry: Arc<MetadataRegistry>,

    /// Configuration options.
    config: SchemaBuilderConfig,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(registry: Arc<MetadataRegistry>, config: SchemaBuilderConfig) -> Self {
        Self { registry, config }
    }

    /// Builds the schema.
    ///
    /// The build tolerates malformed metadata: objects without usable
    /// names and fields with unresolvable targets are skipped with a
    /// diagnostic rather than failing the build.
    ///
    /// # Errors
    ///
    /// Returns an error if final schema construction fails.
    pub fn build(&self) -> Result<Schema, GraphQLError> {
        debug!("starting GraphQL schema build");

        let related = collect_related(&self.registry);
        let mut cache = TypeCache::new();

        // One entity per distinct normalized name, in data source order.
        let mut entities: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for data_source in self.registry.data_sources() {
            for object in data_source.objects().values() {
                if object.name.is_empty() {
                    debug!(data_source = %data_source.name, "skipping unnamed object");
                    continue;
                }
                let normalized = normalize_name(&object.name);
                if !is_valid_type_name(&normalized) {
                    warn!(object = %object.name, "object name is not schema-safe, skipping");
                    continue;
                }
                if seen.insert(normalized) {
                    entities.push(object.name.clone());
                    cache.queue(&object.name);
                }
            }
        }

        self.build_types(&related, &mut cache);
        debug!(
            entities = entities.len(),
            types = cache.generated_count(),
            related_fields = related.len(),
            "type synthesis complete"
        );

        let mut schema_builder = Schema::build("Query", Some("Mutation"), None);

        schema_builder = schema_builder
            .register(Scalar::new(JSON_SCALAR).description("An opaque JSON value"));
        for object in cache.take_objects() {
            schema_builder = schema_builder.register(object);
        }

        schema_builder = schema_builder.register(self.build_query_type(&entities));
        schema_builder = schema_builder.register(self.build_mutation_type(&entities));

        let mut schema_builder = schema_builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);
        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }

    /// Drains the pending queue, synthesizing every reachable type.
    fn build_types(&self, related: &ReverseIndex, cache: &mut TypeCache) {
        while let Some(raw_name) = cache.pop_pending() {
            let normalized = normalize_name(&raw_name);
            if cache.is_known(&normalized) {
                continue;
            }
            let Some(object) = self.registry.get_object(&raw_name) else {
                // Queued targets are checked before queueing; a miss here
                // means the registry changed mid-build.
                warn!(object = %raw_name, "queued object vanished from registry");
                continue;
            };
            trace!(object = %raw_name, "synthesizing type");
            cache.start_generating(&normalized);
            let synthesized = build_object_type(object, &self.registry, related, cache);
            cache.finish_generating(&normalized, synthesized);
        }
    }

    /// Builds the query root with one list field per entity.
    fn build_query_type(&self, entities: &[String]) -> Object {
        let mut query = Object::new("Query");

        query = query.field(
            Field::new("_health", TypeRef::named_nn(TypeRef::STRING), |_| {
                FieldFuture::new(async { Ok(Some(Value::String("ok".to_string()))) })
            })
            .description("Health check"),
        );
        query = query.field(
            Field::new("_version", TypeRef::named_nn(TypeRef::STRING), |_| {
                FieldFuture::new(async {
                    Ok(Some(Value::String(env!("CARGO_PKG_VERSION").to_string())))
                })
            })
            .description("API version"),
        );

        for raw_name in entities {
            let field_name = normalize_name(raw_name);
            let field = Field::new(
                &field_name,
                TypeRef::named_list(&field_name),
                FindResolver::resolve(raw_name.clone()),
            )
            .argument(InputValue::new("fields", TypeRef::named_list(TypeRef::STRING)))
            .argument(InputValue::new("filters", TypeRef::named(JSON_SCALAR)))
            .argument(InputValue::new("top", TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new("skip", TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new("sort", TypeRef::named(TypeRef::STRING)));
            query = query.field(field);
            trace!(object = %raw_name, "added root query field");
        }

        query
    }

    /// Builds the mutation root with insert/update/delete per entity.
    fn build_mutation_type(&self, entities: &[String]) -> Object {
        let mut mutation = Object::new("Mutation");

        // A declared type must carry at least one field.
        if entities.is_empty() {
            mutation = mutation.field(
                Field::new("_noop", TypeRef::named(TypeRef::STRING), |_| {
                    FieldFuture::new(async { Ok(None::<Value>) })
                })
                .description("Placeholder for metadata with no objects"),
            );
        }

        for raw_name in entities {
            let base = normalize_name(raw_name);

            mutation = mutation.field(
                Field::new(
                    format!("{base}_INSERT_ONE"),
                    TypeRef::named(JSON_SCALAR),
                    InsertResolver::resolve(raw_name.clone()),
                )
                .argument(InputValue::new("data", TypeRef::named_nn(JSON_SCALAR))),
            );

            mutation = mutation.field(
                Field::new(
                    format!("{base}_UPDATE_ONE"),
                    TypeRef::named(JSON_SCALAR),
                    UpdateResolver::resolve(raw_name.clone()),
                )
                .argument(InputValue::new("_id", TypeRef::named_nn(TypeRef::STRING)))
                .argument(InputValue::new("selector", TypeRef::named(JSON_SCALAR)))
                .argument(InputValue::new("data", TypeRef::named_nn(JSON_SCALAR))),
            );

            mutation = mutation.field(
                Field::new(
                    format!("{base}_DELETE_ONE"),
                    TypeRef::named(JSON_SCALAR),
                    DeleteResolver::resolve(raw_name.clone()),
                )
                .argument(InputValue::new("_id", TypeRef::named_nn(TypeRef::STRING)))
                .argument(InputValue::new("selector", TypeRef::named(JSON_SCALAR))),
            );

            trace!(object = %raw_name, "added mutation fields");
        }

        mutation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objectgraph_metadata::{FieldDefinition, FieldType, ObjectMetadata};

    fn registry_with(objects: Vec<ObjectMetadata>) -> Arc<MetadataRegistry> {
        let mut registry = MetadataRegistry::new();
        for object in objects {
            registry.add_object("default", object).unwrap();
        }
        Arc::new(registry)
    }

    #[test]
    fn test_default_config() {
        let config = SchemaBuilderConfig::default();
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection_enabled);
    }

    #[test]
    fn test_empty_registry_still_builds() {
        let builder = SchemaBuilder::new(
            Arc::new(MetadataRegistry::new()),
            SchemaBuilderConfig::default(),
        );

        let schema = builder.build().expect("schema should build");
        let sdl = schema.sdl();
        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("_health"));
        assert!(sdl.contains("_noop"));
    }

    #[test]
    fn test_schema_with_objects() {
        let registry = registry_with(vec![
            ObjectMetadata::new("users")
                .with_field(FieldDefinition::new("name", FieldType::Text)),
            ObjectMetadata::new("projects")
                .with_field(FieldDefinition::new("name", FieldType::Text))
                .with_field(FieldDefinition::new("budget", FieldType::Currency))
                .with_field(FieldDefinition::lookup("owner", "users")),
        ]);

        let builder = SchemaBuilder::new(registry, SchemaBuilderConfig::default());
        let schema = builder.build().unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type projects"));
        assert!(sdl.contains("type users"));
        assert!(sdl.contains("projects("));
        assert!(sdl.contains("filters: Json"));
        assert!(sdl.contains("projects_INSERT_ONE("));
        assert!(sdl.contains("projects_UPDATE_ONE("));
        assert!(sdl.contains("projects_DELETE_ONE("));
        assert!(sdl.contains("owner: users"));
        assert!(sdl.contains("budget: Float"));
        assert!(sdl.contains("scalar Json"));
    }

    #[test]
    fn test_unresolved_reference_is_omitted() {
        let registry = registry_with(vec![
            ObjectMetadata::new("projects")
                .with_field(FieldDefinition::new("name", FieldType::Text))
                .with_field(FieldDefinition::lookup("owner", "ghosts")),
        ]);

        let builder = SchemaBuilder::new(registry, SchemaBuilderConfig::default());
        let schema = builder.build().unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("name: String"));
        assert!(!sdl.contains("owner"));
        assert!(!sdl.contains("ghosts"));
    }

    #[test]
    fn test_dotted_object_names_are_normalized() {
        let registry = registry_with(vec![
            ObjectMetadata::new("base.accounts")
                .with_field(FieldDefinition::new("name", FieldType::Text)),
        ]);

        let builder = SchemaBuilder::new(registry, SchemaBuilderConfig::default());
        let schema = builder.build().unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type base_accounts"));
        assert!(sdl.contains("base_accounts_INSERT_ONE"));
    }

    #[test]
    fn test_build_with_disabled_introspection() {
        let registry = registry_with(vec![ObjectMetadata::new("projects")]);
        let config = SchemaBuilderConfig {
            introspection_enabled: false,
            ..Default::default()
        };

        let builder = SchemaBuilder::new(registry, config);
        assert!(builder.build().is_ok());
    }
}
