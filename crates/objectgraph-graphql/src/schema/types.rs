//! Object type synthesis.
//!
//! Converts one object's field map (declared fields plus collected reverse
//! fields) into a GraphQL object type, classifying each field through a
//! closed [`FieldKind`] dispatch and binding relationship fields to their
//! resolvers.
//!
//! Cyclic metadata is the interesting case: a type identity is reserved in
//! the [`TypeCache`] *before* its relationship fields are wired, and those
//! fields reference their target types by name. Mutually referencing
//! objects therefore resolve to one shared type each instead of recursing.

use std::collections::{HashSet, VecDeque};

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, Object, TypeRef};
use objectgraph_metadata::{
    FieldDefinition, FieldType, MetadataRegistry, ObjectMetadata, ReferenceTo, normalize_name,
};
use tracing::{trace, warn};

use super::related::ReverseIndex;
use crate::resolvers::{LookupResolver, RelatedResolver};

/// The name of the opaque JSON scalar registered with every schema.
pub(crate) const JSON_SCALAR: &str = "Json";

/// The identifier field injected into every synthesized type.
pub(crate) const ID_FIELD: &str = "_id";

/// Per-build registry of synthesized types.
///
/// Reserves a type identity before its fields are computed, so cyclic and
/// repeated references resolve to one shared type per object name. Owned
/// by a single schema build; nothing survives into the next build.
#[derive(Debug, Default)]
pub(crate) struct TypeCache {
    /// Normalized names of fully synthesized types.
    generated: HashSet<String>,
    /// Normalized names currently being synthesized (cycle guard).
    generating: HashSet<String>,
    /// Raw object names queued for synthesis.
    pending: VecDeque<String>,
    /// Finished types awaiting schema registration.
    objects: Vec<Object>,
}

impl TypeCache {
    /// Creates an empty cache.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Checks whether a type has been synthesized or is in progress.
    pub(crate) fn is_known(&self, normalized: &str) -> bool {
        self.generated.contains(normalized) || self.generating.contains(normalized)
    }

    /// Queues a raw object name for synthesis if its type is not already
    /// known or queued.
    pub(crate) fn queue(&mut self, raw_name: &str) {
        let normalized = normalize_name(raw_name);
        if self.is_known(&normalized) {
            return;
        }
        if self
            .pending
            .iter()
            .any(|queued| normalize_name(queued) == normalized)
        {
            return;
        }
        self.pending.push_back(raw_name.to_string());
    }

    /// Gets the next raw object name to synthesize.
    pub(crate) fn pop_pending(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Marks a type as being synthesized.
    pub(crate) fn start_generating(&mut self, normalized: &str) {
        self.generating.insert(normalized.to_string());
    }

    /// Marks a type as done and stores it for registration.
    pub(crate) fn finish_generating(&mut self, normalized: &str, object: Object) {
        self.generating.remove(normalized);
        self.generated.insert(normalized.to_string());
        self.objects.push(object);
    }

    /// Takes all finished types for schema registration.
    pub(crate) fn take_objects(&mut self) -> Vec<Object> {
        std::mem::take(&mut self.objects)
    }

    /// Returns the number of synthesized types.
    pub(crate) fn generated_count(&self) -> usize {
        self.generated.len()
    }
}

/// Scalar schema types a declared field can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    String,
    Float,
    Boolean,
}

impl ScalarKind {
    fn type_ref(self) -> TypeRef {
        match self {
            Self::String => TypeRef::named(TypeRef::STRING),
            Self::Float => TypeRef::named(TypeRef::FLOAT),
            Self::Boolean => TypeRef::named(TypeRef::BOOLEAN),
        }
    }
}

/// How a declared field maps into the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// No declared type; the field is reported and skipped.
    Untyped,
    /// Maps to a scalar schema type.
    Scalar(ScalarKind),
    /// A single-target relationship.
    Reference { target: String, multiple: bool },
    /// Everything else passes through as opaque JSON.
    Passthrough,
}

/// Classifies a declared field.
///
/// Multi-target references and unrecognized types degrade to
/// [`FieldKind::Passthrough`]; only a missing type is skipped outright.
pub(crate) fn classify(field: &FieldDefinition) -> FieldKind {
    let Some(field_type) = field.field_type else {
        return FieldKind::Untyped;
    };
    match field_type {
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Html
        | FieldType::Select
        | FieldType::Url
        | FieldType::Email
        | FieldType::Date
        | FieldType::DateTime => FieldKind::Scalar(ScalarKind::String),
        FieldType::Number | FieldType::Currency => FieldKind::Scalar(ScalarKind::Float),
        FieldType::Boolean => FieldKind::Scalar(ScalarKind::Boolean),
        FieldType::Lookup | FieldType::MasterDetail => {
            match field.reference_to.as_ref().and_then(ReferenceTo::as_single) {
                Some(target) => FieldKind::Reference {
                    target: target.to_string(),
                    // Only lookups carry id lists; a multi-valued
                    // master-detail is not a thing.
                    multiple: field_type == FieldType::Lookup && field.multiple,
                },
                None => FieldKind::Passthrough,
            }
        }
        FieldType::Other => FieldKind::Passthrough,
    }
}

/// Synthesizes the GraphQL object type for one object.
///
/// Referenced objects are queued on the cache for synthesis; unresolved
/// reference targets cause the field to be omitted with a diagnostic.
/// This function never fails - malformed fields degrade individually.
pub(crate) fn build_object_type(
    object: &ObjectMetadata,
    registry: &MetadataRegistry,
    related: &ReverseIndex,
    cache: &mut TypeCache,
) -> Object {
    let type_name = normalize_name(&object.name);
    let mut obj = Object::new(&type_name);

    obj = obj.field(extract_field(ID_FIELD, TypeRef::named(TypeRef::STRING)));

    // On a name clash the synthesized field wins over the declared one.
    let related_names: HashSet<&str> = related
        .entries_for(&type_name)
        .map(|entry| entry.field_name.as_str())
        .collect();

    for (field_name, field) in &object.fields {
        // Dotted names denote nested paths, not direct schema fields.
        if field_name.contains('.') {
            trace!(object = %object.name, field = %field_name, "skipping dotted field name");
            continue;
        }
        if field_name == ID_FIELD || related_names.contains(field_name.as_str()) {
            continue;
        }

        match classify(field) {
            FieldKind::Untyped => {
                warn!(
                    object = %object.name,
                    field = %field_name,
                    "field has no type, skipping"
                );
            }
            FieldKind::Scalar(scalar) => {
                obj = obj.field(extract_field(field_name, scalar.type_ref()));
            }
            FieldKind::Reference { target, multiple } => {
                let target_type = normalize_name(&target);
                if registry.get_object(&target).is_none() || !is_valid_type_name(&target_type) {
                    warn!(
                        object = %object.name,
                        field = %field_name,
                        target = %target,
                        "reference target cannot be resolved, omitting field"
                    );
                    continue;
                }
                cache.queue(&target);
                let field = if multiple {
                    Field::new(
                        field_name,
                        TypeRef::named_list(target_type),
                        LookupResolver::resolve_many(field_name.clone(), target),
                    )
                } else {
                    Field::new(
                        field_name,
                        TypeRef::named(target_type),
                        LookupResolver::resolve_one(field_name.clone(), target),
                    )
                };
                obj = obj.field(field);
            }
            FieldKind::Passthrough => {
                obj = obj.field(extract_field(field_name, TypeRef::named(JSON_SCALAR)));
            }
        }
    }

    for entry in related.entries_for(&type_name) {
        let source_type = normalize_name(&entry.source_object);
        if registry.get_object(&entry.source_object).is_none()
            || !is_valid_type_name(&source_type)
        {
            warn!(
                object = %object.name,
                field = %entry.field_name,
                source = %entry.source_object,
                "related source object cannot be resolved, omitting field"
            );
            continue;
        }
        cache.queue(&entry.source_object);
        obj = obj.field(Field::new(
            &entry.field_name,
            TypeRef::named_list(source_type),
            RelatedResolver::resolve(entry.clone()),
        ));
    }

    obj
}

/// Creates a field resolver that extracts a value from the parent record.
fn extract_field(field_name: &str, type_ref: TypeRef) -> Field {
    let json_name = field_name.to_string();
    Field::new(field_name, type_ref, move |ctx| {
        let field_name = json_name.clone();
        FieldFuture::new(async move {
            if let Some(Value::Object(record)) = ctx.parent_value.as_value()
                && let Some(value) = record.get(&async_graphql::Name::new(&field_name))
            {
                return Ok(Some(value.clone()));
            }
            Ok(None)
        })
    })
}

/// Checks if a name is valid as a GraphQL identifier.
///
/// GraphQL names must match `[_a-zA-Z][_a-zA-Z0-9]*`. Normalization takes
/// care of dots; anything else invalid means the object is skipped.
pub(crate) fn is_valid_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use objectgraph_metadata::FieldDefinition;

    #[test]
    fn test_type_cache_queue() {
        let mut cache = TypeCache::new();

        cache.queue("projects");
        cache.queue("todo_items");
        cache.queue("projects"); // duplicate

        assert_eq!(cache.pop_pending(), Some("projects".to_string()));
        assert_eq!(cache.pop_pending(), Some("todo_items".to_string()));
        assert_eq!(cache.pop_pending(), None);
    }

    #[test]
    fn test_type_cache_cycle_guard() {
        let mut cache = TypeCache::new();

        cache.start_generating("projects");
        assert!(cache.is_known("projects"));

        // In-progress types are not queued again.
        cache.queue("projects");
        assert_eq!(cache.pop_pending(), None);

        cache.finish_generating("projects", Object::new("projects"));
        assert!(cache.is_known("projects"));
        assert_eq!(cache.generated_count(), 1);
    }

    #[test]
    fn test_type_cache_dedupes_normalized_names() {
        let mut cache = TypeCache::new();

        cache.queue("base.users");
        cache.queue("base_users");

        assert_eq!(cache.pop_pending(), Some("base.users".to_string()));
        assert_eq!(cache.pop_pending(), None);
    }

    #[test]
    fn test_classify_scalars() {
        let field = FieldDefinition::new("name", FieldType::Text);
        assert_eq!(classify(&field), FieldKind::Scalar(ScalarKind::String));

        let field = FieldDefinition::new("budget", FieldType::Currency);
        assert_eq!(classify(&field), FieldKind::Scalar(ScalarKind::Float));

        let field = FieldDefinition::new("archived", FieldType::Boolean);
        assert_eq!(classify(&field), FieldKind::Scalar(ScalarKind::Boolean));
    }

    #[test]
    fn test_classify_references() {
        let field = FieldDefinition::lookup("owner", "users");
        assert_eq!(
            classify(&field),
            FieldKind::Reference {
                target: "users".into(),
                multiple: false
            }
        );

        let field = FieldDefinition::lookup("members", "users").with_multiple(true);
        assert_eq!(
            classify(&field),
            FieldKind::Reference {
                target: "users".into(),
                multiple: true
            }
        );

        // The multiple flag only applies to lookups.
        let field = FieldDefinition::master_detail("project", "projects").with_multiple(true);
        assert_eq!(
            classify(&field),
            FieldKind::Reference {
                target: "projects".into(),
                multiple: false
            }
        );
    }

    #[test]
    fn test_classify_degraded_fields() {
        assert_eq!(classify(&FieldDefinition::untyped("tags")), FieldKind::Untyped);

        let field = FieldDefinition::new("blob", FieldType::Other);
        assert_eq!(classify(&field), FieldKind::Passthrough);

        // A lookup without a single target is passthrough, not an error.
        let mut field = FieldDefinition::new("related", FieldType::Lookup);
        field.reference_to = Some(ReferenceTo::Many(vec!["a".into(), "b".into()]));
        assert_eq!(classify(&field), FieldKind::Passthrough);

        let field = FieldDefinition::new("dangling", FieldType::Lookup);
        assert_eq!(classify(&field), FieldKind::Passthrough);
    }

    #[test]
    fn test_is_valid_type_name() {
        assert!(is_valid_type_name("projects"));
        assert!(is_valid_type_name("base_users"));
        assert!(is_valid_type_name("_internal"));
        assert!(is_valid_type_name("Type123"));

        assert!(!is_valid_type_name(""));
        assert!(!is_valid_type_name("123abc"));
        assert!(!is_valid_type_name("has-dash"));
        assert!(!is_valid_type_name("has space"));
    }
}
