//! Relationship collection.
//!
//! Scans every object across all data sources once per schema build and
//! produces the reverse index of synthesized relationship fields:
//!
//! - each `master_detail` field puts a child-list entry on the *referenced*
//!   object, named after the referring object
//! - each `enable_*` flag puts a sub-resource entry on the *owning* object,
//!   named after the corresponding well-known object; those entries match
//!   children through a polymorphic `(owner-type, owner-id)` pair instead
//!   of a plain foreign key
//!
//! The index is a value owned by one build invocation. Rebuilding a schema
//! collects from scratch; nothing accumulates across builds.

use indexmap::IndexMap;
use std::collections::HashMap;

use objectgraph_metadata::{
    FieldType, MetadataRegistry, ObjectMetadata, ReferenceTo, normalize_name,
};
use tracing::trace;

/// Name prefix of every synthesized relationship field.
pub const RELATED_PREFIX: &str = "related__";

/// The well-known user object; lookups into it run without an access
/// context.
pub const USERS_OBJECT: &str = "users";

/// A synthesized reverse relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedEntry {
    /// Schema field name, `related__` + the normalized source object name.
    pub field_name: String,

    /// Normalized name of the object carrying the field.
    pub target_object: String,

    /// Raw name of the object whose records the field lists.
    pub source_object: String,

    /// Field on the source records holding the link: the declaring
    /// master-detail field, or the polymorphic owner field of a
    /// sub-resource.
    pub source_field: String,

    /// Whether the link is an enabled sub-resource, matched through the
    /// polymorphic `(owner-type, owner-id)` pair.
    pub by_enabled: bool,
}

/// Reverse index of synthesized fields, keyed by the normalized name of
/// the object carrying them.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    entries: HashMap<String, IndexMap<String, RelatedEntry>>,
}

impl ReverseIndex {
    fn insert(&mut self, entry: RelatedEntry) {
        self.entries
            .entry(entry.target_object.clone())
            .or_default()
            .insert(entry.field_name.clone(), entry);
    }

    /// Returns the synthesized fields carried by the named object.
    pub fn entries_for(&self, normalized_object: &str) -> impl Iterator<Item = &RelatedEntry> {
        self.entries
            .get(normalized_object)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    /// Looks up one entry by carrying object and field name.
    #[must_use]
    pub fn get(&self, normalized_object: &str, field_name: &str) -> Option<&RelatedEntry> {
        self.entries.get(normalized_object)?.get(field_name)
    }

    /// Returns the total number of synthesized fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(IndexMap::len).sum()
    }

    /// Returns `true` if no fields were synthesized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four enabled sub-resources: flag, well-known object, link field.
fn enabled_sub_resources(object: &ObjectMetadata) -> Vec<(&'static str, &'static str)> {
    let mut subs = Vec::new();
    if object.enable_files {
        subs.push(("cms_files", "parent"));
    }
    if object.enable_tasks {
        subs.push(("tasks", "related_to"));
    }
    if object.enable_events {
        subs.push(("events", "related_to"));
    }
    if object.enable_audit {
        subs.push(("audit_records", "related_to"));
    }
    subs
}

/// Builds the reverse index for one schema build.
///
/// Objects without a name are skipped; partially defined metadata never
/// fails collection.
#[must_use]
pub fn collect_related(registry: &MetadataRegistry) -> ReverseIndex {
    let mut index = ReverseIndex::default();

    for data_source in registry.data_sources() {
        for object in data_source.objects().values() {
            if object.name.is_empty() {
                continue;
            }
            let owner = normalize_name(&object.name);

            for field in object.fields.values() {
                if field.field_type != Some(FieldType::MasterDetail) {
                    continue;
                }
                let Some(target) = field.reference_to.as_ref().and_then(ReferenceTo::as_single)
                else {
                    continue;
                };
                trace!(
                    source = %object.name,
                    field = %field.name,
                    target = %target,
                    "collected master-detail reverse field"
                );
                index.insert(RelatedEntry {
                    field_name: format!("{RELATED_PREFIX}{owner}"),
                    target_object: normalize_name(target),
                    source_object: object.name.clone(),
                    source_field: field.name.clone(),
                    by_enabled: false,
                });
            }

            for (sub_object, link_field) in enabled_sub_resources(object) {
                trace!(
                    owner = %object.name,
                    sub_resource = %sub_object,
                    "collected enabled sub-resource field"
                );
                index.insert(RelatedEntry {
                    field_name: format!("{RELATED_PREFIX}{sub_object}"),
                    target_object: owner.clone(),
                    source_object: sub_object.to_string(),
                    source_field: link_field.to_string(),
                    by_enabled: true,
                });
            }
        }
    }

    index
}
