//! The metadata registry.
//!
//! Holds every data source and resolves object names across all of them.
//! Field definitions may be registered for objects that do not exist yet;
//! such fields are queued and replayed the moment the object is declared,
//! so load order between object files and field files does not matter.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::MetadataError;
use crate::types::{DataSource, FieldDefinition, ObjectMetadata};

/// Registry of all object metadata, grouped by data source.
///
/// Object names are unique across the combined set of data sources;
/// [`MetadataRegistry::get_object`] resolves a name regardless of which
/// data source owns it.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    /// Data sources in registration order.
    data_sources: IndexMap<String, DataSource>,

    /// Fields registered before their owning object existed, keyed by
    /// object name. Drained when the object arrives.
    deferred_fields: HashMap<String, Vec<FieldDefinition>>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a data source. Any objects it carries pick up their deferred
    /// fields immediately.
    pub fn add_data_source(&mut self, data_source: DataSource) {
        let object_names: Vec<String> = data_source.objects.keys().cloned().collect();
        self.data_sources
            .insert(data_source.name.clone(), data_source);
        for name in object_names {
            self.load_deferred_fields(&name);
        }
    }

    /// Returns all registered data sources in registration order.
    pub fn data_sources(&self) -> impl Iterator<Item = &DataSource> {
        self.data_sources.values()
    }

    /// Resolves an object by name across all data sources.
    #[must_use]
    pub fn get_object(&self, name: &str) -> Option<&ObjectMetadata> {
        self.data_sources
            .values()
            .find_map(|ds| ds.objects.get(name))
    }

    /// Resolves an object by name, returning an error when absent.
    pub fn require_object(&self, name: &str) -> Result<&ObjectMetadata, MetadataError> {
        self.get_object(name)
            .ok_or_else(|| MetadataError::UnknownObject(name.to_string()))
    }

    /// Adds an object to the named data source, creating the data source
    /// if needed. Fields previously registered for this object name are
    /// attached now.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingObjectName`] if the object has an
    /// empty name.
    pub fn add_object(
        &mut self,
        data_source: &str,
        object: ObjectMetadata,
    ) -> Result<(), MetadataError> {
        if object.name.is_empty() {
            return Err(MetadataError::MissingObjectName);
        }
        let object_name = object.name.clone();
        self.data_sources
            .entry(data_source.to_string())
            .or_insert_with(|| DataSource::new(data_source))
            .add_object(object);
        self.load_deferred_fields(&object_name);
        Ok(())
    }

    /// Registers a field for an object.
    ///
    /// If the object exists the field is attached immediately; otherwise it
    /// is queued and attached when the object is declared.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingFieldName`] if the field has an
    /// empty name. This is the one fatal registration error: everything
    /// else about a field is tolerated until schema build time.
    pub fn add_field_config(
        &mut self,
        object_name: &str,
        field: FieldDefinition,
    ) -> Result<(), MetadataError> {
        if field.name.is_empty() {
            return Err(MetadataError::MissingFieldName);
        }

        if let Some(object) = self.get_object_mut(object_name) {
            trace!(object = %object_name, field = %field.name, "attaching field");
            object.fields.insert(field.name.clone(), field);
        } else {
            debug!(
                object = %object_name,
                field = %field.name,
                "object not declared yet, deferring field"
            );
            self.deferred_fields
                .entry(object_name.to_string())
                .or_default()
                .push(field);
        }
        Ok(())
    }

    /// Replays fields queued for the named object.
    ///
    /// The queue is drained, so replaying is attach-exactly-once: calling
    /// this again (or re-declaring the object) does not duplicate fields.
    /// A no-op when the object is still unknown or nothing is queued.
    pub fn load_deferred_fields(&mut self, object_name: &str) {
        if self.get_object(object_name).is_none() {
            return;
        }
        let Some(fields) = self.deferred_fields.remove(object_name) else {
            return;
        };
        debug!(
            object = %object_name,
            count = fields.len(),
            "replaying deferred fields"
        );
        for field in fields {
            if let Some(object) = self.get_object_mut(object_name) {
                object.fields.insert(field.name.clone(), field);
            }
        }
    }

    /// Returns the number of fields still queued for the named object.
    #[must_use]
    pub fn deferred_field_count(&self, object_name: &str) -> usize {
        self.deferred_fields
            .get(object_name)
            .map_or(0, Vec::len)
    }

    fn get_object_mut(&mut self, name: &str) -> Option<&mut ObjectMetadata> {
        self.data_sources
            .values_mut()
            .find_map(|ds| ds.objects.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[test]
    fn test_get_object_across_data_sources() {
        let mut registry = MetadataRegistry::new();
        registry
            .add_object("default", ObjectMetadata::new("projects"))
            .unwrap();
        registry
            .add_object("external", ObjectMetadata::new("invoices"))
            .unwrap();

        assert!(registry.get_object("projects").is_some());
        assert!(registry.get_object("invoices").is_some());
        assert!(registry.get_object("missing").is_none());
        assert!(registry.require_object("missing").is_err());
    }

    #[test]
    fn test_missing_names_are_fatal() {
        let mut registry = MetadataRegistry::new();

        let result = registry.add_object("default", ObjectMetadata::new(""));
        assert!(matches!(result, Err(MetadataError::MissingObjectName)));

        let result = registry.add_field_config("projects", FieldDefinition::untyped(""));
        assert!(matches!(result, Err(MetadataError::MissingFieldName)));
    }

    #[test]
    fn test_immediate_field_attachment() {
        let mut registry = MetadataRegistry::new();
        registry
            .add_object("default", ObjectMetadata::new("projects"))
            .unwrap();
        registry
            .add_field_config("projects", FieldDefinition::new("name", FieldType::Text))
            .unwrap();

        let object = registry.get_object("projects").unwrap();
        assert!(object.fields.contains_key("name"));
        assert_eq!(registry.deferred_field_count("projects"), 0);
    }

    #[test]
    fn test_deferred_field_attachment() {
        let mut registry = MetadataRegistry::new();

        // Field arrives before the object exists.
        registry
            .add_field_config("widgets", FieldDefinition::new("label", FieldType::Text))
            .unwrap();
        assert_eq!(registry.deferred_field_count("widgets"), 1);

        // Declaring the object replays the queue.
        registry
            .add_object("default", ObjectMetadata::new("widgets"))
            .unwrap();
        let object = registry.get_object("widgets").unwrap();
        assert!(object.fields.contains_key("label"));
        assert_eq!(registry.deferred_field_count("widgets"), 0);

        // Replaying again attaches nothing twice.
        registry.load_deferred_fields("widgets");
        assert_eq!(registry.get_object("widgets").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_deferred_fields_via_data_source() {
        let mut registry = MetadataRegistry::new();
        registry
            .add_field_config("gadgets", FieldDefinition::new("size", FieldType::Number))
            .unwrap();

        let mut ds = DataSource::new("default");
        ds.add_object(ObjectMetadata::new("gadgets"));
        registry.add_data_source(ds);

        assert!(
            registry
                .get_object("gadgets")
                .unwrap()
                .fields
                .contains_key("size")
        );
    }
}
