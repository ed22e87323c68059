//! Metadata value types.
//!
//! These types mirror the JSON documents that object and field definitions
//! are authored in, so everything here is serde-deserializable. Unknown
//! field type strings deserialize to [`FieldType::Other`] rather than
//! failing, keeping partially understood metadata loadable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Converts an object name to a schema-safe identifier.
///
/// Object names may contain dots (e.g. `base.users`); schema type and
/// field names may not, so dots are replaced with underscores.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.replace('.', "_")
}

/// The declared type of a field.
///
/// This is a closed set: anything the mapper does not recognize arrives as
/// [`FieldType::Other`] and is passed through as opaque JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Html,
    Select,
    Url,
    Email,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Number,
    Currency,
    Boolean,
    /// A reference to another object, not cascading on delete.
    Lookup,
    /// A parent/child reference; the parent side gains a synthesized
    /// reverse child-list field.
    MasterDetail,
    /// Any unrecognized type string.
    #[serde(other)]
    Other,
}

/// The target(s) of a relationship field.
///
/// Authored metadata allows either a single object name or a list of
/// candidates. Multi-target references are not representable as a direct
/// schema relationship and degrade to a passthrough field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceTo {
    One(String),
    Many(Vec<String>),
}

impl ReferenceTo {
    /// Returns the referenced object name if this is a single-target
    /// reference, `None` otherwise.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::One(name) => Some(name),
            Self::Many(_) => None,
        }
    }
}

/// A single field definition on an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The field name as it appears on stored records.
    pub name: String,

    /// The declared type. Missing types are tolerated here and skipped by
    /// the schema mapper.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// For `lookup`/`master_detail` fields, the referenced object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_to: Option<ReferenceTo>,

    /// For `lookup` fields, whether the stored value is a list of ids.
    #[serde(default)]
    pub multiple: bool,
}

impl FieldDefinition {
    /// Creates a field with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type),
            reference_to: None,
            multiple: false,
        }
    }

    /// Creates a field with no declared type.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            reference_to: None,
            multiple: false,
        }
    }

    /// Creates a `lookup` field referencing another object.
    #[must_use]
    pub fn lookup(name: impl Into<String>, reference_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(FieldType::Lookup),
            reference_to: Some(ReferenceTo::One(reference_to.into())),
            multiple: false,
        }
    }

    /// Creates a `master_detail` field referencing the parent object.
    #[must_use]
    pub fn master_detail(name: impl Into<String>, reference_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(FieldType::MasterDetail),
            reference_to: Some(ReferenceTo::One(reference_to.into())),
            multiple: false,
        }
    }

    /// Marks the field as holding multiple reference ids.
    #[must_use]
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}

/// Metadata for one object (entity).
///
/// Identity is `name`, unique across all data sources once normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// The object name. May contain dots.
    #[serde(default)]
    pub name: String,

    /// Declared fields, keyed by field name. Order is preserved so the
    /// generated schema lists fields as authored.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDefinition>,

    /// Attach the well-known file sub-resource to this object.
    #[serde(default)]
    pub enable_files: bool,

    /// Attach the well-known task sub-resource to this object.
    #[serde(default)]
    pub enable_tasks: bool,

    /// Attach the well-known event sub-resource to this object.
    #[serde(default)]
    pub enable_events: bool,

    /// Attach the well-known audit-trail sub-resource to this object.
    #[serde(default)]
    pub enable_audit: bool,
}

impl ObjectMetadata {
    /// Creates object metadata with the given name and no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a field, keyed by its name. A later field with the same name
    /// replaces the earlier one.
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Enables the file sub-resource.
    #[must_use]
    pub fn with_files(mut self, enabled: bool) -> Self {
        self.enable_files = enabled;
        self
    }

    /// Enables the task sub-resource.
    #[must_use]
    pub fn with_tasks(mut self, enabled: bool) -> Self {
        self.enable_tasks = enabled;
        self
    }

    /// Enables the event sub-resource.
    #[must_use]
    pub fn with_events(mut self, enabled: bool) -> Self {
        self.enable_events = enabled;
        self
    }

    /// Enables the audit-trail sub-resource.
    #[must_use]
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.enable_audit = enabled;
        self
    }
}

/// A named grouping of object definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSource {
    /// The data source name.
    pub name: String,

    /// Objects owned by this data source, keyed by object name.
    #[serde(default)]
    pub objects: IndexMap<String, ObjectMetadata>,
}

impl DataSource {
    /// Creates an empty data source.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: IndexMap::new(),
        }
    }

    /// Adds an object, keyed by its name.
    pub fn add_object(&mut self, object: ObjectMetadata) {
        self.objects.insert(object.name.clone(), object);
    }

    /// Returns the objects owned by this data source.
    #[must_use]
    pub fn objects(&self) -> &IndexMap<String, ObjectMetadata> {
        &self.objects
    }
}
