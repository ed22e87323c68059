//! Value types for the record store interface.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Arguments for a `find` query.
///
/// All members are optional and passed through from the caller verbatim.
/// `filters` is opaque structured JSON; its interpretation belongs to the
/// backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindOptions {
    /// Fields to return. `None` returns every field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Opaque structured filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,

    /// Maximum number of records to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,

    /// Number of records to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,

    /// Sort expression, e.g. `"name"` or `"created desc, name"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl FindOptions {
    /// Creates empty find options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field projection.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Sets the filter value.
    #[must_use]
    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the maximum result count.
    #[must_use]
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Sets the number of records to skip.
    #[must_use]
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the sort expression.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Returns `true` if no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_none()
            && self.filters.is_none()
            && self.top.is_none()
            && self.skip.is_none()
            && self.sort.is_none()
    }
}

/// Opaque per-request access context.
///
/// Carries whatever the request boundary knows about the caller (identity,
/// roles, tenant). Backends may use it to enforce authorization; the core
/// only forwards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession(Value);

impl UserSession {
    /// Wraps a JSON value as an access context.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the caller's id, if the context carries one under
    /// `user_id` or `_id`.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.0
            .get("user_id")
            .or_else(|| self.0.get("_id"))
            .and_then(Value::as_str)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A record as held by the in-memory backend, with version bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The record id.
    pub id: String,
    /// The version id of this specific version.
    pub version_id: String,
    /// The object this record belongs to.
    pub object: String,
    /// The full record content as JSON.
    pub record: Value,
    /// When this version was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    /// When the record was originally created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl StoredRecord {
    /// Creates a new `StoredRecord`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        version_id: impl Into<String>,
        object: impl Into<String>,
        record: Value,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            version_id: version_id.into(),
            object: object.into(),
            record,
            last_updated: now,
            created_at: now,
        }
    }

    /// Creates a new version of this record with updated content.
    #[must_use]
    pub fn new_version(&self, version_id: impl Into<String>, record: Value) -> Self {
        Self {
            id: self.id.clone(),
            version_id: version_id.into(),
            object: self.object.clone(),
            record,
            last_updated: OffsetDateTime::now_utc(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_options_builder() {
        let options = FindOptions::new()
            .with_fields(vec!["name".into(), "owner".into()])
            .with_filters(json!([["archived", "=", false]]))
            .with_top(10)
            .with_skip(20)
            .with_sort("name desc");

        assert_eq!(options.fields.as_ref().unwrap().len(), 2);
        assert!(options.filters.is_some());
        assert_eq!(options.top, Some(10));
        assert_eq!(options.skip, Some(20));
        assert_eq!(options.sort.as_deref(), Some("name desc"));
        assert!(!options.is_empty());
        assert!(FindOptions::new().is_empty());
    }

    #[test]
    fn test_user_session_id() {
        let session = UserSession::new(json!({"user_id": "u1", "name": "Ada"}));
        assert_eq!(session.user_id(), Some("u1"));

        let session = UserSession::new(json!({"_id": "u2"}));
        assert_eq!(session.user_id(), Some("u2"));

        let session = UserSession::new(json!({"name": "anonymous"}));
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_stored_record_versions() {
        let record = StoredRecord::new("p1", "1", "projects", json!({"_id": "p1"}));
        let updated = record.new_version("2", json!({"_id": "p1", "name": "renamed"}));

        assert_eq!(updated.id, "p1");
        assert_eq!(updated.version_id, "2");
        assert_eq!(updated.created_at, record.created_at);
    }
}
