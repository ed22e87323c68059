//! In-memory record store backend.
//!
//! Keeps records in a `RwLock`-guarded map keyed `object/id`. The filter
//! language understood here is the structured subset that generated
//! resolvers emit: `[field, op, value]` triplets, arrays of triplets with
//! `"or"`/`"and"` string connectives (implicit `and`), and dotted field
//! paths where equality against an array means containment.
//!
//! The access context is accepted and ignored; this backend performs no
//! authorization.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::RecordStore;
use crate::types::{FindOptions, StoredRecord, UserSession};

type StorageKey = String; // Format: "object/id"

fn make_key(object: &str, id: &str) -> StorageKey {
    format!("{object}/{id}")
}

/// In-memory [`RecordStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<StorageKey, StoredRecord>>,
    version_counter: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_version(&self) -> String {
        self.version_counter
            .fetch_add(1, AtomicOrdering::SeqCst)
            .to_string()
    }

    /// Returns the number of records held for an object.
    pub async fn count(&self, object: &str) -> usize {
        let prefix = format!("{object}/");
        let guard = self.records.read().await;
        guard.keys().filter(|k| k.starts_with(&prefix)).count()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find(
        &self,
        object: &str,
        options: &FindOptions,
        _session: Option<&UserSession>,
    ) -> Result<Vec<Value>, StoreError> {
        let prefix = format!("{object}/");
        let guard = self.records.read().await;

        let mut matched: Vec<&StoredRecord> = guard
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v)
            .filter(|stored| match &options.filters {
                Some(filters) => matches_filter(&stored.record, filters),
                None => true,
            })
            .collect();

        match &options.sort {
            Some(sort) => {
                let keys = parse_sort(sort);
                matched.sort_by(|a, b| compare_records(&a.record, &b.record, &keys));
            }
            // Without a sort expression, fall back to insertion order so
            // results are deterministic across calls.
            None => matched.sort_by_key(|stored| {
                stored.version_id.parse::<u64>().unwrap_or(u64::MAX)
            }),
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let top = options.top.map_or(usize::MAX, |t| t as usize);

        trace!(object = %object, matched = matched.len(), "memory find");

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(top)
            .map(|stored| project(&stored.record, options.fields.as_deref()))
            .collect())
    }

    async fn find_one(
        &self,
        object: &str,
        id: &str,
        options: &FindOptions,
        _session: Option<&UserSession>,
    ) -> Result<Option<Value>, StoreError> {
        let guard = self.records.read().await;
        Ok(guard
            .get(&make_key(object, id))
            .map(|stored| project(&stored.record, options.fields.as_deref())))
    }

    async fn insert(
        &self,
        object: &str,
        record: Value,
        _session: Option<&UserSession>,
    ) -> Result<Value, StoreError> {
        let mut record = record;
        let Value::Object(map) = &mut record else {
            return Err(StoreError::invalid_record("record must be a JSON object"));
        };

        let id = match map.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                map.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let key = make_key(object, &id);
        let mut guard = self.records.write().await;
        if guard.contains_key(&key) {
            return Err(StoreError::already_exists(object, id));
        }
        let stored = StoredRecord::new(&id, self.next_version(), object, record.clone());
        guard.insert(key, stored);
        Ok(record)
    }

    async fn update(
        &self,
        object: &str,
        id: &str,
        changes: Value,
        _session: Option<&UserSession>,
    ) -> Result<Value, StoreError> {
        let Value::Object(changes) = changes else {
            return Err(StoreError::invalid_record("changes must be a JSON object"));
        };

        let key = make_key(object, id);
        let mut guard = self.records.write().await;
        let stored = guard
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found(object, id))?;

        let mut record = stored.record.clone();
        if let Value::Object(map) = &mut record {
            for (k, v) in changes {
                map.insert(k, v);
            }
            // The id is the storage key; changes may not move the record.
            map.insert("_id".to_string(), Value::String(id.to_string()));
        }
        *stored = stored.new_version(self.next_version(), record.clone());
        Ok(record)
    }

    async fn delete(
        &self,
        object: &str,
        id: &str,
        _session: Option<&UserSession>,
    ) -> Result<Option<Value>, StoreError> {
        let mut guard = self.records.write().await;
        Ok(guard
            .remove(&make_key(object, id))
            .map(|stored| stored.record))
    }
}

/// Evaluates a structured filter against a record.
fn matches_filter(record: &Value, filter: &Value) -> bool {
    if let Some((field, op, expected)) = as_triplet(filter) {
        return eval_triplet(record, field, op, expected);
    }

    match filter {
        // A sequence of sub-filters joined by string connectives; `and`
        // binds by default.
        Value::Array(items) => {
            let mut result: Option<bool> = None;
            let mut pending_or = false;
            for item in items {
                if let Some(conn) = item.as_str() {
                    match conn {
                        "or" => pending_or = true,
                        "and" => pending_or = false,
                        _ => return false,
                    }
                    continue;
                }
                let value = matches_filter(record, item);
                result = Some(match result {
                    None => value,
                    Some(prev) if pending_or => prev || value,
                    Some(prev) => prev && value,
                });
                pending_or = false;
            }
            result.unwrap_or(true)
        }
        // Anything unrecognized matches nothing rather than everything.
        _ => false,
    }
}

fn as_triplet(filter: &Value) -> Option<(&str, &str, &Value)> {
    let items = filter.as_array()?;
    if items.len() != 3 {
        return None;
    }
    let field = items[0].as_str()?;
    let op = items[1].as_str()?;
    matches!(op, "=" | "!=").then_some((field, op, &items[2]))
}

fn eval_triplet(record: &Value, field: &str, op: &str, expected: &Value) -> bool {
    let actual = lookup_path(record, field);
    let equal = match actual {
        // Equality against an array field means containment, which is how
        // polymorphic `<field>.ids` owner lists are matched.
        Some(Value::Array(items)) => items.contains(expected),
        Some(value) => value == expected,
        None => expected.is_null(),
    };
    match op {
        "=" => equal,
        "!=" => !equal,
        _ => false,
    }
}

/// Navigates a dotted field path through nested objects.
fn lookup_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn parse_sort(sort: &str) -> Vec<(String, bool)> {
    sort.split(',')
        .filter_map(|part| {
            let mut words = part.split_whitespace();
            let field = words.next()?;
            let descending = matches!(words.next(), Some(dir) if dir.eq_ignore_ascii_case("desc"));
            Some((field.to_string(), descending))
        })
        .collect()
}

fn compare_records(a: &Value, b: &Value, keys: &[(String, bool)]) -> Ordering {
    for (field, descending) in keys {
        let ordering = compare_values(lookup_path(a, field), lookup_path(b, field));
        let ordering = if *descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Applies a field projection, always retaining the identifier.
fn project(record: &Value, fields: Option<&[String]>) -> Value {
    let Some(fields) = fields else {
        return record.clone();
    };
    let Value::Object(map) = record else {
        return record.clone();
    };
    let mut out = serde_json::Map::new();
    if let Some(id) = map.get("_id") {
        out.insert("_id".to_string(), id.clone());
    }
    for field in fields {
        if let Some(value) = map.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = MemoryStore::new();
        let record = store
            .insert("projects", json!({"name": "Apollo"}), None)
            .await
            .unwrap();

        let id = record["_id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let found = store
            .find_one("projects", &id, &FindOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(found.unwrap()["name"], "Apollo");
    }

    #[tokio::test]
    async fn test_insert_keeps_existing_id() {
        let store = MemoryStore::new();
        let record = store
            .insert("projects", json!({"_id": "p1", "name": "Apollo"}), None)
            .await
            .unwrap();
        assert_eq!(record["_id"], "p1");

        let err = store
            .insert("projects", json!({"_id": "p1"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let store = MemoryStore::new();
        let err = store
            .insert("projects", json!("not a record"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_changes() {
        let store = MemoryStore::new();
        store
            .insert("projects", json!({"_id": "p1", "name": "Apollo", "budget": 10}), None)
            .await
            .unwrap();

        let updated = store
            .update("projects", "p1", json!({"budget": 20}), None)
            .await
            .unwrap();
        assert_eq!(updated["name"], "Apollo");
        assert_eq!(updated["budget"], 20);

        let err = store
            .update("projects", "missing", json!({}), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_returns_record() {
        let store = MemoryStore::new();
        store
            .insert("projects", json!({"_id": "p1", "name": "Apollo"}), None)
            .await
            .unwrap();

        let deleted = store.delete("projects", "p1", None).await.unwrap();
        assert_eq!(deleted.unwrap()["name"], "Apollo");

        // Deleting again is a null result, not an error.
        let deleted = store.delete("projects", "p1", None).await.unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn test_find_with_or_filter() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store
                .insert("items", json!({"_id": id}), None)
                .await
                .unwrap();
        }

        let options = FindOptions::new().with_filters(json!([
            ["_id", "=", "a"],
            "or",
            ["_id", "=", "c"]
        ]));
        let found = store.find("items", &options, None).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_find_with_polymorphic_filter() {
        let store = MemoryStore::new();
        store
            .insert(
                "cms_files",
                json!({"_id": "f1", "parent": {"o": "spaces", "ids": ["s1", "s2"]}}),
                None,
            )
            .await
            .unwrap();
        store
            .insert(
                "cms_files",
                json!({"_id": "f2", "parent": {"o": "projects", "ids": ["p1"]}}),
                None,
            )
            .await
            .unwrap();

        let options = FindOptions::new().with_filters(json!([
            ["parent.o", "=", "spaces"],
            ["parent.ids", "=", "s1"]
        ]));
        let found = store.find("cms_files", &options, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_id"], "f1");
    }

    #[tokio::test]
    async fn test_find_sort_top_skip() {
        let store = MemoryStore::new();
        for (id, rank) in [("a", 3), ("b", 1), ("c", 2)] {
            store
                .insert("items", json!({"_id": id, "rank": rank}), None)
                .await
                .unwrap();
        }

        let options = FindOptions::new().with_sort("rank desc").with_top(2);
        let found = store.find("items", &options, None).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|r| r["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let options = FindOptions::new().with_sort("rank").with_skip(1);
        let found = store.find("items", &options, None).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|r| r["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_find_projection() {
        let store = MemoryStore::new();
        store
            .insert(
                "items",
                json!({"_id": "a", "name": "widget", "secret": "x"}),
                None,
            )
            .await
            .unwrap();

        let options = FindOptions::new().with_fields(vec!["name".into()]);
        let found = store.find("items", &options, None).await.unwrap();
        assert_eq!(found[0]["name"], "widget");
        assert_eq!(found[0]["_id"], "a");
        assert!(found[0].get("secret").is_none());
    }

    #[test]
    fn test_filter_connective_parsing() {
        let record = json!({"a": 1, "b": 2});

        assert!(matches_filter(&record, &json!(["a", "=", 1])));
        assert!(!matches_filter(&record, &json!(["a", "=", 2])));
        assert!(matches_filter(&record, &json!(["a", "!=", 2])));

        // Implicit and.
        assert!(matches_filter(
            &record,
            &json!([["a", "=", 1], ["b", "=", 2]])
        ));
        assert!(!matches_filter(
            &record,
            &json!([["a", "=", 1], ["b", "=", 3]])
        ));

        // Explicit or.
        assert!(matches_filter(
            &record,
            &json!([["a", "=", 9], "or", ["b", "=", 2]])
        ));
    }
}
