//! The record store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::{FindOptions, UserSession};

/// The contract between generated resolvers and a record backend.
///
/// All record payloads are plain JSON values; the caller's access context
/// is forwarded to every operation uninterpreted. Implementations must be
/// thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use objectgraph_store::{FindOptions, RecordStore, StoreError};
///
/// async fn project_name(store: &dyn RecordStore, id: &str) -> Result<String, StoreError> {
///     let record = store
///         .find_one("projects", id, &FindOptions::new(), None)
///         .await?
///         .ok_or_else(|| StoreError::not_found("projects", id))?;
///     Ok(record["name"].as_str().unwrap_or_default().to_string())
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Finds records of an object matching the given options.
    ///
    /// # Errors
    ///
    /// Returns an error for access denials or backend failures; an empty
    /// result is not an error.
    async fn find(
        &self,
        object: &str,
        options: &FindOptions,
        session: Option<&UserSession>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Fetches a single record by id.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for access denials or backend failures, not
    /// for missing records.
    async fn find_one(
        &self,
        object: &str,
        id: &str,
        options: &FindOptions,
        session: Option<&UserSession>,
    ) -> Result<Option<Value>, StoreError>;

    /// Inserts a new record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the id is taken and
    /// [`StoreError::InvalidRecord`] when the payload is malformed.
    async fn insert(
        &self,
        object: &str,
        record: Value,
        session: Option<&UserSession>,
    ) -> Result<Value, StoreError>;

    /// Updates an existing record and returns the updated content.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record does not exist.
    async fn update(
        &self,
        object: &str,
        id: &str,
        changes: Value,
        session: Option<&UserSession>,
    ) -> Result<Value, StoreError>;

    /// Deletes a record, returning the deleted content or `None` when the
    /// record did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for access denials or backend failures.
    async fn delete(
        &self,
        object: &str,
        id: &str,
        session: Option<&UserSession>,
    ) -> Result<Option<Value>, StoreError>;
}
