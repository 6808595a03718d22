//! Storage trait for records

use crate::core::Data;
use crate::core::query::Filter;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for storing records of one type
///
/// Implementations provide CRUD operations for a specific record type.
/// The rest of the crate is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Data>: Send + Sync {
    /// Insert a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all records, newest `createdAt` first
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record; errors when the id is unknown
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete a record; unknown ids are a no-op
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Records whose `field` equals `value`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        self.find(&Filter::new().eq(field, crate::core::FieldValue::from_text(value)))
            .await
    }

    /// Records matching every clause of `filter`, newest `createdAt` first
    async fn find(&self, filter: &Filter) -> Result<Vec<T>>;
}
