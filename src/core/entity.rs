//! Entity traits defining the core abstraction for all record types

use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for every stored record.
///
/// All records have:
/// - id: Unique identifier, serialized as `_id`
/// - createdAt: Creation timestamp
/// - updatedAt: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and collections (e.g., "shops")
    fn resource_name() -> &'static str;

    /// The singular resource name used in response envelopes (e.g., "shop")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Refresh `updatedAt`
    fn touch(&mut self);
}

/// Trait for records that travel as JSON documents.
///
/// Data records extend the base Entity with:
/// - display_name: A human-readable label used in logs
/// - indexed_fields: Fields the storage layer should index
/// - field_value: Dynamic field access for filters and sorts
/// - validate: Field-level rules checked before every write
pub trait Data: Entity + Serialize + DeserializeOwned {
    /// Human-readable label for this record
    fn display_name(&self) -> &str;

    /// Fields that should be indexed for lookups
    fn indexed_fields() -> &'static [&'static str];

    /// Get the value of a field by its JSON name
    ///
    /// Returns `None` when the record has no such field.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Check the record's field rules
    fn validate(&self) -> Result<(), ValidationError>;
}
