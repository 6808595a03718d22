//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! Each `MongoDataService<T>` operates on a collection named after
//! `T::resource_name()` (e.g., "shops", "payments").
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. Records already serialize their id as
//! `_id`, so no key renaming is needed. UUIDs and timestamps are stored as
//! strings; timestamps are fixed-width, so string comparison in a query
//! orders them chronologically.

use crate::core::query::{Condition, Filter};
use crate::core::{Data, DataService, FieldValue, timestamp};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Database, IndexModel};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn json_to_document(json: serde_json::Value) -> Result<Document> {
    match mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?
    {
        Bson::Document(doc) => Ok(doc),
        _ => Err(anyhow!("Expected BSON document, got non-object")),
    }
}

fn document_to_json(doc: Document) -> serde_json::Value {
    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Render a filter operand the way records store it
fn field_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::String(s) => Bson::String(s.clone()),
        FieldValue::Integer(i) => Bson::Int64(*i),
        FieldValue::Float(f) => Bson::Double(*f),
        FieldValue::Boolean(b) => Bson::Boolean(*b),
        FieldValue::Uuid(id) => uuid_bson(id),
        FieldValue::DateTime(dt) => Bson::String(timestamp::format(dt)),
        FieldValue::Null => Bson::Null,
    }
}

/// Translate a [`Filter`] into a MongoDB query document
///
/// Several conditions on the same field merge into one operator document,
/// e.g. `{"paymentDate": {"$gte": .., "$lt": ..}}`.
pub fn filter_to_document(filter: &Filter) -> Document {
    let mut query = Document::new();
    for (field, condition) in filter.clauses() {
        let operator = match condition {
            Condition::Eq(_) => "$eq",
            Condition::Ne(_) => "$ne",
            Condition::Gt(_) => "$gt",
            Condition::Gte(_) => "$gte",
            Condition::Lt(_) => "$lt",
            Condition::Lte(_) => "$lte",
        };
        let operand = field_bson(condition.value());

        match query.get_document_mut(field) {
            Ok(ops) => {
                ops.insert(operator, operand);
            }
            Err(_) => {
                query.insert(field.clone(), doc! { operator: operand });
            }
        }
    }
    query
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Record store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use paytrack::storage::MongoDataService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let payments = MongoDataService::<Payment>::new(client.database("paytrack"));
/// payments.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Data> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    /// Create an ascending index on each of `T::indexed_fields()`
    ///
    /// Idempotent; safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes: Vec<IndexModel> = T::indexed_fields()
            .iter()
            .map(|field| IndexModel::builder().keys(doc! { *field: 1 }).build())
            .collect();
        if indexes.is_empty() {
            return Ok(());
        }

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to create indexes on {} collection: {}",
                    T::resource_name(),
                    e
                )
            })?;

        tracing::debug!(collection = T::resource_name(), "indexes ensured");
        Ok(())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize {}: {}", T::resource_name_singular(), e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        serde_json::from_value(document_to_json(doc)).map_err(|e| {
            anyhow!(
                "Failed to deserialize {} from document: {}",
                T::resource_name_singular(),
                e
            )
        })
    }

    async fn query(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| anyhow!("Failed to query {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }

    async fn read_back(&self, id: &Uuid) -> Result<T> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to read back {}: {}", T::resource_name_singular(), e))?
            .ok_or_else(|| anyhow!("{} {} vanished after write", T::resource_name_singular(), id))?;

        Self::document_to_entity(doc)
    }
}

#[async_trait]
impl<T: Data> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;

        self.read_back(&entity.id()).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(Self::document_to_entity).transpose()
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.query(doc! {}).await
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::resource_name_singular(), e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("{} not found: {}", T::resource_name_singular(), id));
        }

        self.read_back(id).await
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::resource_name_singular(), e))?;

        Ok(())
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        self.query(filter_to_document(filter)).await
    }
}
