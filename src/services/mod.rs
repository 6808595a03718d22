//! Record services: CRUD delegation plus population of references
//!
//! A [`RecordService`] wraps one store and turns storage results into the
//! populated JSON views handlers return. What "populated" means for a
//! record type is decided by its [`Populate`] implementation.

mod payment;
mod shop;

pub use payment::{PaymentPopulator, PaymentQuery, PaymentService};
pub use shop::ShopPopulator;

use crate::core::error::{ApiError, EntityError, StorageError};
use crate::core::query::{PaginationMeta, QueryParams};
use crate::core::record::{apply_patch, build_record};
use crate::core::{Data, DataService, Filter};
use crate::entities::{Area, Collector, Company, Shop, User};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Turns stored records into their client-facing JSON view
#[async_trait]
pub trait Populate<T: Data>: Send + Sync {
    /// Populate a batch; output order follows input order
    async fn populate(&self, records: Vec<T>) -> Result<Vec<Value>, ApiError>;
}

/// Population for record types without references
pub struct NoPopulate;

#[async_trait]
impl<T: Data> Populate<T> for NoPopulate {
    async fn populate(&self, records: Vec<T>) -> Result<Vec<Value>, ApiError> {
        records.iter().map(to_json).collect()
    }
}

pub(crate) fn to_json<T: Data>(record: &T) -> Result<Value, ApiError> {
    serde_json::to_value(record).map_err(|e| {
        ApiError::Internal(format!(
            "failed to serialize {}: {}",
            T::resource_name_singular(),
            e
        ))
    })
}

/// Per-batch cache of referenced records
///
/// Ids that resolve to nothing are cached too, as `null`.
pub(crate) struct RefCache<R: Data> {
    store: Arc<dyn DataService<R>>,
    seen: HashMap<Uuid, Option<R>>,
}

impl<R: Data> RefCache<R> {
    pub(crate) fn new(store: Arc<dyn DataService<R>>) -> Self {
        Self {
            store,
            seen: HashMap::new(),
        }
    }

    pub(crate) async fn resolve(&mut self, id: &Uuid) -> Result<Option<R>, ApiError> {
        if let Some(hit) = self.seen.get(id) {
            return Ok(hit.clone());
        }
        let found = self.store.get(id).await.map_err(StorageError::query)?;
        if found.is_none() {
            tracing::debug!(
                entity = R::resource_name_singular(),
                id = %id,
                "dangling reference populated as null"
            );
        }
        self.seen.insert(*id, found.clone());
        Ok(found)
    }

    pub(crate) async fn resolve_json(&mut self, id: &Uuid) -> Result<Value, ApiError> {
        match self.resolve(id).await? {
            Some(record) => to_json(&record),
            None => Ok(Value::Null),
        }
    }
}

/// CRUD service for one record type
pub struct RecordService<T: Data> {
    store: Arc<dyn DataService<T>>,
    populator: Arc<dyn Populate<T>>,
}

impl<T: Data> Clone for RecordService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            populator: Arc::clone(&self.populator),
        }
    }
}

pub type AreaService = RecordService<Area>;
pub type CompanyService = RecordService<Company>;
pub type CollectorService = RecordService<Collector>;
pub type ShopService = RecordService<Shop>;
pub type UserService = RecordService<User>;

impl<T: Data> RecordService<T> {
    pub fn new(store: Arc<dyn DataService<T>>, populator: Arc<dyn Populate<T>>) -> Self {
        Self { store, populator }
    }

    /// Service whose populated view is the record itself
    pub fn unpopulated(store: Arc<dyn DataService<T>>) -> Self {
        Self::new(store, Arc::new(NoPopulate))
    }

    pub fn store(&self) -> &Arc<dyn DataService<T>> {
        &self.store
    }

    /// Fetch a stored record or fail with not-found
    pub async fn get(&self, id: &Uuid) -> Result<T, ApiError> {
        self.store
            .get(id)
            .await
            .map_err(StorageError::query)?
            .ok_or_else(|| EntityError::not_found::<T>(*id).into())
    }

    /// Fetch one record, populated
    pub async fn get_single(&self, id: &Uuid) -> Result<Value, ApiError> {
        let record = self.get(id).await?;
        self.populate_one(record).await
    }

    /// Build, validate and store a record from a create payload
    pub async fn create(&self, input: Value) -> Result<Value, ApiError> {
        let record: T = build_record(input)?;
        let created = self.store.create(record).await.map_err(StorageError::query)?;

        tracing::info!(
            entity = T::resource_name_singular(),
            id = %created.id(),
            name = created.display_name(),
            "created"
        );
        self.populate_one(created).await
    }

    /// Stored records matching `filter`, newest first
    pub async fn query(&self, filter: &Filter) -> Result<Vec<T>, ApiError> {
        let records = self.store.find(filter).await.map_err(StorageError::query)?;
        tracing::debug!(
            entity = T::resource_name(),
            clauses = filter.clauses().len(),
            matched = records.len(),
            "query"
        );
        Ok(records)
    }

    /// Filtered, sorted, paginated and populated listing
    pub async fn list(&self, params: &QueryParams) -> Result<(Vec<Value>, PaginationMeta), ApiError> {
        let filter = params.filter()?;
        let sort = params.sort()?;
        let mut records = self.query(&filter).await?;
        if let Some(sort) = sort {
            sort.apply(&mut records);
        }
        let (page, meta) = params.paginate(records);
        Ok((self.populate_many(page).await?, meta))
    }

    /// Merge `input` over the stored record and save it; returns the new version
    pub async fn update(&self, id: &Uuid, input: Value) -> Result<Value, ApiError> {
        let existing = self.get(id).await?;
        let patched = apply_patch(&existing, input)?;
        let updated = self
            .store
            .update(id, patched)
            .await
            .map_err(StorageError::query)?;

        tracing::info!(
            entity = T::resource_name_singular(),
            id = %id,
            "updated"
        );
        self.populate_one(updated).await
    }

    /// Remove a record; returns what was deleted
    pub async fn delete(&self, id: &Uuid) -> Result<T, ApiError> {
        let existing = self.get(id).await?;
        self.store.delete(id).await.map_err(StorageError::query)?;

        tracing::info!(
            entity = T::resource_name_singular(),
            id = %id,
            "deleted"
        );
        Ok(existing)
    }

    pub async fn populate_many(&self, records: Vec<T>) -> Result<Vec<Value>, ApiError> {
        self.populator.populate(records).await
    }

    async fn populate_one(&self, record: T) -> Result<Value, ApiError> {
        self.populate_many(vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::Internal("populate returned no record".into()))
    }
}
