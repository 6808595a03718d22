//! In-memory implementation of DataService for tests and development

use crate::core::query::Filter;
use crate::core::{Data, DataService};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

struct Slot<T> {
    /// Insertion order, breaks `createdAt` ties
    seq: u64,
    record: T,
}

struct Table<T> {
    next_seq: u64,
    rows: HashMap<Uuid, Slot<T>>,
}

/// In-memory record store
///
/// Uses an `RwLock` for thread-safe access. Cloning shares the same table.
pub struct InMemoryDataService<T> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T> Clone for InMemoryDataService<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T> InMemoryDataService<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                next_seq: 0,
                rows: HashMap::new(),
            })),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Data> InMemoryDataService<T> {
    /// Matching records, newest first
    fn collect(&self, filter: &Filter) -> Result<Vec<T>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<&Slot<T>> = table
            .rows
            .values()
            .filter(|slot| filter.matches(&slot.record))
            .collect();
        matching.sort_by_key(|slot| Reverse((slot.record.created_at(), slot.seq)));

        Ok(matching.into_iter().map(|slot| slot.record.clone()).collect())
    }
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = entity.id();
        if table.rows.contains_key(&id) {
            return Err(anyhow!(
                "{} with id '{}' already exists",
                T::resource_name_singular(),
                id
            ));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(
            id,
            Slot {
                seq,
                record: entity.clone(),
            },
        );

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(id).map(|slot| slot.record.clone()))
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.collect(&Filter::new())
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = table
            .rows
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} not found: {}", T::resource_name_singular(), id))?;
        slot.record = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        table.rows.remove(id);

        Ok(())
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        self.collect(filter)
    }
}
