//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryDataService;
#[cfg(feature = "mongodb_backend")]
pub use self::mongodb::MongoDataService;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::DataService;
use crate::core::error::StorageError;
use crate::entities::{Area, Collector, Company, Payment, Shop, User};
use std::sync::Arc;

/// One store handle per record type, all on the same backend
#[derive(Clone)]
pub struct Stores {
    pub areas: Arc<dyn DataService<Area>>,
    pub companies: Arc<dyn DataService<Company>>,
    pub collectors: Arc<dyn DataService<Collector>>,
    pub shops: Arc<dyn DataService<Shop>>,
    pub users: Arc<dyn DataService<User>>,
    pub payments: Arc<dyn DataService<Payment>>,
}

impl Stores {
    /// Fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self {
            areas: Arc::new(InMemoryDataService::new()),
            companies: Arc::new(InMemoryDataService::new()),
            collectors: Arc::new(InMemoryDataService::new()),
            shops: Arc::new(InMemoryDataService::new()),
            users: Arc::new(InMemoryDataService::new()),
            payments: Arc::new(InMemoryDataService::new()),
        }
    }

    /// Stores backed by collections of `database`, with indexes ensured
    #[cfg(feature = "mongodb_backend")]
    pub async fn mongodb(database: ::mongodb::Database) -> Result<Self, StorageError> {
        async fn open<T: crate::core::Data>(
            database: &::mongodb::Database,
        ) -> Result<Arc<dyn DataService<T>>, StorageError> {
            let store = MongoDataService::<T>::new(database.clone());
            store
                .ensure_indexes()
                .await
                .map_err(|e| StorageError::ConnectionError {
                    backend: "mongodb".into(),
                    message: format!("{:#}", e),
                })?;
            Ok(Arc::new(store))
        }

        Ok(Self {
            areas: open(&database).await?,
            companies: open(&database).await?,
            collectors: open(&database).await?,
            shops: open(&database).await?,
            users: open(&database).await?,
            payments: open(&database).await?,
        })
    }

    /// Open the backend selected by `config`
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::info!("using in-memory storage");
                Ok(Self::in_memory())
            }
            #[cfg(feature = "mongodb_backend")]
            StorageBackend::Mongodb => {
                let uri = config
                    .uri
                    .as_deref()
                    .ok_or_else(|| StorageError::ConnectionError {
                        backend: "mongodb".into(),
                        message: "no connection URI configured".into(),
                    })?;
                let client = ::mongodb::Client::with_uri_str(uri).await.map_err(|e| {
                    StorageError::ConnectionError {
                        backend: "mongodb".into(),
                        message: e.to_string(),
                    }
                })?;
                tracing::info!(database = %config.database, "using MongoDB storage");
                Self::mongodb(client.database(&config.database)).await
            }
            #[cfg(not(feature = "mongodb_backend"))]
            StorageBackend::Mongodb => Err(StorageError::Unavailable {
                backend: "mongodb".into(),
            }),
        }
    }
}
