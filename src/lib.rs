//! # paytrack
//!
//! REST backend for a payment-tracking admin dashboard.
//!
//! ## Features
//!
//! - **Record types**: areas, companies, collectors, shops, users and payments
//! - **Generic CRUD**: every record type gets list/create/get/update/delete routes
//! - **Population**: payments embed their shop, company and collector; shops embed
//!   their region and payments
//! - **Payment queries**: date-range and single-day payment listings
//! - **Pluggable storage**: in-memory store, or MongoDB behind `mongodb_backend`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paytrack::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let host = ServerHost::from_stores(Stores::in_memory());
//!     ServerBuilder::new()
//!         .with_host(host)
//!         .serve("127.0.0.1:4000".parse()?)
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod logging;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        ApiError, Data, DataService, Entity, FieldValue, Filter, QueryParams, ValidationError,
    };

    // === Records ===
    pub use crate::entities::{Area, Collector, Company, Payment, Role, Shop, User};

    // === Services ===
    pub use crate::services::{PaymentQuery, PaymentService, RecordService};

    // === Storage ===
    pub use crate::storage::{InMemoryDataService, Stores};
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
