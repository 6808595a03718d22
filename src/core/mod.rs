//! Core traits and types shared by every record type

pub mod entity;
pub mod error;
pub mod extractors;
pub mod field;
pub mod query;
pub mod record;
pub mod service;
pub mod timestamp;

pub use entity::{Data, Entity};
pub use error::{ApiError, ConfigError, EntityError, StorageError, ValidationError};
pub use extractors::{Input, QueryArgs, RecordId};
pub use field::{FieldFormat, FieldValue, ToFieldValue};
pub use query::{Condition, Filter, PaginationMeta, QueryParams, SortOrder, SortSpec};
pub use service::DataService;
