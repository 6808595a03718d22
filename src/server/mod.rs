//! HTTP server: route descriptors, REST exposure and the builder that serves them

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod handlers;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use handlers::{PaymentDescriptor, RecordDescriptor};
pub use host::ServerHost;
