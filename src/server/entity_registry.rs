//! Entity registry collecting per-record route descriptors

use axum::Router;
use std::collections::BTreeMap;

/// Describes how to build the routes for one record type
pub trait EntityDescriptor: Send + Sync {
    /// The singular name (e.g., "shop")
    fn entity_type(&self) -> &str;

    /// The plural form used as the path prefix (e.g., "shops")
    fn plural(&self) -> &str;

    /// Build the routes for this record type, with state already applied
    fn build_routes(&self) -> Router;
}

/// Registry for all record types served by the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; a second one for the same type replaces the first
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge every registered descriptor's routes into one router
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered singular names, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    /// Path prefixes of the registered types, sorted by singular name
    pub fn plurals(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }
}
