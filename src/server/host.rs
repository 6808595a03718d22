//! Server host: every service of the application, built from one set of stores

use crate::entities::Payment;
use crate::server::entity_registry::EntityRegistry;
use crate::server::handlers::{PaymentDescriptor, RecordDescriptor};
use crate::services::{
    AreaService, CollectorService, CompanyService, PaymentPopulator, PaymentService,
    RecordService, ShopPopulator, ShopService, UserService,
};
use crate::storage::Stores;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_stores(Stores::in_memory());
/// let app = RestExposure::build_router(Arc::new(host), vec![]);
/// ```
pub struct ServerHost {
    pub areas: AreaService,
    pub companies: CompanyService,
    pub collectors: CollectorService,
    pub shops: ShopService,
    pub users: UserService,
    pub payments: PaymentService,

    /// Route descriptors for every record type
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Wire services and populators over `stores`
    pub fn from_stores(stores: Stores) -> Self {
        let areas = RecordService::unpopulated(Arc::clone(&stores.areas));
        let companies = RecordService::unpopulated(Arc::clone(&stores.companies));
        let collectors = RecordService::unpopulated(Arc::clone(&stores.collectors));
        let users = RecordService::unpopulated(Arc::clone(&stores.users));

        let shops = RecordService::new(
            Arc::clone(&stores.shops),
            Arc::new(ShopPopulator::new(
                Arc::clone(&stores.areas),
                Arc::clone(&stores.payments),
            )),
        );
        let payments = PaymentService::new(RecordService::<Payment>::new(
            Arc::clone(&stores.payments),
            Arc::new(PaymentPopulator::new(
                Arc::clone(&stores.shops),
                Arc::clone(&stores.areas),
                Arc::clone(&stores.companies),
                Arc::clone(&stores.collectors),
            )),
        ));

        let mut entity_registry = EntityRegistry::new();
        entity_registry.register(Box::new(RecordDescriptor::new(areas.clone())));
        entity_registry.register(Box::new(RecordDescriptor::new(companies.clone())));
        entity_registry.register(Box::new(RecordDescriptor::new(collectors.clone())));
        entity_registry.register(Box::new(RecordDescriptor::new(shops.clone())));
        entity_registry.register(Box::new(RecordDescriptor::new(users.clone())));
        entity_registry.register(Box::new(PaymentDescriptor::new(payments.clone())));

        Self {
            areas,
            companies,
            collectors,
            shops,
            users,
            payments,
            entity_registry,
        }
    }
}
