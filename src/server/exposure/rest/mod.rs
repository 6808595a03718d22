//! REST exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with health checks,
//! every registered record route and any custom routes.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let app = Self::health_routes().merge(host.entity_registry.build_routes());

        custom_routes
            .into_iter()
            .fold(app, |app, custom| app.merge(custom))
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "paytrack"
        }))
    }
}
