//! HTTP-level test infrastructure for storage backends
//!
//! Builds the production router over a caller-supplied `Stores` so that every
//! request goes through the real stack:
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by build_test_router)
//!         ├─ /health
//!         ├─ /{plural} and /{plural}/{id}   → RecordDescriptor
//!         └─ /payments/all, /payments/date  → PaymentDescriptor
//! ```

#[macro_use]
pub mod rest_tests;

use axum::Router;
use axum_test::TestServer;
use paytrack::server::{ServerBuilder, ServerHost};
use paytrack::storage::Stores;
use serde_json::{Value, json};

/// Build the application router over `stores`
pub fn build_test_router(stores: Stores) -> Router {
    ServerBuilder::new()
        .with_host(ServerHost::from_stores(stores))
        .build()
        .unwrap()
}

/// POST `{ "input": body }` to `/{plural}` and return the created record
pub async fn create_via_api(server: &TestServer, plural: &str, singular: &str, body: Value) -> Value {
    let response = server
        .post(&format!("/{}", plural))
        .json(&json!({ "input": body }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let created: Value = response.json();
    created[singular].clone()
}

/// `_id` of a record returned by the API
pub fn id_of(record: &Value) -> String {
    record["_id"].as_str().unwrap().to_string()
}
