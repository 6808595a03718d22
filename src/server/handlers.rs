//! HTTP handlers and the route descriptors that mount them
//!
//! Responses are envelopes keyed by resource name, the shape the dashboard
//! client destructures:
//!
//! - list: `{ "shops": [...], "pagination": {...} }`
//! - single: `{ "shop": {...} }`
//! - create/update: `{ "shop": {...}, "message": "shop created" }`
//! - delete: `{ "message": "shop deleted" }`

use super::entity_registry::EntityDescriptor;
use crate::core::error::ApiError;
use crate::core::extractors::{Input, QueryArgs, RecordId};
use crate::core::query::QueryParams;
use crate::core::{Data, Entity};
use crate::entities::Payment;
use crate::services::{PaymentQuery, PaymentService, RecordService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Build a JSON object from key/value pairs
fn envelope<const N: usize>(pairs: [(&str, Value); N]) -> Json<Value> {
    let object: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Json(Value::Object(object))
}

fn message<T: Entity>(verb: &str) -> Value {
    Value::String(format!("{} {}", T::resource_name_singular(), verb))
}

pub async fn list_records<T: Data>(
    State(service): State<RecordService<T>>,
    QueryArgs(params): QueryArgs<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let (records, pagination) = service.list(&params).await?;
    let pagination = serde_json::to_value(pagination)
        .map_err(|e| ApiError::Internal(format!("failed to serialize pagination: {}", e)))?;

    Ok(envelope([
        (T::resource_name(), Value::Array(records)),
        ("pagination", pagination),
    ]))
}

pub async fn create_record<T: Data>(
    State(service): State<RecordService<T>>,
    Input(input): Input,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        envelope([
            (T::resource_name_singular(), created),
            ("message", message::<T>("created")),
        ]),
    ))
}

pub async fn get_record<T: Data>(
    State(service): State<RecordService<T>>,
    RecordId(id): RecordId,
) -> Result<Json<Value>, ApiError> {
    let record = service.get_single(&id).await?;
    Ok(envelope([(T::resource_name_singular(), record)]))
}

pub async fn update_record<T: Data>(
    State(service): State<RecordService<T>>,
    RecordId(id): RecordId,
    Input(input): Input,
) -> Result<Json<Value>, ApiError> {
    let updated = service.update(&id, input).await?;

    Ok(envelope([
        (T::resource_name_singular(), updated),
        ("message", message::<T>("updated")),
    ]))
}

pub async fn delete_record<T: Data>(
    State(service): State<RecordService<T>>,
    RecordId(id): RecordId,
) -> Result<Json<Value>, ApiError> {
    service.delete(&id).await?;
    Ok(envelope([("message", message::<T>("deleted"))]))
}

pub async fn query_payments(
    State(service): State<PaymentService>,
    QueryArgs(query): QueryArgs<PaymentQuery>,
) -> Result<Json<Value>, ApiError> {
    let payments = service.query_payments(&query).await?;
    Ok(envelope([(Payment::resource_name(), Value::Array(payments))]))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateQuery {
    pub date: Option<String>,
}

pub async fn payments_for_date(
    State(service): State<PaymentService>,
    QueryArgs(query): QueryArgs<DateQuery>,
) -> Result<Json<Value>, ApiError> {
    let payments = service.payments_for_date(query.date.as_deref()).await?;
    Ok(envelope([(Payment::resource_name(), Value::Array(payments))]))
}

/// CRUD routes for one record type
///
/// - `GET /{plural}` and `POST /{plural}`
/// - `GET`, `PATCH` and `DELETE /{plural}/{id}`
pub struct RecordDescriptor<T: Data> {
    service: RecordService<T>,
}

impl<T: Data> RecordDescriptor<T> {
    pub fn new(service: RecordService<T>) -> Self {
        Self { service }
    }
}

impl<T: Data> EntityDescriptor for RecordDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        let collection = format!("/{}", T::resource_name());
        let item = format!("/{}/{{id}}", T::resource_name());

        Router::new()
            .route(&collection, get(list_records::<T>).post(create_record::<T>))
            .route(
                &item,
                get(get_record::<T>)
                    .patch(update_record::<T>)
                    .delete(delete_record::<T>),
            )
            .with_state(self.service.clone())
    }
}

/// Payment CRUD plus `/payments/all` and `/payments/date`
pub struct PaymentDescriptor {
    service: PaymentService,
}

impl PaymentDescriptor {
    pub fn new(service: PaymentService) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for PaymentDescriptor {
    fn entity_type(&self) -> &str {
        Payment::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Payment::resource_name()
    }

    fn build_routes(&self) -> Router {
        let queries = Router::new()
            .route("/payments/all", get(query_payments))
            .route("/payments/date", get(payments_for_date))
            .with_state(self.service.clone());

        RecordDescriptor::new(self.service.records().clone())
            .build_routes()
            .merge(queries)
    }
}
