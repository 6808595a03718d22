//! Axum extractors for record routes
//!
//! Every extractor rejects with [`ApiError`] so malformed requests get the
//! same `{code, message}` body as every other failure.

use crate::core::error::{ApiError, ValidationError};
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Record id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::MissingArgument {
                argument: "id".to_string(),
            })?;

        Uuid::parse_str(&raw)
            .map(RecordId)
            .map_err(|_| ValidationError::InvalidUuid { value: raw }.into())
    }
}

/// The `input` object of a `{ "input": { ... } }` body
#[derive(Debug, Clone)]
pub struct Input(pub Value);

impl<S> FromRequest<S> for Input
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::InvalidJson {
                message: e.body_text(),
            })?;

        match body.get_mut("input").map(Value::take) {
            Some(Value::Null) | None => Err(ValidationError::MissingArgument {
                argument: "input".to_string(),
            }
            .into()),
            Some(input) => Ok(Input(input)),
        }
    }
}

/// Query string arguments; unparseable values are a 400 `INVALID_ARGUMENT`
#[derive(Debug, Clone, Default)]
pub struct QueryArgs<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryArgs<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(args) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ValidationError::InvalidArgument {
                argument: "query".to_string(),
                message: e.body_text(),
            })?;
        Ok(QueryArgs(args))
    }
}
