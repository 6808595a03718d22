//! Building and patching records from `input` payloads
//!
//! Clients send `{ "input": { ... } }` for both create and update. A new
//! record gets a fresh `_id` and both timestamps before it is deserialized.
//! An update merges the listed keys over the stored document (`$set`
//! semantics), so keys the client leaves out keep their stored value.

use crate::core::entity::Data;
use crate::core::error::ValidationError;
use crate::core::timestamp;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Keys a client can never overwrite
const IMMUTABLE_KEYS: &[&str] = &["_id", "createdAt"];

/// Build and validate a new record from a create payload
pub fn build_record<T: Data>(input: Value) -> Result<T, ValidationError> {
    let mut fields = into_object(input)?;

    let now = Value::String(timestamp::format(&timestamp::now()));
    fields.insert("_id".into(), Value::String(Uuid::new_v4().to_string()));
    fields.insert("createdAt".into(), now.clone());
    fields.insert("updatedAt".into(), now);

    let record: T = decode(fields)?;
    record.validate()?;
    Ok(record)
}

/// Merge a partial update payload over `existing` and validate the result
pub fn apply_patch<T: Data>(existing: &T, patch: Value) -> Result<T, ValidationError> {
    let patch = into_object(patch)?;

    let mut fields = match serde_json::to_value(existing) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            return Err(ValidationError::InvalidJson {
                message: format!("{} is not a JSON object", T::resource_name_singular()),
            });
        }
        Err(e) => {
            return Err(ValidationError::InvalidJson {
                message: e.to_string(),
            });
        }
    };

    for (key, value) in patch {
        if !IMMUTABLE_KEYS.contains(&key.as_str()) {
            fields.insert(key, value);
        }
    }

    let mut record: T = decode(fields)?;
    record.touch();
    record.validate()?;
    Ok(record)
}

fn into_object(input: Value) -> Result<Map<String, Value>, ValidationError> {
    match input {
        Value::Object(fields) => Ok(fields),
        other => Err(ValidationError::InvalidJson {
            message: format!("input must be a JSON object, got {}", json_kind(&other)),
        }),
    }
}

fn decode<T: Data>(fields: Map<String, Value>) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError::InvalidJson {
        message: format!("invalid {}: {}", T::resource_name_singular(), e),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
