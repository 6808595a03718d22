//! Field value types, comparison and format checks

use crate::core::timestamp;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
///
/// Records expose their fields as `FieldValue`s so that filters and sorts can
/// be evaluated without knowing the concrete record type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert a JSON scalar into a field value
    ///
    /// Strings that parse as a UUID, an RFC 3339 timestamp or a bare
    /// `YYYY-MM-DD` date are promoted so they compare against typed fields
    /// the same way on every backend.
    /// Arrays and objects have no field representation and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_f64().map(FieldValue::Float)),
            Value::String(s) => Some(Self::from_text(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Interpret a raw string, promoting UUIDs, timestamps and dates
    ///
    /// Bare dates become midnight UTC, matching how date fields are stored.
    pub fn from_text(raw: &str) -> Self {
        if let Ok(id) = Uuid::parse_str(raw) {
            return FieldValue::Uuid(id);
        }
        if let Ok(dt) = timestamp::parse(raw) {
            return FieldValue::DateTime(dt);
        }
        FieldValue::String(raw.to_string())
    }

    /// Compare two values
    ///
    /// Integers and floats compare numerically. A string compares against a
    /// UUID or a timestamp when it parses as one. Values of unrelated types
    /// are incomparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::String(b)) => {
                Uuid::parse_str(b).ok().map(|b| a.cmp(&b))
            }
            (FieldValue::String(a), FieldValue::Uuid(b)) => {
                Uuid::parse_str(a).ok().map(|a| a.cmp(b))
            }
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::String(b)) => {
                timestamp::parse(b).ok().map(|b| a.cmp(&b))
            }
            (FieldValue::String(a), FieldValue::DateTime(b)) => {
                timestamp::parse(a).ok().map(|a| a.cmp(b))
            }
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// Conversion of a record field into a [`FieldValue`]
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl ToFieldValue for Uuid {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map(ToFieldValue::to_field_value)
            .unwrap_or(FieldValue::Null)
    }
}

/// Field format validators
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a raw string against this format
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFormat::Phone => Self::is_valid_phone(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
        // Local and international numbers: optional '+', 7 to 15 digits,
        // single spaces or dashes allowed between digit groups
        PHONE_REGEX
            .get_or_init(|| Regex::new(r"^\+?\d(?:[ -]?\d){6,14}$").ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(phone))
    }
}

/// `validator` hook for phone number fields
pub fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if FieldFormat::Phone.matches(phone) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("must be a phone number of 7 to 15 digits".into());
        Err(err)
    }
}
