//! Fixed-width UTC timestamps
//!
//! Every timestamp leaves the service as `YYYY-MM-DDTHH:MM:SS.mmmZ`, the same
//! shape browsers produce with `Date.prototype.toISOString`. Because the width
//! never varies, string order equals chronological order, which lets the
//! MongoDB backend range-query timestamps stored as strings.
//!
//! Use as a serde `with` module:
//!
//! ```rust,ignore
//! #[serde(with = "crate::core::timestamp")]
//! created_at: DateTime<Utc>,
//!
//! #[serde(with = "crate::core::timestamp::option", default)]
//! due_date: Option<DateTime<Utc>>,
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

/// `strftime` pattern for the wire format
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current time truncated to millisecond precision
///
/// Records carry no more precision than they can be serialized with, so a
/// record read back from any backend compares equal to the one written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Why a string is not an acceptable timestamp
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error(transparent)]
    Malformed(#[from] chrono::ParseError),

    /// Outside what the four-digit wire format can hold
    #[error("year {0} is outside 0000-9999")]
    YearOutOfRange(i32),
}

/// Render a timestamp in the wire format
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Parse an RFC 3339 timestamp (any offset) or a bare `YYYY-MM-DD` date
///
/// Bare dates resolve to midnight UTC. Years must fit in four digits after
/// conversion to UTC, otherwise string order would stop matching time order.
pub fn parse(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    let value = value.trim();
    let dt = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc).trunc_subsecs(3),
        Err(rfc_err) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(start_of_day)
            .map_err(|_| rfc_err)?,
    };
    match dt.year() {
        0..=9999 => Ok(dt),
        year => Err(TimestampError::YearOutOfRange(year)),
    }
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Half-open `[start, end)` bounds of the UTC calendar day containing `dt`
pub fn day_bounds(dt: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(dt.date_naive());
    (start, start + TimeDelta::days(1))
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

/// Same wire format for `Option<DateTime<Utc>>`; `null` maps to `None`
pub mod option {
    use super::*;

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw).map(Some).map_err(|e| {
                de::Error::custom(format!("invalid timestamp '{}': {}", raw, e))
            }),
            None => Ok(None),
        }
    }
}
