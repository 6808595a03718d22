//! Query parameters, filters and pagination

use crate::core::entity::Data;
use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A single comparison against a field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(FieldValue),
    Ne(FieldValue),
    Gt(FieldValue),
    Gte(FieldValue),
    Lt(FieldValue),
    Lte(FieldValue),
}

impl Condition {
    /// Evaluate against a record's value; a missing field is `Null`
    pub fn matches(&self, actual: &FieldValue) -> bool {
        match self {
            Condition::Eq(expected) => actual.compare(expected) == Some(Ordering::Equal),
            Condition::Ne(expected) => actual.compare(expected) != Some(Ordering::Equal),
            Condition::Gt(bound) => actual.compare(bound) == Some(Ordering::Greater),
            Condition::Gte(bound) => matches!(
                actual.compare(bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Lt(bound) => actual.compare(bound) == Some(Ordering::Less),
            Condition::Lte(bound) => matches!(
                actual.compare(bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// The operand of this condition
    pub fn value(&self) -> &FieldValue {
        match self {
            Condition::Eq(v)
            | Condition::Ne(v)
            | Condition::Gt(v)
            | Condition::Gte(v)
            | Condition::Lt(v)
            | Condition::Lte(v) => v,
        }
    }
}

/// Conjunction of field conditions
///
/// # Example
/// ```rust,ignore
/// let filter = Filter::new()
///     .eq("shop", shop_id)
///     .gte("paymentDate", start)
///     .lt("paymentDate", end);
/// let payments = store.find(&filter).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `field`
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.push((field.into(), condition));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Ne(value.into()))
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Gt(value.into()))
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Gte(value.into()))
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Lt(value.into()))
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(field, Condition::Lte(value.into()))
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether `record` satisfies every clause
    pub fn matches<T: Data>(&self, record: &T) -> bool {
        self.clauses.iter().all(|(field, condition)| {
            let actual = record.field_value(field).unwrap_or(FieldValue::Null);
            condition.matches(&actual)
        })
    }

    /// Parse the JSON filter syntax
    ///
    /// Keys are field names with an optional operator suffix: `>`, `>=`,
    /// `<`, `<=` or `!` (not equal). No suffix means equality. Values must
    /// be scalars.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or_else(|| ValidationError::InvalidJson {
            message: "filter must be a JSON object".to_string(),
        })?;

        let mut filter = Filter::new();
        for (key, raw) in object {
            let operand = FieldValue::from_json(raw).ok_or_else(|| ValidationError::InvalidJson {
                message: format!("filter value for '{}' must be a scalar", key),
            })?;
            let (field, condition) = if let Some(field) = key.strip_suffix(">=") {
                (field, Condition::Gte(operand))
            } else if let Some(field) = key.strip_suffix("<=") {
                (field, Condition::Lte(operand))
            } else if let Some(field) = key.strip_suffix('>') {
                (field, Condition::Gt(operand))
            } else if let Some(field) = key.strip_suffix('<') {
                (field, Condition::Lt(operand))
            } else if let Some(field) = key.strip_suffix('!') {
                (field, Condition::Ne(operand))
            } else {
                (key.as_str(), Condition::Eq(operand))
            };
            filter = filter.with(field.trim(), condition);
        }
        Ok(filter)
    }
}

macro_rules! field_value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for FieldValue {
                fn from(value: $source) -> Self {
                    FieldValue::$variant(value.into())
                }
            }
        )*
    };
}

field_value_from!(
    String => String,
    &str => String,
    i64 => Integer,
    f64 => Float,
    bool => Boolean,
    uuid::Uuid => Uuid,
    chrono::DateTime<chrono::Utc> => DateTime,
);

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parsed `sort` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, order) = match raw.split_once(':') {
            Some((field, "desc")) => (field, SortOrder::Desc),
            Some((field, "asc")) => (field, SortOrder::Asc),
            Some(_) => return None,
            None => (raw, SortOrder::Asc),
        };
        let field = field.trim();
        (!field.is_empty()).then(|| SortSpec {
            field: field.to_string(),
            order,
        })
    }

    /// Sort records in place; nulls go last whatever the direction
    pub fn apply<T: Data>(&self, records: &mut [T]) {
        records.sort_by(|a, b| {
            let left = a.field_value(&self.field).unwrap_or(FieldValue::Null);
            let right = b.field_value(&self.field).unwrap_or(FieldValue::Null);
            match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = left.compare(&right).unwrap_or(Ordering::Equal);
                    match self.order {
                        SortOrder::Asc => ord,
                        SortOrder::Desc => ord.reverse(),
                    }
                }
            }
        });
    }
}

/// Query parameters for pagination, filtering and sorting
///
/// # Example
/// ```rust,ignore
/// GET /payments?page=2&limit=10
/// GET /payments?filter={"paymentStatus": "DUE", "amount>": 100}
/// GET /shops?sort=name:asc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Filters as a JSON object
    ///
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": v, "field<": v, "field>=": v, "field<=": v}`
    /// - Not equal: `{"field!": v}`
    pub filter: Option<String>,

    /// `field`, `field:asc` or `field:desc`
    pub sort: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to 1..=100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Parse the `filter` parameter; absent or blank means no conditions
    pub fn filter(&self) -> Result<Filter, ValidationError> {
        match self.filter.as_deref().map(str::trim) {
            None | Some("") => Ok(Filter::new()),
            Some(raw) => {
                let value: Value =
                    serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson {
                        message: format!("filter: {}", e),
                    })?;
                Filter::from_json(&value)
            }
        }
    }

    /// Parse the `sort` parameter; absent or blank means store order
    pub fn sort(&self) -> Result<Option<SortSpec>, ValidationError> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => SortSpec::parse(raw).map(Some).ok_or_else(|| {
                ValidationError::InvalidArgument {
                    argument: "sort".to_string(),
                    message: format!("'{}' is not field, field:asc or field:desc", raw),
                }
            }),
        }
    }

    /// Cut one page out of `items`
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let meta = PaginationMeta::new(self.page(), self.limit(), items.len());
        let start = (meta.page - 1).saturating_mul(meta.limit);
        let page = items.into_iter().skip(start).take(meta.limit).collect();
        (page, meta)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
