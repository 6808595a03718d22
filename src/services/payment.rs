use super::{Populate, RecordService, RefCache, to_json};
use crate::core::error::{ApiError, FieldValidationError, ValidationError};
use crate::core::query::{SortOrder, SortSpec};
use crate::core::{DataService, Filter, timestamp};
use crate::entities::{Area, Collector, Company, Payment, Shop};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Embeds `shop` (with its `region`), `company` and `collector`
pub struct PaymentPopulator {
    shops: Arc<dyn DataService<Shop>>,
    areas: Arc<dyn DataService<Area>>,
    companies: Arc<dyn DataService<Company>>,
    collectors: Arc<dyn DataService<Collector>>,
}

impl PaymentPopulator {
    pub fn new(
        shops: Arc<dyn DataService<Shop>>,
        areas: Arc<dyn DataService<Area>>,
        companies: Arc<dyn DataService<Company>>,
        collectors: Arc<dyn DataService<Collector>>,
    ) -> Self {
        Self {
            shops,
            areas,
            companies,
            collectors,
        }
    }
}

#[async_trait]
impl Populate<Payment> for PaymentPopulator {
    async fn populate(&self, payments: Vec<Payment>) -> Result<Vec<Value>, ApiError> {
        let mut shops = RefCache::new(Arc::clone(&self.shops));
        let mut regions = RefCache::new(Arc::clone(&self.areas));
        let mut companies = RefCache::new(Arc::clone(&self.companies));
        let mut collectors = RefCache::new(Arc::clone(&self.collectors));

        let mut populated = Vec::with_capacity(payments.len());
        for payment in payments {
            let mut view = to_json(&payment)?;

            view["shop"] = match shops.resolve(&payment.shop).await? {
                Some(shop) => {
                    let mut shop_view = to_json(&shop)?;
                    shop_view["region"] = regions.resolve_json(&shop.region).await?;
                    shop_view
                }
                None => Value::Null,
            };
            view["company"] = companies.resolve_json(&payment.company).await?;
            view["collector"] = match &payment.collector {
                Some(id) => collectors.resolve_json(id).await?,
                None => Value::Null,
            };

            populated.push(view);
        }

        Ok(populated)
    }
}

/// Query string of `GET /payments/all`
///
/// Every parameter is optional; empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentQuery {
    /// First day of the range (inclusive)
    pub from: Option<String>,
    /// Last day of the range (inclusive)
    pub to: Option<String>,
    pub shop: Option<String>,
    pub company: Option<String>,
    pub collector: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub verified: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    timestamp::parse(raw).map_err(|_| ValidationError::InvalidDate {
        value: raw.to_string(),
    })
}

fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidUuid {
        value: raw.to_string(),
    })
}

impl PaymentQuery {
    /// Translate into a storage filter
    ///
    /// `from` snaps to the start of its UTC day and `to` covers its whole
    /// UTC day, so `from=2024-03-01&to=2024-03-01` is exactly March 1st.
    pub fn to_filter(&self) -> Result<Filter, ValidationError> {
        let mut filter = Filter::new();

        if let Some(from) = present(&self.from) {
            let (start, _) = timestamp::day_bounds(parse_date(from)?);
            filter = filter.gte("paymentDate", start);
        }
        if let Some(to) = present(&self.to) {
            let (_, end) = timestamp::day_bounds(parse_date(to)?);
            filter = filter.lt("paymentDate", end);
        }
        if let Some(shop) = present(&self.shop) {
            filter = filter.eq("shop", parse_id(shop)?);
        }
        if let Some(company) = present(&self.company) {
            filter = filter.eq("company", parse_id(company)?);
        }
        if let Some(collector) = present(&self.collector) {
            filter = filter.eq("collector", parse_id(collector)?);
        }
        if let Some(status) = present(&self.payment_status) {
            filter = filter.eq("paymentStatus", status);
        }
        if let Some(method) = present(&self.payment_method) {
            filter = filter.eq("paymentMethod", method);
        }
        if let Some(verified) = present(&self.verified) {
            let verified = match verified {
                "true" => true,
                "false" => false,
                other => {
                    return Err(ValidationError::FieldErrors(vec![FieldValidationError {
                        field: "verified".to_string(),
                        message: format!("must be true or false, got '{}'", other),
                    }]));
                }
            };
            filter = filter.eq("verified", verified);
        }

        Ok(filter)
    }
}

/// Payment CRUD plus the date-oriented payment queries
#[derive(Clone)]
pub struct PaymentService {
    records: RecordService<Payment>,
}

impl PaymentService {
    pub fn new(records: RecordService<Payment>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &RecordService<Payment> {
        &self.records
    }

    /// Payments matching `query`, populated, latest payment date first
    pub async fn query_payments(&self, query: &PaymentQuery) -> Result<Vec<Value>, ApiError> {
        let filter = query.to_filter()?;
        self.sorted_and_populated(&filter).await
    }

    /// Payments whose `paymentDate` falls on the UTC day of `date`
    pub async fn payments_for_date(&self, date: Option<&str>) -> Result<Vec<Value>, ApiError> {
        let raw = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ValidationError::MissingArgument {
                argument: "date".to_string(),
            })?;
        let (start, end) = timestamp::day_bounds(parse_date(raw)?);

        let filter = Filter::new()
            .gte("paymentDate", start)
            .lt("paymentDate", end);
        self.sorted_and_populated(&filter).await
    }

    async fn sorted_and_populated(&self, filter: &Filter) -> Result<Vec<Value>, ApiError> {
        // Stores return newest createdAt first; a stable sort keeps that as the tiebreak
        let mut payments = self.records.query(filter).await?;
        SortSpec {
            field: "paymentDate".into(),
            order: SortOrder::Desc,
        }
        .apply(&mut payments);

        self.records.populate_many(payments).await
    }
}
