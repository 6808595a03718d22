use super::{Populate, RefCache, to_json};
use crate::core::error::{ApiError, StorageError};
use crate::core::query::{SortOrder, SortSpec};
use crate::core::{DataService, Entity, Filter};
use crate::entities::{Area, Payment, Shop};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Embeds `region` and the shop's `payments`, newest payment date first
pub struct ShopPopulator {
    areas: Arc<dyn DataService<Area>>,
    payments: Arc<dyn DataService<Payment>>,
}

impl ShopPopulator {
    pub fn new(areas: Arc<dyn DataService<Area>>, payments: Arc<dyn DataService<Payment>>) -> Self {
        Self { areas, payments }
    }

    async fn payments_of(&self, shop: &Shop) -> Result<Value, ApiError> {
        let mut payments = self
            .payments
            .find(&Filter::new().eq("shop", shop.id()))
            .await
            .map_err(StorageError::query)?;

        SortSpec {
            field: "paymentDate".into(),
            order: SortOrder::Desc,
        }
        .apply(&mut payments);

        Ok(Value::Array(
            payments.iter().map(to_json).collect::<Result<_, _>>()?,
        ))
    }
}

#[async_trait]
impl Populate<Shop> for ShopPopulator {
    async fn populate(&self, shops: Vec<Shop>) -> Result<Vec<Value>, ApiError> {
        let mut regions = RefCache::new(Arc::clone(&self.areas));
        let mut populated = Vec::with_capacity(shops.len());

        for shop in shops {
            let mut view = to_json(&shop)?;
            view["region"] = regions.resolve_json(&shop.region).await?;
            view["payments"] = self.payments_of(&shop).await?;
            populated.push(view);
        }

        Ok(populated)
    }
}
