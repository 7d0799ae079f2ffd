use crate::{
    abstract_trait::cache::OrderCacheTrait,
    domain::response::order::{OrderItemResponse, OrderResponse},
    model::order::OrderStatus,
};
use async_trait::async_trait;
use shared::{
    cache::CacheStore,
    errors::CacheError,
    utils::{format_timestamp, parse_timestamp},
};
use std::{collections::HashMap, time::Duration};
use tracing::debug;
use uuid::Uuid;

pub fn order_cache_key(order_id: Uuid) -> String {
    format!("order:{order_id}")
}

/// Order snapshots stored as Redis hashes under `order:<id>`.
#[derive(Clone)]
pub struct OrderCache {
    store: CacheStore,
}

impl OrderCache {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }
}

fn snapshot_fields(order: &OrderResponse) -> Result<Vec<(String, String)>, CacheError> {
    let items = serde_json::to_string(&order.items).map_err(|e| CacheError::Corrupt {
        key: order_cache_key(order.id),
        reason: format!("items not serializable: {e}"),
    })?;

    Ok(vec![
        ("user_id".to_string(), order.user_id.to_string()),
        ("items".to_string(), items),
        ("total_price".to_string(), order.total_price.to_string()),
        ("status".to_string(), order.status.to_string()),
        ("created_at".to_string(), format_timestamp(&order.created_at)),
        ("updated_at".to_string(), format_timestamp(&order.updated_at)),
    ])
}

fn order_from_snapshot(
    order_id: Uuid,
    fields: &HashMap<String, String>,
) -> Result<OrderResponse, String> {
    let field = |name: &str| {
        fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| format!("missing field '{name}'"))
    };

    let user_id = field("user_id")?
        .parse::<i32>()
        .map_err(|e| format!("user_id: {e}"))?;
    let items = serde_json::from_str::<Vec<OrderItemResponse>>(field("items")?)
        .map_err(|e| format!("items: {e}"))?;
    let total_price = field("total_price")?
        .parse::<f64>()
        .map_err(|e| format!("total_price: {e}"))?;
    let status = field("status")?.parse::<OrderStatus>()?;
    let created_at = parse_timestamp(field("created_at")?).map_err(|e| format!("created_at: {e}"))?;
    let updated_at = parse_timestamp(field("updated_at")?).map_err(|e| format!("updated_at: {e}"))?;

    Ok(OrderResponse {
        id: order_id,
        user_id,
        items,
        total_price,
        status,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl OrderCacheTrait for OrderCache {
    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, CacheError> {
        let key = order_cache_key(order_id);

        let Some(fields) = self.store.get_hash(&key).await? else {
            return Ok(None);
        };

        order_from_snapshot(order_id, &fields)
            .map(Some)
            .map_err(|reason| CacheError::Corrupt { key, reason })
    }

    async fn put_order(&self, order: &OrderResponse, ttl: Duration) -> Result<(), CacheError> {
        let fields = snapshot_fields(order)?;
        self.store
            .set_hash(&order_cache_key(order.id), &fields, ttl)
            .await
    }

    async fn invalidate_order(&self, order_id: Uuid) -> Result<(), CacheError> {
        let key = order_cache_key(order_id);

        if self.store.delete(&key).await? {
            debug!("Cache invalidated for {key}");
        } else {
            debug!("No cache to invalidate for {key}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_order() -> OrderResponse {
        OrderResponse {
            id: Uuid::new_v4(),
            user_id: 3,
            items: vec![OrderItemResponse {
                product_id: "sku-1".into(),
                name: "Kettle".into(),
                quantity: 2,
                price: 10.0,
                total: 20.0,
            }],
            total_price: 20.0,
            status: OrderStatus::Paid,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 9, 0).unwrap()
                + chrono::Duration::microseconds(123_456),
        }
    }

    #[test]
    fn key_uses_order_prefix() {
        let id = Uuid::nil();
        assert_eq!(
            order_cache_key(id),
            "order:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn snapshot_restores_the_same_order() {
        let order = sample_order();
        let fields: HashMap<String, String> =
            snapshot_fields(&order).unwrap().into_iter().collect();

        assert_eq!(order_from_snapshot(order.id, &fields).unwrap(), order);
    }

    #[test]
    fn snapshot_with_unknown_status_is_rejected() {
        let order = sample_order();
        let mut fields: HashMap<String, String> =
            snapshot_fields(&order).unwrap().into_iter().collect();
        fields.insert("status".into(), "lost".into());

        assert!(order_from_snapshot(order.id, &fields).is_err());
    }

    #[test]
    fn snapshot_missing_a_field_is_rejected() {
        let order = sample_order();
        let mut fields: HashMap<String, String> =
            snapshot_fields(&order).unwrap().into_iter().collect();
        fields.remove("items");

        let err = order_from_snapshot(order.id, &fields).unwrap_err();
        assert!(err.contains("items"));
    }
}
