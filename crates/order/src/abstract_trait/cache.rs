use crate::domain::response::order::OrderResponse;
use async_trait::async_trait;
use shared::errors::CacheError;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

pub type DynOrderCache = Arc<dyn OrderCacheTrait + Send + Sync>;

/// Advisory snapshot cache keyed by order id. Callers decide what an error
/// means; the order services log it and carry on.
#[async_trait]
pub trait OrderCacheTrait {
    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, CacheError>;
    async fn put_order(&self, order: &OrderResponse, ttl: Duration) -> Result<(), CacheError>;
    /// Removing an absent entry is not an error.
    async fn invalidate_order(&self, order_id: Uuid) -> Result<(), CacheError>;
}
