use crate::domain::response::order::OrderResponse;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_by_id(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderResponse>, ServiceError>;
}
