use crate::domain::{
    requests::order::{CreateOrderRequest, UpdateOrderStatusRequest},
    response::order::{CreatedOrder, OrderResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        user_id: i32,
        req: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ServiceError>;

    async fn update_order_status(
        &self,
        order_id: Uuid,
        req: &UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError>;
}
