use crate::model::order::{OrderItem, OrderStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderItemRequest {
    #[validate(length(min = 1))]
    pub product_id: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
}

impl From<CreateOrderItemRequest> for OrderItem {
    fn from(value: CreateOrderItemRequest) -> Self {
        OrderItem {
            product_id: value.product_id,
            name: value.name,
            quantity: value.quantity,
            price: value.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<CreateOrderItemRequest>,
}

/// Status arrives as free text so the service can reject values outside the
/// fixed set with a validation error instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub order_id: Option<Uuid>,
    pub user_id: i32,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub status: OrderStatus,
}
