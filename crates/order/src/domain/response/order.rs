use crate::model::order::{Order as OrderModel, OrderItem, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub total: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(value: OrderItem) -> Self {
        OrderItemResponse {
            total: f64::from(value.quantity) * value.price,
            product_id: value.product_id,
            name: value.name,
            quantity: value.quantity,
            price: value.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: i32,
    pub items: Vec<OrderItemResponse>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            id: value.order_id,
            user_id: value.user_id,
            items: value.items.0.into_iter().map(OrderItemResponse::from).collect(),
            total_price: value.total_price,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Whether the order-created event reached the broker. The order itself is
/// committed in both cases.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDelivery {
    Published,
    Failed(String),
}

impl EventDelivery {
    pub fn is_published(&self) -> bool {
        matches!(self, EventDelivery::Published)
    }
}

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order: OrderResponse,
    pub event: EventDelivery,
}
