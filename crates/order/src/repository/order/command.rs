use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::CreateOrderRecordRequest,
    model::order::{Order as OrderModel, OrderStatus},
    repository::bounded,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

pub struct OrderCommandRepository {
    db: ConnectionPool,
    timeout: Duration,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let order_id = req.order_id.unwrap_or_else(Uuid::new_v4);

        let result = bounded(
            self.timeout,
            sqlx::query_as::<_, OrderModel>(
                r#"
                INSERT INTO orders (order_id, user_id, items, total_price, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, current_timestamp, current_timestamp)
                RETURNING order_id, user_id, items, total_price, status, created_at, updated_at
                "#,
            )
            .bind(order_id)
            .bind(req.user_id)
            .bind(Json(&req.items))
            .bind(req.total_price)
            .bind(req.status)
            .fetch_one(&self.db),
        )
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to create order for user {}: {:?}",
                req.user_id, err
            );
            err
        })?;

        info!(
            "✅ Created order ID {} for user {}",
            result.order_id, result.user_id
        );
        Ok(result)
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let result = bounded(
            self.timeout,
            sqlx::query_as::<_, OrderModel>(
                r#"
                UPDATE orders
                SET status     = $2,
                    updated_at = current_timestamp
                WHERE order_id = $1
                RETURNING order_id, user_id, items, total_price, status, created_at, updated_at
                "#,
            )
            .bind(order_id)
            .bind(status)
            .fetch_optional(&self.db),
        )
        .await
        .map_err(|err| {
            error!("❌ Failed to update status of order {order_id}: {:?}", err);
            err
        })?;

        match &result {
            Some(order) => info!("🔄 Order {} is now {}", order.order_id, order.status),
            None => info!("Order {order_id} not found for status update"),
        }

        Ok(result)
    }
}
