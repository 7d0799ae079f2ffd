use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait, model::order::Order as OrderModel,
    repository::bounded,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

pub struct OrderQueryRepository {
    db: ConnectionPool,
    timeout: Duration,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, OrderModel>(
                r#"
                SELECT order_id, user_id, items, total_price, status, created_at, updated_at
                FROM orders
                WHERE order_id = $1
                "#,
            )
            .bind(order_id)
            .fetch_optional(&self.db),
        )
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch order {order_id}: {:?}", err);
            err
        })
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderModel>, RepositoryError> {
        let orders = bounded(
            self.timeout,
            sqlx::query_as::<_, OrderModel>(
                r#"
                SELECT order_id, user_id, items, total_price, status, created_at, updated_at
                FROM orders
                WHERE user_id = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.db),
        )
        .await
        .map_err(|err| {
            error!("❌ Failed to list orders of user {user_id}: {:?}", err);
            err
        })?;

        info!("Found {} orders for user {user_id}", orders.len());
        Ok(orders)
    }
}
