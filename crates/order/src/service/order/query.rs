use crate::{
    abstract_trait::{
        cache::DynOrderCache,
        order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    },
    domain::response::order::OrderResponse,
    service::OperationTracer,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    cache: DynOrderCache,
    cache_ttl: Duration,
    tracer: OperationTracer,
}

pub struct OrderQueryServiceDeps {
    pub query: DynOrderQueryRepository,
    pub cache: DynOrderCache,
    pub cache_ttl: Duration,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderQueryService {
    pub async fn new(deps: OrderQueryServiceDeps) -> Self {
        let OrderQueryServiceDeps {
            query,
            cache,
            cache_ttl,
            registry,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(
            "order_query_service",
            "OrderQueryService",
            &mut *registry.lock().await,
        );

        Self {
            query,
            cache,
            cache_ttl,
            tracer: OperationTracer::new("order-query-service", metrics),
        }
    }

    async fn cached(&self, order_id: Uuid) -> Option<OrderResponse> {
        match self.cache.get_order(order_id).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("⚠️ Cache read failed for order {order_id}, falling back to store: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_by_id(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order_id", order_id.to_string()),
            ],
        );

        if let Some(order) = self.cached(order_id).await {
            info!("✅ Found order {order_id} in cache");
            self.tracer
                .success(&tracing_ctx, method, "Order served from cache");
            return Ok(order);
        }

        let order = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => OrderResponse::from(order),
            Ok(None) => {
                self.tracer.failure(&tracing_ctx, method, "Order not found");
                return Err(ServiceError::NotFound(format!("Order {order_id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to fetch order {order_id}: {e:?}");
                self.tracer
                    .failure(&tracing_ctx, method, "Failed to fetch order");
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.cache.put_order(&order, self.cache_ttl).await {
            warn!("⚠️ Failed to cache order {order_id}: {e}");
        }

        self.tracer
            .success(&tracing_ctx, method, "Order served from store");

        Ok(order)
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_orders_by_user",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_user"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let mut orders: Vec<OrderResponse> = match self.query.find_by_user(user_id).await {
            Ok(orders) => orders.into_iter().map(OrderResponse::from).collect(),
            Err(e) => {
                error!("❌ Failed to list orders of user {user_id}: {e:?}");
                self.tracer
                    .failure(&tracing_ctx, method, "Failed to list orders");
                return Err(ServiceError::Repo(e));
            }
        };

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.tracer.success(
            &tracing_ctx,
            method,
            &format!("Found {} orders for user {user_id}", orders.len()),
        );

        Ok(orders)
    }
}
