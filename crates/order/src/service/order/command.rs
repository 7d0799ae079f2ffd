use crate::{
    abstract_trait::{
        cache::DynOrderCache,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
    },
    domain::{
        requests::order::{CreateOrderRecordRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        response::order::{CreatedOrder, EventDelivery, OrderResponse},
    },
    model::order::{OrderItem, OrderStatus},
    service::OperationTracer,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use shared::{
    abstract_trait::DynKafka,
    domain::event::OrderEvent,
    errors::ServiceError,
    utils::{Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    cache: DynOrderCache,
    kafka: DynKafka,
    topic: String,
    tracer: OperationTracer,
    publish_failures: Counter,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub cache: DynOrderCache,
    pub kafka: DynKafka,
    pub topic: String,
    pub registry: Arc<Mutex<Registry>>,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            cache,
            kafka,
            topic,
            registry,
        } = deps;

        let metrics = Metrics::new();
        let publish_failures = Counter::default();

        {
            let mut registry = registry.lock().await;
            metrics.register(
                "order_command_service",
                "OrderCommandService",
                &mut registry,
            );
            registry.register(
                "order_event_publish_failures",
                "Order-created events that could not be delivered to the broker",
                publish_failures.clone(),
            );
        }

        Self {
            command,
            query,
            cache,
            kafka,
            topic,
            tracer: OperationTracer::new("order-command-service", metrics),
            publish_failures,
        }
    }

    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.get()
    }

    async fn publish_created(&self, order: &OrderResponse) -> EventDelivery {
        let event = OrderEvent::Created {
            order_id: order.id,
            user_id: order.user_id,
        };

        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => return self.publish_failed(order.id, format!("encode failed: {e}")),
        };

        match self
            .kafka
            .publish(&self.topic, &order.id.to_string(), &payload)
            .await
        {
            Ok(()) => {
                info!("📤 Published new_order event for order {}", order.id);
                EventDelivery::Published
            }
            Err(e) => self.publish_failed(order.id, e.to_string()),
        }
    }

    fn publish_failed(&self, order_id: Uuid, reason: String) -> EventDelivery {
        self.publish_failures.inc();
        warn!("⚠️ Order {order_id} committed but its event was not published: {reason}");
        EventDelivery::Failed(reason)
    }
}

/// Checks the line items and returns their records together with the order total.
pub fn validate_items(req: &CreateOrderRequest) -> Result<(Vec<OrderItem>, f64), ServiceError> {
    let mut errors = Vec::new();

    if req.items.is_empty() {
        errors.push("items: order must contain at least one item".to_string());
    }

    for (idx, item) in req.items.iter().enumerate() {
        if item.quantity <= 0 {
            errors.push(format!("items[{idx}].quantity: must be greater than 0"));
        }
        if !item.price.is_finite() || item.price <= 0.0 {
            errors.push(format!("items[{idx}].price: must be a positive number"));
        }
    }

    if errors.is_empty() {
        if let Err(e) = req.validate() {
            errors.push(e.to_string());
        }
    }

    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let items: Vec<OrderItem> = req.items.iter().cloned().map(OrderItem::from).collect();
    let total_price = items
        .iter()
        .map(|item| f64::from(item.quantity) * item.price)
        .sum::<f64>();

    if !total_price.is_finite() {
        return Err(ServiceError::Validation(vec![
            "items: order total is out of range".to_string(),
        ]));
    }

    Ok((items, total_price))
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        user_id: i32,
        req: &CreateOrderRequest,
    ) -> Result<CreatedOrder, ServiceError> {
        info!("🏗️ Creating new order for user_id={user_id}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let (items, total_price) = match validate_items(req) {
            Ok(valid) => valid,
            Err(err) => {
                self.tracer
                    .failure(&tracing_ctx, method, "Order items rejected");
                return Err(err);
            }
        };

        let record = CreateOrderRecordRequest {
            order_id: None,
            user_id,
            items,
            total_price,
            status: OrderStatus::Pending,
        };

        let order = match self.command.create_order(&record).await {
            Ok(order) => OrderResponse::from(order),
            Err(e) => {
                error!("❌ Failed to persist order for user {user_id}: {e:?}");
                self.tracer
                    .failure(&tracing_ctx, method, "Failed to persist order");
                return Err(ServiceError::Repo(e));
            }
        };

        let event = self.publish_created(&order).await;

        self.tracer.success(
            &tracing_ctx,
            method,
            &format!("Order {} created for user {user_id}", order.id),
        );

        Ok(CreatedOrder { order, event })
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        req: &UpdateOrderStatusRequest,
    ) -> Result<OrderResponse, ServiceError> {
        info!("🔄 Updating status of order {order_id} to '{}'", req.status);

        let method = Method::Patch;
        let tracing_ctx = self.tracer.start(
            "update_order_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update_status"),
                KeyValue::new("order_id", order_id.to_string()),
            ],
        );

        let status = match req.status.parse::<OrderStatus>() {
            Ok(status) => status,
            Err(reason) => {
                self.tracer
                    .failure(&tracing_ctx, method, "Invalid order status");
                return Err(ServiceError::Validation(vec![format!("status: {reason}")]));
            }
        };

        match self.query.find_by_id(order_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.tracer.failure(&tracing_ctx, method, "Order not found");
                return Err(ServiceError::NotFound(format!("Order {order_id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to load order {order_id}: {e:?}");
                self.tracer
                    .failure(&tracing_ctx, method, "Failed to load order");
                return Err(ServiceError::Repo(e));
            }
        }

        let updated = match self.command.update_status(order_id, status).await {
            Ok(Some(order)) => OrderResponse::from(order),
            Ok(None) => {
                self.tracer
                    .failure(&tracing_ctx, method, "Order vanished during update");
                return Err(ServiceError::NotFound(format!("Order {order_id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to update order {order_id}: {e:?}");
                self.tracer
                    .failure(&tracing_ctx, method, "Failed to update order status");
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.cache.invalidate_order(order_id).await {
            warn!("⚠️ Failed to invalidate cache for order {order_id}: {e}");
        }

        self.tracer.success(
            &tracing_ctx,
            method,
            &format!("Order {order_id} is now {status}"),
        );

        Ok(updated)
    }
}
