#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DurationRound, TimeDelta, Utc};
use order::{
    abstract_trait::{
        cache::{DynOrderCache, OrderCacheTrait},
        rate_limit::RateLimitStoreTrait,
        order::repository::{
            DynOrderCommandRepository, DynOrderQueryRepository, OrderCommandRepositoryTrait,
            OrderQueryRepositoryTrait,
        },
        order::service::{DynOrderCommandService, DynOrderQueryService},
        user::{DynUserRepository, UserRepositoryTrait},
    },
    domain::{
        requests::{
            auth::CreateUserRecordRequest,
            order::{CreateOrderItemRequest, CreateOrderRecordRequest, CreateOrderRequest},
        },
        response::order::OrderResponse,
    },
    model::{
        order::{Order, OrderItem, OrderStatus},
        user::User,
    },
    service::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderQueryServiceDeps},
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynKafka, KafkaTrait},
    errors::{CacheError, RepositoryError, ServiceError},
};
use sqlx::types::Json;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use uuid::Uuid;

pub const TOPIC: &str = "order.created";

fn now() -> chrono::DateTime<Utc> {
    Utc::now()
        .duration_trunc(TimeDelta::microseconds(1))
        .unwrap_or_else(|_| Utc::now())
}

/// Order table stand-in that counts every access.
#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<HashMap<Uuid, Order>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail: AtomicBool,
}

impl InMemoryOrders {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn stored(&self, order_id: Uuid) -> Option<Order> {
        self.rows.lock().unwrap().get(&order_id).cloned()
    }

    pub fn insert_at(&self, user_id: i32, created_at: chrono::DateTime<Utc>) -> Uuid {
        let order_id = Uuid::new_v4();
        self.rows.lock().unwrap().insert(
            order_id,
            Order {
                order_id,
                user_id,
                items: Json(vec![OrderItem {
                    product_id: "sku-seed".into(),
                    name: "Seed".into(),
                    quantity: 1,
                    price: 1.0,
                }]),
                total_price: 1.0,
                status: OrderStatus::Pending,
                created_at,
                updated_at: created_at,
            },
        );
        order_id
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(RepositoryError::Timeout(5000))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryOrders {
    async fn create_order(&self, req: &CreateOrderRecordRequest) -> Result<Order, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let ts = now();
        let order = Order {
            order_id: req.order_id.unwrap_or_else(Uuid::new_v4),
            user_id: req.user_id,
            items: Json(req.items.clone()),
            total_price: req.total_price,
            status: req.status,
            created_at: ts,
            updated_at: ts,
        };

        self.rows
            .lock()
            .unwrap()
            .insert(order.order_id, order.clone());
        Ok(order)
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&order_id).map(|order| {
            order.status = status;
            order.updated_at = now();
            order.clone()
        }))
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryOrders {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().unwrap().get(&order_id).cloned())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Order>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        // Unordered on purpose; the service sorts.
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<Uuid, (OrderResponse, Duration)>>,
    pub invalidations: AtomicUsize,
    pub fail: AtomicBool,
}

impl InMemoryCache {
    pub fn entry(&self, order_id: Uuid) -> Option<(OrderResponse, Duration)> {
        self.entries.lock().unwrap().get(&order_id).cloned()
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(CacheError::Timeout(500))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrderCacheTrait for InMemoryCache {
    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, CacheError> {
        self.check()?;
        Ok(self.entry(order_id).map(|(order, _)| order))
    }

    async fn put_order(&self, order: &OrderResponse, ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(order.id, (order.clone(), ttl));
        Ok(())
    }

    async fn invalidate_order(&self, order_id: Uuid) -> Result<(), CacheError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.entries.lock().unwrap().remove(&order_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingKafka {
    pub sent: Mutex<Vec<SentMessage>>,
    pub fail: AtomicBool,
    pub flushed: AtomicBool,
}

impl RecordingKafka {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl KafkaTrait for RecordingKafka {
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Kafka("broker unavailable".into()));
        }

        self.sent.lock().unwrap().push(SentMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: value.to_vec(),
        });
        Ok(())
    }

    async fn shutdown(&self) {
        self.flushed.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    /// Adds an active account with a fixed id; its email is `user<id>@example.com`.
    pub fn seed(&self, user_id: i32) {
        let ts = now();
        self.rows.lock().unwrap().push(User {
            user_id,
            email: format!("user{user_id}@example.com"),
            password: "not-a-real-hash".into(),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        });
    }

    pub fn deactivate(&self, email: &str) {
        if let Some(user) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.email == email)
        {
            user.is_active = false;
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }

    async fn create_user(&self, req: &CreateUserRecordRequest) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == req.email) {
            return Err(RepositoryError::AlreadyExists(req.email.clone()));
        }

        let ts = now();
        let user = User {
            user_id: rows.iter().map(|u| u.user_id).max().unwrap_or(0) + 1,
            email: req.email.clone(),
            password: req.hashed_password.clone(),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        };
        rows.push(user.clone());
        Ok(user)
    }
}

/// Per-client counters without expiry; each test builds a fresh one.
#[derive(Default)]
pub struct InMemoryRateLimits {
    hits: Mutex<HashMap<String, u64>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl RateLimitStoreTrait for InMemoryRateLimits {
    async fn hit(&self, client: &str, _window: Duration) -> Result<u64, CacheError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(500));
        }

        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(client.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

pub struct Harness {
    pub orders: Arc<InMemoryOrders>,
    pub cache: Arc<InMemoryCache>,
    pub kafka: Arc<RecordingKafka>,
    pub command: Arc<OrderCommandService>,
    pub query: Arc<OrderQueryService>,
    pub registry: Arc<tokio::sync::Mutex<Registry>>,
}

impl Harness {
    pub async fn new() -> Self {
        let orders = Arc::new(InMemoryOrders::default());
        let cache = Arc::new(InMemoryCache::default());
        let kafka = Arc::new(RecordingKafka::default());
        let registry = Arc::new(tokio::sync::Mutex::new(Registry::default()));

        let command = Arc::new(
            OrderCommandService::new(OrderCommandServiceDeps {
                command: orders.clone() as DynOrderCommandRepository,
                query: orders.clone() as DynOrderQueryRepository,
                cache: cache.clone() as DynOrderCache,
                kafka: kafka.clone() as DynKafka,
                topic: TOPIC.to_string(),
                registry: registry.clone(),
            })
            .await,
        );

        let query = Arc::new(
            OrderQueryService::new(OrderQueryServiceDeps {
                query: orders.clone() as DynOrderQueryRepository,
                cache: cache.clone() as DynOrderCache,
                cache_ttl: Duration::from_secs(300),
                registry: registry.clone(),
            })
            .await,
        );

        Self {
            orders,
            cache,
            kafka,
            command,
            query,
            registry,
        }
    }

    pub fn command_service(&self) -> DynOrderCommandService {
        self.command.clone()
    }

    pub fn query_service(&self) -> DynOrderQueryService {
        self.query.clone()
    }
}

pub fn item(quantity: i32, price: f64) -> CreateOrderItemRequest {
    CreateOrderItemRequest {
        product_id: format!("sku-{quantity}-{price}"),
        name: "Widget".into(),
        quantity,
        price,
    }
}

pub fn order_request(items: Vec<CreateOrderItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest { items }
}

pub fn user_repo() -> (Arc<InMemoryUsers>, DynUserRepository) {
    let users = Arc::new(InMemoryUsers::default());
    let repo: DynUserRepository = users.clone();
    (users, repo)
}
