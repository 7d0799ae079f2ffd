use crate::{
    abstract_trait::rate_limit::DynRateLimitStore,
    cache::RateLimiter,
    config::Config,
    di::{DependenciesInject, DependenciesInjectDeps},
    middleware::rate_limit::RateLimitPolicy,
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService, DynKafka, KafkaTrait},
    cache::CacheStore,
    config::{
        ConnectionManager, ConnectionPool, Hashing, JwtConfig, Kafka, KafkaProducerConfig,
        RedisClient, RedisConfig,
    },
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::info;

const ACCESS_TOKEN_MINUTES: i64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub db: ConnectionPool,
    pub redis: Arc<RedisClient>,
    pub kafka: DynKafka,
    pub jwt_config: DynJwtService,
    pub di_container: DependenciesInject,
    pub rate_limit: DynRateLimitStore,
    pub rate_limit_policy: RateLimitPolicy,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
}

impl AppState {
    pub async fn new(config: &Config, db: ConnectionPool) -> Result<Self> {
        let jwt_config =
            Arc::new(JwtConfig::new(&config.jwt_secret, ACCESS_TOKEN_MINUTES)) as DynJwtService;
        let hashing = Arc::new(Hashing::new()) as DynHashing;
        let registry = Arc::new(Mutex::new(Registry::default()));
        let system_metrics = Arc::new(SystemMetrics::new());

        info!("Initializing Redis connection for order service");
        let redis_config = RedisConfig::new(
            config.redis.host.clone(),
            config.redis.port,
            config.redis.db,
            config.redis.password.clone(),
        );
        let redis = RedisClient::new(&redis_config).context("Failed to connect to Redis")?;

        redis.ping().await.context("Failed to ping Redis server")?;

        let cache_store = CacheStore::new(redis.pool.clone(), config.cache_timeout);
        let rate_limit = Arc::new(RateLimiter::new(cache_store.clone())) as DynRateLimitStore;
        let rate_limit_policy = RateLimitPolicy {
            max_requests: config.rate_limit_per_minute,
            window: Duration::from_secs(60),
        };

        let kafka = Arc::new(Kafka::new(KafkaProducerConfig {
            brokers: config.kafka_broker.clone(),
            publish_timeout: config.publish_timeout,
        })) as DynKafka;

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            pool: db.clone(),
            cache_store,
            kafka: kafka.clone(),
            hashing,
            jwt: jwt_config.clone(),
            registry: registry.clone(),
            kafka_topic: config.kafka_topic.clone(),
            cache_ttl: config.cache_ttl,
            store_timeout: config.store_timeout,
        })
        .await;

        system_metrics.register(&mut *registry.lock().await);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        Ok(Self {
            db,
            redis: Arc::new(redis),
            kafka,
            jwt_config,
            di_container,
            rate_limit,
            rate_limit_policy,
            registry,
            system_metrics,
        })
    }

    /// Releases process-wide clients once the server has stopped accepting
    /// requests.
    pub async fn shutdown(&self) {
        info!("🧹 Flushing Kafka producer");
        self.kafka.shutdown().await;

        self.redis.close();

        self.db.close().await;
        info!("Database pool closed");
    }
}

/// Pool creation lives outside [`AppState::new`] so migrations can run first.
pub async fn connect_database(config: &Config) -> Result<ConnectionPool> {
    ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
        config.store_timeout,
    )
    .await
    .context("Failed to connect to database")
}
