use crate::{
    abstract_trait::{
        cache::DynOrderCache,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        user::{DynAuthService, DynUserRepository},
    },
    cache::OrderCache,
    repository::{
        order::{OrderCommandRepository, OrderQueryRepository},
        user::UserRepository,
    },
    service::{
        AuthService, AuthServiceDeps, OrderCommandService, OrderCommandServiceDeps,
        OrderQueryService, OrderQueryServiceDeps,
    },
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService, DynKafka},
    cache::CacheStore,
    config::ConnectionPool,
};
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub auth_service: DynAuthService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_command", &"DynOrderCommandService")
            .field("order_query", &"DynOrderQueryService")
            .field("auth_service", &"DynAuthService")
            .finish()
    }
}

/// Process-wide clients and tunables the services are built from.
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub cache_store: CacheStore,
    pub kafka: DynKafka,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
    pub kafka_topic: String,
    pub cache_ttl: Duration,
    pub store_timeout: Duration,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Self {
        let DependenciesInjectDeps {
            pool,
            cache_store,
            kafka,
            hashing,
            jwt,
            registry,
            kafka_topic,
            cache_ttl,
            store_timeout,
        } = deps;

        let order_cache: DynOrderCache = Arc::new(OrderCache::new(cache_store));

        let order_command_repo: DynOrderCommandRepository =
            Arc::new(OrderCommandRepository::new(pool.clone(), store_timeout));
        let order_query_repo: DynOrderQueryRepository =
            Arc::new(OrderQueryRepository::new(pool.clone(), store_timeout));
        let user_repo: DynUserRepository = Arc::new(UserRepository::new(pool, store_timeout));

        let order_command: DynOrderCommandService = Arc::new(
            OrderCommandService::new(OrderCommandServiceDeps {
                command: order_command_repo,
                query: order_query_repo.clone(),
                cache: order_cache.clone(),
                kafka,
                topic: kafka_topic,
                registry: registry.clone(),
            })
            .await,
        );

        let order_query: DynOrderQueryService = Arc::new(
            OrderQueryService::new(OrderQueryServiceDeps {
                query: order_query_repo,
                cache: order_cache,
                cache_ttl,
                registry: registry.clone(),
            })
            .await,
        );

        let auth_service: DynAuthService = Arc::new(
            AuthService::new(AuthServiceDeps {
                users: user_repo,
                hashing,
                jwt,
                registry,
            })
            .await,
        );

        Self {
            order_command,
            order_query,
            auth_service,
        }
    }
}
