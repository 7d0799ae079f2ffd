use deadpool_redis::PoolError;
use redis::RedisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Corrupt cache entry for key '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}
