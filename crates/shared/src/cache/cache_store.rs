use crate::errors::CacheError;
use deadpool_redis::{Connection, Pool};
use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};
use tracing::debug;

/// Thin async wrapper over the Redis pool. Every call is bounded by
/// `op_timeout`, covering both pool checkout and the command itself.
#[derive(Clone)]
pub struct CacheStore {
    redis_pool: Arc<Pool>,
    op_timeout: Duration,
}

impl CacheStore {
    pub fn new(redis_pool: Pool, op_timeout: Duration) -> Self {
        Self {
            redis_pool: Arc::new(redis_pool),
            op_timeout,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout(self.op_timeout.as_millis() as u64))?
    }

    async fn get_conn(&self) -> Result<Connection, CacheError> {
        Ok(self.redis_pool.get().await?)
    }

    /// `HGETALL`; an absent key comes back as `None`.
    pub async fn get_hash(&self, key: &str) -> Result<Option<HashMap<String, String>>, CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let fields: HashMap<String, String> =
                redis::cmd("HGETALL").arg(key).query_async(&mut conn).await?;

            if fields.is_empty() {
                debug!("Cache miss for key: {key}");
                Ok(None)
            } else {
                Ok(Some(fields))
            }
        })
        .await
    }

    /// Replaces the hash at `key` and sets its TTL in one transaction.
    pub async fn set_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;

            redis::pipe()
                .atomic()
                .cmd("DEL")
                .arg(key)
                .ignore()
                .cmd("HSET")
                .arg(key)
                .arg(fields)
                .ignore()
                .cmd("EXPIRE")
                .arg(key)
                .arg(ttl.as_secs())
                .ignore()
                .query_async::<()>(&mut conn)
                .await?;

            debug!("Cached key '{}' with TTL {:?}", key, ttl);
            Ok(())
        })
        .await
    }

    /// `INCR` on a fixed-window counter. The TTL is set by the hit that
    /// opens the window.
    pub async fn incr_window(&self, key: &str, window: Duration) -> Result<u64, CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let count: u64 = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;

            if count == 1 {
                redis::cmd("EXPIRE")
                    .arg(key)
                    .arg(window.as_secs().max(1))
                    .query_async::<()>(&mut conn)
                    .await?;
            }

            Ok(count)
        })
        .await
    }

    /// `DEL`; returns whether a key was actually removed.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let removed: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;

            Ok(removed > 0)
        })
        .await
    }
}
