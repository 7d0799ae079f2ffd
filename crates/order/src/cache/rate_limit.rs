use crate::abstract_trait::rate_limit::RateLimitStoreTrait;
use async_trait::async_trait;
use shared::{cache::CacheStore, errors::CacheError};
use std::time::Duration;
use tracing::debug;

pub fn rate_limit_key(client: &str) -> String {
    format!("rate_limit:{client}")
}

/// Fixed-window request counters kept in Redis, one key per client.
#[derive(Clone)]
pub struct RateLimiter {
    store: CacheStore,
}

impl RateLimiter {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RateLimitStoreTrait for RateLimiter {
    async fn hit(&self, client: &str, window: Duration) -> Result<u64, CacheError> {
        let key = rate_limit_key(client);
        let count = self.store.incr_window(&key, window).await?;

        debug!("Rate limit counter {key} = {count}");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespaced_per_client() {
        assert_eq!(rate_limit_key("10.0.0.7"), "rate_limit:10.0.0.7");
    }
}
