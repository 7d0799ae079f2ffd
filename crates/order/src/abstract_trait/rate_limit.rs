use async_trait::async_trait;
use shared::errors::CacheError;
use std::{sync::Arc, time::Duration};

pub type DynRateLimitStore = Arc<dyn RateLimitStoreTrait + Send + Sync>;

#[async_trait]
pub trait RateLimitStoreTrait {
    /// Counts one request from `client` and returns how many it has made in
    /// the current window, this one included.
    async fn hit(&self, client: &str, window: Duration) -> Result<u64, CacheError>;
}
