use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub type DynKafka = Arc<dyn KafkaTrait + Send + Sync>;

#[async_trait]
pub trait KafkaTrait {
    /// Resolves once the broker has accepted the record, not once it is consumed.
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> Result<(), ServiceError>;

    async fn shutdown(&self);
}
