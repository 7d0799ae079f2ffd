use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderWorker = Arc<dyn OrderWorkerTrait + Send + Sync>;

/// Long-running step triggered once per order-created event. Delivery is
/// at-least-once, so implementations must tolerate the same id twice.
#[async_trait]
pub trait OrderWorkerTrait {
    async fn process_order(&self, order_id: Uuid);
}
