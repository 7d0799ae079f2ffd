use crate::abstract_trait::DynOrderWorker;
use shared::domain::event::OrderEvent;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{
    sync::{Mutex, Semaphore},
    task::JoinSet,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const NEW_ORDER: &str = "new_order";

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("empty message payload")]
    Empty,

    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("unknown event kind: {0}")]
    UnknownKind(String),

    #[error("malformed new_order event: {0}")]
    Malformed(String),
}

/// Turns a raw message payload into an order event.
pub fn decode(payload: Option<&[u8]>) -> Result<OrderEvent, DecodeError> {
    let payload = match payload {
        Some(p) if !p.is_empty() => p,
        _ => return Err(DecodeError::Empty),
    };

    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    match value.get("event").and_then(|kind| kind.as_str()) {
        Some(NEW_ORDER) => {}
        Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
        None => return Err(DecodeError::UnknownKind("<missing>".to_string())),
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Schedules one worker task per decoded event. At most `concurrency` tasks
/// run the worker at the same time; the rest wait for a permit.
pub struct EventDispatcher {
    worker: DynOrderWorker,
    permits: Arc<Semaphore>,
    tasks: Mutex<JoinSet<()>>,
}

impl EventDispatcher {
    pub fn new(worker: DynOrderWorker, concurrency: usize) -> Self {
        Self {
            worker,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Decodes and schedules; returns the order id that was handed off.
    pub async fn dispatch(&self, payload: Option<&[u8]>) -> Result<Uuid, DecodeError> {
        let event = decode(payload)?;
        let order_id = event.order_id();

        let worker = self.worker.clone();
        let permits = self.permits.clone();

        let mut tasks = self.tasks.lock().await;
        while let Some(finished) = tasks.try_join_next() {
            if let Err(e) = finished {
                error!("❌ Worker task failed: {e}");
            }
        }

        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                warn!("Worker pool closed, dropping order {order_id}");
                return;
            };
            worker.process_order(order_id).await;
        });

        debug!("📨 Scheduled worker for order {order_id}");
        Ok(order_id)
    }

    pub async fn in_flight(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Waits for scheduled tasks, aborting whatever is left after `timeout`.
    /// Returns how many tasks were aborted.
    pub async fn drain(&self, timeout: Duration) -> usize {
        let mut tasks = self.tasks.lock().await;
        let pending = tasks.len();

        if pending == 0 {
            return 0;
        }

        info!("⏳ Waiting for {pending} in-flight worker tasks");

        let waited = tokio::time::timeout(timeout, async {
            while let Some(finished) = tasks.join_next().await {
                if let Err(e) = finished {
                    error!("❌ Worker task failed: {e}");
                }
            }
        })
        .await;

        if waited.is_ok() {
            info!("✅ All worker tasks finished");
            return 0;
        }

        let aborted = tasks.len();
        warn!("⚠️ Drain timed out, aborting {aborted} worker tasks");
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}

        aborted
    }
}
