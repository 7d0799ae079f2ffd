use crate::abstract_trait::OrderWorkerTrait;
use async_trait::async_trait;
use std::{
    collections::{HashSet, VecDeque},
    sync::Mutex,
    time::Duration,
};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_DEDUP_CAPACITY: usize = 10_000;

/// Ids in flight plus the most recent `capacity` finished ids, oldest evicted
/// first.
struct Ledger {
    in_flight: HashSet<Uuid>,
    processed: HashSet<Uuid>,
    recent: VecDeque<Uuid>,
    capacity: usize,
}

impl Ledger {
    fn new(capacity: usize) -> Self {
        Self {
            in_flight: HashSet::new(),
            processed: HashSet::new(),
            recent: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn remember(&mut self, order_id: Uuid) {
        if !self.processed.insert(order_id) {
            return;
        }

        self.recent.push_back(order_id);
        while self.recent.len() > self.capacity {
            if let Some(evicted) = self.recent.pop_front() {
                self.processed.remove(&evicted);
            }
        }
    }
}

/// Stand-in for the post-order step. It holds each order for a fixed delay
/// and remembers recently finished ids so redeliveries are skipped.
pub struct OrderProcessor {
    delay: Duration,
    ledger: Mutex<Ledger>,
}

impl OrderProcessor {
    pub fn new(delay: Duration) -> Self {
        Self::with_capacity(delay, DEFAULT_DEDUP_CAPACITY)
    }

    pub fn with_capacity(delay: Duration, capacity: usize) -> Self {
        Self {
            delay,
            ledger: Mutex::new(Ledger::new(capacity)),
        }
    }

    pub fn processed_count(&self) -> usize {
        self.ledger
            .lock()
            .map(|ledger| ledger.processed.len())
            .unwrap_or_default()
    }

    pub fn is_processed(&self, order_id: Uuid) -> bool {
        self.ledger
            .lock()
            .map(|ledger| ledger.processed.contains(&order_id))
            .unwrap_or(false)
    }

    /// Claims the id; `false` when it is already running or done.
    fn claim(&self, order_id: Uuid) -> bool {
        let Ok(mut ledger) = self.ledger.lock() else {
            return false;
        };

        if ledger.processed.contains(&order_id) {
            return false;
        }

        ledger.in_flight.insert(order_id)
    }

    fn finish(&self, order_id: Uuid) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.in_flight.remove(&order_id);
            ledger.remember(order_id);
        }
    }
}

#[async_trait]
impl OrderWorkerTrait for OrderProcessor {
    async fn process_order(&self, order_id: Uuid) {
        if !self.claim(order_id) {
            debug!("⏭️ Order {order_id} already handled, skipping redelivery");
            return;
        }

        info!("⚙️ Processing order {order_id}");
        tokio::time::sleep(self.delay).await;
        self.finish(order_id);
        info!("✅ Order {order_id} processed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn processes_after_the_configured_delay() {
        let processor = OrderProcessor::new(Duration::from_secs(2));
        let id = Uuid::new_v4();

        let started = tokio::time::Instant::now();
        processor.process_order(id).await;

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(processor.is_processed(id));
    }

    #[tokio::test(start_paused = true)]
    async fn redelivery_after_completion_is_skipped() {
        let processor = OrderProcessor::new(Duration::from_secs(2));
        let id = Uuid::new_v4();

        processor.process_order(id).await;
        let started = tokio::time::Instant::now();
        processor.process_order(id).await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(processor.processed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ledger_keeps_only_the_most_recent_ids() {
        let processor = OrderProcessor::with_capacity(Duration::ZERO, 3);
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        for id in &ids {
            processor.process_order(*id).await;
        }

        assert_eq!(processor.processed_count(), 3);
        assert!(!processor.is_processed(ids[0]));
        assert!(!processor.is_processed(ids[1]));
        assert!(ids[2..].iter().all(|id| processor.is_processed(*id)));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_duplicates_run_once() {
        let processor = Arc::new(OrderProcessor::new(Duration::from_millis(500)));
        let id = Uuid::new_v4();

        let a = tokio::spawn({
            let p = processor.clone();
            async move { p.process_order(id).await }
        });
        let b = tokio::spawn({
            let p = processor.clone();
            async move { p.process_order(id).await }
        });
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(processor.processed_count(), 1);
    }
}
