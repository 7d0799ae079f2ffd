use crate::{
    abstract_trait::DynOrderWorker, config::WorkerConfig, dispatcher::EventDispatcher,
    kafka::KafkaEventConsumer, processor::OrderProcessor,
};
use anyhow::{Context, Result};
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

pub struct WorkerApp {
    config: WorkerConfig,
    dispatcher: Arc<EventDispatcher>,
}

impl WorkerApp {
    pub fn new(config: WorkerConfig) -> Self {
        let worker = Arc::new(OrderProcessor::with_capacity(
            config.processing_delay,
            config.dedup_capacity,
        )) as DynOrderWorker;
        let dispatcher = Arc::new(EventDispatcher::new(worker, config.concurrency));

        Self { config, dispatcher }
    }

    /// Consumes until Ctrl+C/SIGTERM, then drains in-flight work.
    pub async fn run(self) -> Result<()> {
        let consumer = KafkaEventConsumer::new(
            &self.config.kafka_broker,
            &self.config.consumer_group,
            self.dispatcher.clone(),
        )?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let topic = self.config.kafka_topic.clone();

        let mut consumer_handle =
            tokio::spawn(async move { consumer.start_with_shutdown(&topic, shutdown_rx).await });

        info!(
            "🚀 Order worker running (group={}, concurrency={})",
            self.config.consumer_group, self.config.concurrency
        );

        let stopped_early = tokio::select! {
            _ = shutdown_signal() => None,
            result = &mut consumer_handle => Some(result),
        };

        let consumer_result = match stopped_early {
            Some(result) => result,
            None => {
                if shutdown_tx.send(()).is_err() {
                    warn!("Kafka consumer already stopped");
                }
                consumer_handle.await
            }
        };

        if let Err(e) = consumer_result.context("Kafka consumer task panicked")? {
            error!("❌ Kafka consumer exited with error: {e:#}");
        }

        let aborted = self.dispatcher.drain(self.config.drain_timeout).await;
        if aborted > 0 {
            warn!("⚠️ {aborted} orders were interrupted mid-processing");
        }

        Ok(())
    }
}
