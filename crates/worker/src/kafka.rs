use crate::dispatcher::EventDispatcher;
use anyhow::{Context, Result};
use rdkafka::{
    Message,
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
};
use std::sync::Arc;
use tokio::{
    sync::oneshot,
    time::{Duration, sleep},
};
use tracing::{debug, error, info, warn};

pub struct KafkaEventConsumer {
    consumer: StreamConsumer,
    dispatcher: Arc<EventDispatcher>,
}

impl KafkaEventConsumer {
    pub fn new(brokers: &str, group_id: &str, dispatcher: Arc<EventDispatcher>) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .create()
            .context("Failed to create Kafka consumer")?;

        Ok(Self {
            consumer,
            dispatcher,
        })
    }

    /// Receives until `shutdown_rx` fires. A single bad message never stops
    /// the loop; receive errors back off for five seconds.
    pub async fn start_with_shutdown(
        self,
        topic: &str,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()> {
        self.consumer
            .subscribe(&[topic])
            .with_context(|| format!("Failed to subscribe to {topic}"))?;

        info!("✅ Kafka consumer started, subscribed to {topic}");

        let dispatcher = self.dispatcher;
        let consumer = self.consumer;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("🛑 Kafka consumer received shutdown signal");
                    break;
                }

                message_result = consumer.recv() => {
                    let message = match message_result {
                        Ok(message) => message,
                        Err(e) => {
                            error!("Kafka receive error: {e}");
                            sleep(Duration::from_secs(5)).await;
                            continue;
                        }
                    };

                    let topic = message.topic().to_string();
                    let key = message
                        .key()
                        .and_then(|k| std::str::from_utf8(k).ok())
                        .map(|s| s.to_string());

                    if key.is_none() {
                        warn!(topic, "Message has no key");
                    }

                    match dispatcher.dispatch(message.payload()).await {
                        Ok(order_id) => {
                            if let Some(key) = key.as_deref()
                                && key != order_id.to_string()
                            {
                                warn!(topic, key, %order_id, "Key does not match event order_id");
                            }
                            debug!(topic, %order_id, "Event handed to worker");
                        }
                        Err(e) => {
                            error!(
                                topic,
                                key = ?key,
                                partition = message.partition(),
                                offset = message.offset(),
                                "Dropping undecodable message: {e}"
                            );
                        }
                    }
                }
            }
        }

        info!("Kafka consumer stopped");
        Ok(())
    }
}
