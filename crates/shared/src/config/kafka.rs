use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaResult;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tokio::sync::OnceCell;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::abstract_trait::KafkaTrait;
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct KafkaProducerConfig {
    pub brokers: String,
    pub publish_timeout: Duration,
}

/// Process-wide producer handle. The underlying client is built on the first
/// publish and reused by every later call until [`KafkaTrait::shutdown`].
pub struct Kafka {
    config: KafkaProducerConfig,
    producer: OnceCell<FutureProducer>,
}

impl Kafka {
    pub fn new(config: KafkaProducerConfig) -> Self {
        Self {
            config,
            producer: OnceCell::new(),
        }
    }

    fn create_producer(&self) -> KafkaResult<FutureProducer> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .set("acks", "1")
            .set("compression.type", "gzip")
            .set(
                "message.timeout.ms",
                self.config.publish_timeout.as_millis().to_string(),
            )
            .set("allow.auto.create.topics", "true")
            .create()?;

        info!("Kafka producer connected successfully");
        Ok(producer)
    }

    async fn producer(&self) -> KafkaResult<&FutureProducer> {
        self.producer
            .get_or_try_init(|| async { self.create_producer() })
            .await
    }

    pub async fn send_message(&self, topic: &str, key: &str, value: &[u8]) -> Result<(), ServiceError> {
        let producer = self.producer().await?;
        let publish_timeout = self.config.publish_timeout;

        let delivery = tokio::time::timeout(
            publish_timeout,
            producer.send(
                FutureRecord::to(topic).key(key).payload(value),
                Timeout::After(publish_timeout),
            ),
        )
        .await
        .map_err(|_| {
            ServiceError::Kafka(format!(
                "publish to {topic} timed out after {}ms",
                publish_timeout.as_millis()
            ))
        })?;

        match delivery {
            Ok(_) => {
                info!(topic, key, "Message sent successfully");
                Ok(())
            }
            Err((kafka_error, _message)) => {
                error!(topic, key, "❌ Kafka delivery failed: {kafka_error}");
                Err(ServiceError::from(kafka_error))
            }
        }
    }
}

#[async_trait]
impl KafkaTrait for Kafka {
    async fn publish(&self, topic: &str, key: &str, value: &[u8]) -> Result<(), ServiceError> {
        self.send_message(topic, key, value).await
    }

    async fn shutdown(&self) {
        let Some(producer) = self.producer.get() else {
            info!("Kafka producer was never started, nothing to flush");
            return;
        };

        match producer.flush(Timeout::After(self.config.publish_timeout)) {
            Ok(()) => info!("Kafka producer flushed and stopped"),
            Err(e) => warn!("⚠️ Kafka producer flush failed on shutdown: {e}"),
        }
    }
}
