use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub kafka_broker: String,
    pub kafka_topic: String,
    pub consumer_group: String,
    pub concurrency: usize,
    pub processing_delay: Duration,
    pub dedup_capacity: usize,
    pub drain_timeout: Duration,
    pub otel_endpoint: String,
}

impl WorkerConfig {
    pub fn init() -> Result<Self> {
        let kafka_broker = std::env::var("KAFKA").context("Missing environment variable: KAFKA")?;
        let kafka_topic =
            std::env::var("KAFKA_TOPIC").unwrap_or_else(|_| "order.created".to_string());
        let consumer_group =
            std::env::var("KAFKA_CONSUMER_GROUP").unwrap_or_else(|_| "order-worker".to_string());

        let concurrency = std::env::var("WORKER_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse::<usize>()
            .context("Unable to parse WORKER_CONCURRENCY as usize")?
            .max(1);

        let delay_ms = std::env::var("WORKER_PROCESSING_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<u64>()
            .context("Unable to parse WORKER_PROCESSING_DELAY_MS as u64")?;

        let dedup_capacity = std::env::var("WORKER_DEDUP_CAPACITY")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<usize>()
            .context("Unable to parse WORKER_DEDUP_CAPACITY as usize")?
            .max(1);

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        Ok(Self {
            kafka_broker,
            kafka_topic,
            consumer_group,
            concurrency,
            processing_delay: Duration::from_millis(delay_ms),
            dedup_capacity,
            drain_timeout: Duration::from_secs(30),
            otel_endpoint,
        })
    }
}
