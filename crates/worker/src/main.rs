use anyhow::{Context, Result};
use dotenv::dotenv;
use shared::utils::{Telemetry, init_logger};
use tracing::{error, info};
use worker::{app::WorkerApp, config::WorkerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = WorkerConfig::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("order-worker", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    init_logger(
        telemetry.logger_provider(),
        "order-worker",
        is_dev,
        is_enable_file,
    );

    let result = WorkerApp::new(config).run().await;

    info!("✅ Order worker shutdown gracefully.");

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    result
}
