use anyhow::{Context, Result};
use dotenv::dotenv;
use order::{
    config::Config,
    handler::AppRouter,
    state::{AppState, connect_database},
};
use shared::utils::{Telemetry, init_logger};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("order-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    init_logger(
        telemetry.logger_provider(),
        "order-service",
        is_dev,
        is_enable_file,
    );

    let db_pool = connect_database(&config).await?;

    if config.run_migrations {
        info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Migrations completed successfully");
    }

    let state = Arc::new(
        AppState::new(&config, db_pool)
            .await
            .context("Failed to create AppState")?,
    );

    info!("🚀 Order service started successfully");

    let served = AppRouter::serve(config.port, state.clone()).await;

    info!("Shutting down order service...");

    state.shutdown().await;

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    served.context("Server terminated with an error")
}
