use std::{future::Future, io};
use tokio::signal;
use tracing::{error, info};

/// Waits on a signal future. If the handler cannot be installed the error is
/// logged and this never resolves, so a missing handler cannot trigger shutdown.
async fn wait_for(name: &str, signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        error!("Failed to install {name} handler: {e}");
        std::future::pending::<()>().await;
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = wait_for("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = wait_for("SIGTERM", async {
        let mut sig = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        sig.recv().await;
        Ok::<_, io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Shutdown signal received (Ctrl+C)."),
        _ = terminate => info!("🛑 Shutdown signal received (SIGTERM)."),
    }
}
