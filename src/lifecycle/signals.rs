//! OS signal handling.

/// Resolve once the process receives Ctrl-C / SIGINT.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received, shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for interrupt signal");
            std::future::pending::<()>().await;
        }
    }
}
