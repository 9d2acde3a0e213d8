//! Handler for the `run` command.

use std::path::Path;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::Orchestrator;

/// Load config, start logging, and run until Ctrl-C.
pub async fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "jobwatch starting");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl-C");
                // Dropping the sender would stop every loop.
                std::future::pending::<()>().await;
            }
        }
        let _ = shutdown_tx.send(true);
    });

    Orchestrator::run_with_shutdown(config, shutdown_rx).await?;
    info!("jobwatch stopped");
    Ok(())
}
