//! Shutdown signalling shared by the background loops.

use std::time::Duration;

use tokio::sync::watch;

/// Resolve once shutdown is requested or the signal's sender is dropped.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Sleep for `period`; returns `true` if shutdown was requested meanwhile.
pub async fn sleep_or_shutdown(shutdown: &mut watch::Receiver<bool>, period: Duration) -> bool {
    tokio::select! {
        () = wait_for_shutdown(shutdown) => true,
        () = tokio::time::sleep(period) => false,
    }
}
