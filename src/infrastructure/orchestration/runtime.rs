//! Orchestrator runtime lifecycle.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapter::inbound::http::{self, HttpState};
use crate::application::pool::JobIdPool;
use crate::application::stats::{start_reset_loop, StatsStore};
use crate::domain::ProxyPool;
use crate::error::Result;
use crate::infrastructure::bootstrap::{
    build_detection_service, build_notifier, build_poll_cycle, build_service_info,
    build_state_store, build_stats_store, seed_pool,
};
use crate::infrastructure::config::settings::Config;

/// Main application orchestrator.
pub struct Orchestrator;

impl Orchestrator {
    /// Run with an externally controlled shutdown signal.
    ///
    /// Returns once the HTTP server has drained and every loop has stopped.
    pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            game_id = %config.listing.game_id,
            proxies = config.listing.proxies.len(),
            "Starting jobwatch"
        );

        let proxies = Arc::new(ProxyPool::new(&config.listing.proxies));
        if proxies.is_empty() {
            warn!("No proxies configured, listing requests go direct");
        }

        let store = build_state_store(&config);
        let pool = Arc::new(JobIdPool::new());
        seed_pool(&pool, store.as_ref());
        let stats = build_stats_store(&config, Arc::clone(&store));

        let notifier = build_notifier(&config)?;
        let detections = build_detection_service(Arc::clone(&stats), notifier);

        let poll = build_poll_cycle(&config, Arc::clone(&proxies), Arc::clone(&pool), store)?;
        let mut loops: Vec<JoinHandle<()>> = vec![
            poll.start(shutdown.clone()),
            start_reset_loop(
                Arc::clone(&stats),
                config.stats.reset_check(),
                shutdown.clone(),
            ),
        ];

        let listener = start_telegram(&config, &stats, &shutdown, &mut loops);

        let state = HttpState {
            pool,
            stats,
            detections,
            info: Arc::new(build_service_info(&config, &proxies)),
        };
        let served = http::serve(config.server.socket_addr(), state, shutdown).await;

        if let Some(listener) = listener {
            listener.abort();
        }
        if served.is_err() {
            // The server never ran, so nobody will signal the loops.
            for handle in &loops {
                handle.abort();
            }
        }
        for handle in loops {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Background loop panicked");
                }
            }
        }
        info!("Shutdown complete");
        served
    }
}

/// Start the snapshot loop and the command listener when the bot is
/// configured. Returns the listener handle, which has no shutdown hook of its
/// own and must be aborted.
#[cfg(feature = "telegram")]
fn start_telegram(
    config: &Config,
    stats: &Arc<StatsStore>,
    shutdown: &watch::Receiver<bool>,
    loops: &mut Vec<JoinHandle<()>>,
) -> Option<JoinHandle<()>> {
    use crate::adapter::outbound::telegram::{run_command_listener, TelegramControl, TelegramSink};
    use crate::application::snapshot::SnapshotPublisher;
    use crate::infrastructure::bootstrap::build_telegram;

    let (bot, chat_id) = build_telegram(config)?;

    let sink = Arc::new(TelegramSink::new(bot.clone(), chat_id));
    let publisher = SnapshotPublisher::new(
        sink,
        Arc::clone(stats),
        config.stats.snapshot_settings(),
    );
    loops.push(publisher.start(shutdown.clone()));

    let control = TelegramControl::new(Arc::clone(stats));
    Some(tokio::spawn(run_command_listener(bot, chat_id, control)))
}

#[cfg(not(feature = "telegram"))]
fn start_telegram(
    config: &Config,
    _stats: &Arc<StatsStore>,
    _shutdown: &watch::Receiver<bool>,
    _loops: &mut Vec<JoinHandle<()>>,
) -> Option<JoinHandle<()>> {
    if config.telegram.credentials().is_some() {
        warn!("Telegram configured but the `telegram` feature is disabled");
    }
    None
}
