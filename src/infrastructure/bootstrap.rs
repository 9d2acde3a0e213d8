//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::inbound::http::ServiceInfo;
use crate::adapter::outbound::file::JsonFileStore;
use crate::adapter::outbound::listing::{listing_url, HttpServerListing};
use crate::adapter::outbound::publisher::HttpPoolPublisher;
use crate::adapter::outbound::webhook::WebhookNotifier;
use crate::application::detection::DetectionService;
use crate::application::fetcher::PaginatedFetcher;
use crate::application::poll::PollCycle;
use crate::application::pool::JobIdPool;
use crate::application::stats::{StatsSettings, StatsStore};
use crate::domain::ProxyPool;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, Notifier};
use crate::port::outbound::publisher::PoolPublisher;
use crate::port::outbound::store::StateStore;

/// Build the JSON file store backing both the pool and the stats snapshot.
pub(crate) fn build_state_store(config: &Config) -> Arc<dyn StateStore> {
    Arc::new(JsonFileStore::new(
        &config.pool.pool_file,
        &config.stats.cache_file,
    ))
}

/// Seed the shared pool from the last persisted snapshot.
pub(crate) fn seed_pool(pool: &JobIdPool, store: &dyn StateStore) {
    match store.load_pool() {
        Ok(Some(ids)) => {
            info!(count = ids.len(), "Pool restored from disk");
            pool.replace(ids);
        }
        Ok(None) => info!("No pool snapshot found"),
        Err(e) => warn!(error = %e, "Failed to load pool snapshot"),
    }
}

/// Build the stats store and merge in whatever was persisted.
pub(crate) fn build_stats_store(config: &Config, store: Arc<dyn StateStore>) -> Arc<StatsStore> {
    let stats = Arc::new(StatsStore::new(
        store,
        StatsSettings {
            max_history: config.stats.max_history,
            reset_interval: config.stats.reset_interval(),
            place_id: config.place_id().to_string(),
        },
    ));
    stats.restore();
    stats
}

/// Build the poll cycle: listing client, fetcher and, when configured, the
/// downstream publisher.
pub(crate) fn build_poll_cycle(
    config: &Config,
    proxies: Arc<ProxyPool>,
    pool: Arc<JobIdPool>,
    store: Arc<dyn StateStore>,
) -> Result<PollCycle> {
    let endpoint = listing_url(&config.listing.base_url, &config.listing.game_id)?;
    let listing = HttpServerListing::new(endpoint, &proxies, config.listing.request_timeout())?;
    let fetcher = PaginatedFetcher::new(Arc::new(listing), proxies, config.listing.fetch_policy());
    let publisher: Option<Arc<dyn PoolPublisher>> = match config.target_api() {
        Some(target) => Some(Arc::new(HttpPoolPublisher::new(
            target,
            config.pool.publish_timeout(),
        )?)),
        None => {
            warn!("MAIN_API_URL not set, pool will not be pushed downstream");
            None
        }
    };

    Ok(PollCycle::new(
        fetcher,
        pool,
        store,
        publisher,
        config.pool.poll_settings(),
    ))
}

/// Build the alert notifier. Falls back to logging when no webhook is set.
///
/// Must be called inside a Tokio runtime.
pub(crate) fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    let webhooks = config.alerts.webhooks();
    if webhooks.configured() == 0 {
        warn!("No alert webhooks configured, detections will only be logged");
        return Ok(Arc::new(LogNotifier));
    }
    let notifier = WebhookNotifier::new(
        webhooks,
        config.alerts.embed_style(),
        config.alerts.timeout(),
    )?;
    Ok(Arc::new(notifier))
}

pub(crate) fn build_detection_service(
    stats: Arc<StatsStore>,
    notifier: Arc<dyn Notifier>,
) -> Arc<DetectionService> {
    Arc::new(DetectionService::new(stats, notifier))
}

/// Static information served at `GET /`.
pub(crate) fn build_service_info(config: &Config, proxies: &ProxyPool) -> ServiceInfo {
    ServiceInfo {
        status: "running",
        proxy_count: proxies.len(),
        game_id: config.listing.game_id.clone(),
        target_api: config.target_api().map(str::to_string),
        send_min_servers: config.pool.send_min_servers,
        max_pages_per_cycle: config.listing.max_pages_per_cycle,
        min_players: config.pool.min_players,
        max_players: config.pool.max_players,
    }
}

/// Telegram bot and chat, when both credentials are configured.
#[cfg(feature = "telegram")]
pub(crate) fn build_telegram(config: &Config) -> Option<(teloxide::Bot, i64)> {
    match config.telegram.credentials() {
        Some((token, chat_id)) => {
            info!(chat_id, "Telegram bot enabled");
            Some((teloxide::Bot::new(token), chat_id))
        }
        None => {
            warn!("BOT_TOKEN or STATS_CHAT_ID not set, Telegram bot disabled");
            None
        }
    }
}
