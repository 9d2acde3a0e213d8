//! The poll cycle: fetch, filter, replace the pool, persist, publish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::fetcher::PaginatedFetcher;
use super::pool::JobIdPool;
use super::shutdown::{sleep_or_shutdown, wait_for_shutdown};
use crate::domain::{filter_job_ids, PlayerRange};
use crate::port::outbound::publisher::PoolPublisher;
use crate::port::outbound::store::StateStore;

/// Tunables for the poll cycle.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub range: PlayerRange,
    /// Pools smaller than this are kept locally but not pushed downstream.
    pub send_min_servers: usize,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Nothing was fetched; pool and downstream left untouched.
    NoServers,
    /// Pool replaced but too small to push.
    BelowMinimum { count: usize },
    /// Pool replaced and accepted downstream.
    Published {
        count: usize,
        added: Option<serde_json::Value>,
    },
    /// Pool replaced but the downstream push failed.
    PublishFailed { count: usize },
    /// Pool replaced; no downstream is configured.
    Unpublished { count: usize },
}

pub struct PollCycle {
    fetcher: PaginatedFetcher,
    pool: Arc<JobIdPool>,
    store: Arc<dyn StateStore>,
    publisher: Option<Arc<dyn PoolPublisher>>,
    settings: PollSettings,
}

impl PollCycle {
    /// Without a publisher the pool is kept and persisted but never pushed.
    pub fn new(
        fetcher: PaginatedFetcher,
        pool: Arc<JobIdPool>,
        store: Arc<dyn StateStore>,
        publisher: Option<Arc<dyn PoolPublisher>>,
        settings: PollSettings,
    ) -> Self {
        Self {
            fetcher,
            pool,
            store,
            publisher,
            settings,
        }
    }

    /// Run one iteration. Every failure is logged and absorbed.
    pub async fn run_once(&self) -> CycleOutcome {
        let report = self.fetcher.fetch_all().await;
        if report.entries.is_empty() {
            warn!(
                failures = report.failures,
                abandoned = report.abandoned,
                "No servers fetched, keeping previous pool"
            );
            return CycleOutcome::NoServers;
        }

        let ids = filter_job_ids(&report.entries, self.settings.range);
        let count = ids.len();
        info!(
            fetched = report.entries.len(),
            matched = count,
            min_players = self.settings.range.min(),
            max_players = self.settings.range.max(),
            "Filtered server list"
        );

        self.pool.replace(ids.clone());
        self.persist_pool(ids.clone()).await;

        if count < self.settings.send_min_servers {
            info!(
                count,
                required = self.settings.send_min_servers,
                "Too few servers to publish"
            );
            return CycleOutcome::BelowMinimum { count };
        }

        let Some(publisher) = &self.publisher else {
            warn!(count, "No downstream configured, pool kept locally");
            return CycleOutcome::Unpublished { count };
        };

        match publisher.publish(&ids).await {
            Ok(receipt) => {
                info!(count, added = ?receipt.added, "Published server pool");
                CycleOutcome::Published {
                    count,
                    added: receipt.added,
                }
            }
            Err(e) => {
                error!(count, error = %e, "Failed to publish server pool");
                CycleOutcome::PublishFailed { count }
            }
        }
    }

    async fn persist_pool(&self, ids: Vec<String>) {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || store.save_pool(&ids)).await {
            Ok(Ok(())) => debug!("Pool snapshot saved"),
            Ok(Err(e)) => warn!(error = %e, "Failed to save pool snapshot"),
            Err(e) => warn!(error = %e, "Pool snapshot task failed"),
        }
    }

    /// Spawn the cycle loop. It stops at the next await point once shutdown
    /// is signalled.
    pub fn start(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.settings.interval.as_secs(),
                "Poll cycle started"
            );
            loop {
                tokio::select! {
                    () = wait_for_shutdown(&mut shutdown) => break,
                    outcome = self.run_once() => debug!(?outcome, "Poll cycle finished"),
                }
                if sleep_or_shutdown(&mut shutdown, self.settings.interval).await {
                    break;
                }
            }
            info!("Poll cycle stopped");
        })
    }
}
