//! Synchronized statistics store.
//!
//! All mutation goes through [`StatsStore`], which owns the [`StatsState`]
//! behind a single mutex. Persistence happens while the lock is held, so the
//! file on disk always reflects a complete state and concurrent writers can
//! never interleave a reset with a record. Async callers go through
//! [`StatsStore::run_blocking`] so the file write never lands on a runtime
//! worker.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::domain::stats::merge;
use crate::domain::{
    Channel, Detection, HistoryEntry, MessageHandle, StatsReport, StatsState,
};
use crate::port::outbound::store::StateStore;

/// Tunables for the statistics store.
#[derive(Debug, Clone)]
pub struct StatsSettings {
    /// History entries kept, most recent first.
    pub max_history: usize,
    /// Time between automatic resets.
    pub reset_interval: Duration,
    /// Place id stamped on history entries and alerts.
    pub place_id: String,
}

pub struct StatsStore {
    state: Mutex<StatsState>,
    store: Arc<dyn StateStore>,
    settings: StatsSettings,
}

impl StatsStore {
    /// Create an empty store whose reset clock starts now.
    pub fn new(store: Arc<dyn StateStore>, settings: StatsSettings) -> Self {
        Self {
            state: Mutex::new(StatsState::new(Utc::now())),
            store,
            settings,
        }
    }

    /// Merge the durable snapshot into memory.
    ///
    /// A missing or unreadable snapshot leaves the in-memory state untouched.
    pub fn restore(&self) {
        let disk = match self.store.load_stats() {
            Ok(Some(disk)) => disk,
            Ok(None) => {
                info!("No stats snapshot found, starting fresh");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load stats snapshot, starting fresh");
                return;
            }
        };

        let mut state = self.state.lock();
        let current = std::mem::replace(&mut *state, StatsState::new(Utc::now()));
        *state = merge(disk, current, self.settings.max_history);
        info!(
            names = state.names.len(),
            history = state.history.len(),
            last_reset = %state.last_reset,
            "Stats restored"
        );
    }

    #[must_use]
    pub fn place_id(&self) -> &str {
        &self.settings.place_id
    }

    /// Run `op` against the store on the blocking pool.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, op: F) -> Result<T, JoinError>
    where
        F: FnOnce(&StatsStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let stats = Arc::clone(self);
        tokio::task::spawn_blocking(move || op(&stats)).await
    }

    pub fn record(&self, detection: &Detection) {
        self.record_at(detection, Utc::now());
    }

    /// Count a detection, push it onto the history, and persist.
    pub fn record_at(&self, detection: &Detection, now: DateTime<Utc>) {
        let entry = HistoryEntry::from_detection(detection, &self.settings.place_id, now);
        let mut state = self.state.lock();
        state.record(entry, self.settings.max_history);
        debug!(
            name = %detection.name,
            count = state.names.get(&detection.name).copied().unwrap_or(0),
            "Detection recorded"
        );
        self.persist_locked(&state);
    }

    /// Route a parsed value, persisting immediately when the rotation moved.
    pub fn route(&self, value: f64) -> Option<Channel> {
        let mut state = self.state.lock();
        let before = state.router;
        let channel = state.router.route(value);
        if state.router != before {
            self.persist_locked(&state);
        }
        channel
    }

    #[must_use]
    pub fn report(&self) -> StatsReport {
        self.report_at(Utc::now())
    }

    #[must_use]
    pub fn report_at(&self, now: DateTime<Utc>) -> StatsReport {
        self.state.lock().report(now, self.settings.reset_interval)
    }

    pub fn reset(&self) {
        self.reset_at(Utc::now());
    }

    /// Clear counters and history, then persist.
    pub fn reset_at(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock();
        state.reset(now);
        info!(last_reset = %state.last_reset, "Stats reset");
        self.persist_locked(&state);
    }

    /// Reset when the interval has elapsed. Returns whether a reset happened.
    pub fn reset_if_due(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.state.lock();
        if !state.is_reset_due(now, self.settings.reset_interval) {
            return false;
        }
        state.reset(now);
        info!(last_reset = %state.last_reset, "Scheduled stats reset");
        self.persist_locked(&state);
        true
    }

    /// History, most recent first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.iter().cloned().collect()
    }

    #[must_use]
    pub fn message_handle(&self) -> Option<MessageHandle> {
        self.state.lock().stats_message_id
    }

    pub fn set_message_handle(&self, handle: MessageHandle) {
        let mut state = self.state.lock();
        if state.stats_message_id == Some(handle) {
            return;
        }
        state.stats_message_id = Some(handle);
        self.persist_locked(&state);
    }

    /// Copy of the whole state.
    #[must_use]
    pub fn state(&self) -> StatsState {
        self.state.lock().clone()
    }

    fn persist_locked(&self, state: &StatsState) {
        if let Err(e) = self.store.save_stats(&state.to_persisted()) {
            warn!(error = %e, "Failed to persist stats, keeping in-memory state");
        }
    }
}

/// Spawn the level-triggered reset check.
pub fn start_reset_loop(
    stats: Arc<StatsStore>,
    tick: StdDuration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = stats.run_blocking(|s| s.reset_if_due(Utc::now())).await {
                        error!(error = %e, "Reset check task failed");
                    }
                }
            }
        }
        info!("Reset loop stopped");
    })
}
