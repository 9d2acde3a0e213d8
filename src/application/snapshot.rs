//! Periodic stats snapshot, edited in place when possible.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::shutdown::sleep_or_shutdown;
use super::stats::StatsStore;
use crate::domain::MessageHandle;
use crate::port::outbound::snapshot::{SinkError, SnapshotSink};

/// Timing for the snapshot loop.
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    /// Time between refreshes.
    pub interval: Duration,
    /// Pause between failed connection attempts.
    pub connect_retry: Duration,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            connect_retry: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Edited(MessageHandle),
    Published(MessageHandle),
    Failed,
}

pub struct SnapshotPublisher {
    sink: Arc<dyn SnapshotSink>,
    stats: Arc<StatsStore>,
    settings: SnapshotSettings,
}

impl SnapshotPublisher {
    pub fn new(sink: Arc<dyn SnapshotSink>, stats: Arc<StatsStore>, settings: SnapshotSettings) -> Self {
        Self {
            sink,
            stats,
            settings,
        }
    }

    /// Post a fresh snapshot and remember its handle.
    pub async fn publish_new(&self) -> SnapshotOutcome {
        let report = self.stats.report();
        match self.sink.publish(&report).await {
            Ok(handle) => {
                if let Err(e) = self
                    .stats
                    .run_blocking(move |stats| stats.set_message_handle(handle))
                    .await
                {
                    warn!(error = %e, "Failed to store stats message handle");
                }
                info!(message_id = handle.0, "Stats snapshot published");
                SnapshotOutcome::Published(handle)
            }
            Err(e) => {
                warn!(error = %e, "Failed to publish stats snapshot");
                SnapshotOutcome::Failed
            }
        }
    }

    /// Edit the remembered message, falling back to a new one if it is gone.
    pub async fn refresh(&self) -> SnapshotOutcome {
        let Some(handle) = self.stats.message_handle() else {
            return self.publish_new().await;
        };

        let report = self.stats.report();
        match self.sink.edit(handle, &report).await {
            Ok(()) => {
                debug!(message_id = handle.0, "Stats snapshot updated");
                SnapshotOutcome::Edited(handle)
            }
            Err(SinkError::MessageGone) => {
                info!(message_id = handle.0, "Stats message gone, posting a new one");
                self.publish_new().await
            }
            Err(e) => {
                warn!(message_id = handle.0, error = %e, "Failed to update stats snapshot");
                SnapshotOutcome::Failed
            }
        }
    }

    /// Retry the sink connection until it succeeds. Returns `false` if
    /// shutdown was requested first.
    pub async fn connect(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        loop {
            let stopping = *shutdown.borrow();
            if stopping {
                return false;
            }
            match self.sink.connect().await {
                Ok(()) => {
                    info!("Snapshot sink connected");
                    return true;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        retry_secs = self.settings.connect_retry.as_secs(),
                        "Snapshot sink unavailable"
                    );
                }
            }
            if sleep_or_shutdown(shutdown, self.settings.connect_retry).await {
                return false;
            }
        }
    }

    /// Spawn the snapshot loop: connect, publish, then refresh on each tick.
    pub fn start(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if !self.connect(&mut shutdown).await {
                return;
            }
            self.publish_new().await;

            let period = self.settings.interval;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    result = shutdown.changed() => {
                        if result.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        self.refresh().await;
                    }
                }
            }
            info!("Snapshot loop stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::stats::StatsSettings;
    use crate::domain::{PersistedStats, StatsReport};
    use crate::error::Result;
    use crate::port::outbound::store::StateStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;

    struct NoStore;

    impl StateStore for NoStore {
        fn save_pool(&self, _job_ids: &[String]) -> Result<()> {
            Ok(())
        }
        fn load_pool(&self) -> Result<Option<Vec<String>>> {
            Ok(None)
        }
        fn save_stats(&self, _stats: &PersistedStats) -> Result<()> {
            Ok(())
        }
        fn load_stats(&self) -> Result<Option<PersistedStats>> {
            Ok(None)
        }
    }

    /// Store whose first stats write needs a release from another task.
    struct Gated {
        started: Arc<AtomicBool>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
        released: AtomicBool,
    }

    impl StateStore for Gated {
        fn save_pool(&self, _job_ids: &[String]) -> Result<()> {
            Ok(())
        }
        fn load_pool(&self) -> Result<Option<Vec<String>>> {
            Ok(None)
        }
        fn save_stats(&self, _stats: &PersistedStats) -> Result<()> {
            let Some(rx) = self.release.lock().take() else {
                return Ok(());
            };
            self.started.store(true, Ordering::SeqCst);
            let ok = rx.recv_timeout(Duration::from_secs(2)).is_ok();
            self.released.store(ok, Ordering::SeqCst);
            Ok(())
        }
        fn load_stats(&self) -> Result<Option<PersistedStats>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct Sink {
        next_id: Mutex<i64>,
        edit_results: Mutex<VecDeque<std::result::Result<(), SinkError>>>,
        published: Mutex<usize>,
        edits: Mutex<Vec<MessageHandle>>,
    }

    #[async_trait]
    impl SnapshotSink for Sink {
        async fn connect(&self) -> std::result::Result<(), SinkError> {
            Ok(())
        }

        async fn publish(&self, _report: &StatsReport) -> std::result::Result<MessageHandle, SinkError> {
            *self.published.lock() += 1;
            let mut id = self.next_id.lock();
            *id += 1;
            Ok(MessageHandle(*id))
        }

        async fn edit(
            &self,
            handle: MessageHandle,
            _report: &StatsReport,
        ) -> std::result::Result<(), SinkError> {
            self.edits.lock().push(handle);
            self.edit_results.lock().pop_front().unwrap_or(Ok(()))
        }
    }

    fn publisher(sink: Arc<Sink>) -> (SnapshotPublisher, Arc<StatsStore>) {
        let stats = Arc::new(StatsStore::new(
            Arc::new(NoStore),
            StatsSettings {
                max_history: 50,
                reset_interval: chrono::Duration::days(1),
                place_id: "place".into(),
            },
        ));
        let publisher = SnapshotPublisher::new(sink, Arc::clone(&stats), SnapshotSettings::default());
        (publisher, stats)
    }

    #[tokio::test]
    async fn handle_is_saved_off_runtime() {
        let (tx, rx) = mpsc::channel();
        let started = Arc::new(AtomicBool::new(false));
        let gate = Arc::new(Gated {
            started: Arc::clone(&started),
            release: Mutex::new(Some(rx)),
            released: AtomicBool::new(false),
        });
        tokio::spawn(async move {
            while !started.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            let _ = tx.send(());
        });
        let stats = Arc::new(StatsStore::new(
            Arc::clone(&gate) as Arc<dyn StateStore>,
            StatsSettings {
                max_history: 50,
                reset_interval: chrono::Duration::days(1),
                place_id: "place".into(),
            },
        ));
        let publisher = SnapshotPublisher::new(
            Arc::new(Sink::default()),
            Arc::clone(&stats),
            SnapshotSettings::default(),
        );

        assert_eq!(publisher.publish_new().await, SnapshotOutcome::Published(MessageHandle(1)));
        assert!(gate.released.load(Ordering::SeqCst));
        assert_eq!(stats.message_handle(), Some(MessageHandle(1)));
    }

    #[tokio::test]
    async fn refresh_without_handle_publishes() {
        let sink = Arc::new(Sink::default());
        let (publisher, stats) = publisher(Arc::clone(&sink));

        assert_eq!(publisher.refresh().await, SnapshotOutcome::Published(MessageHandle(1)));
        assert_eq!(stats.message_handle(), Some(MessageHandle(1)));
    }

    #[tokio::test]
    async fn refresh_edits_in_place() {
        let sink = Arc::new(Sink::default());
        let (publisher, _stats) = publisher(Arc::clone(&sink));
        publisher.publish_new().await;

        assert_eq!(publisher.refresh().await, SnapshotOutcome::Edited(MessageHandle(1)));
        assert_eq!(*sink.published.lock(), 1);
    }

    #[tokio::test]
    async fn gone_message_is_replaced() {
        let sink = Arc::new(Sink::default());
        sink.edit_results.lock().push_back(Err(SinkError::MessageGone));
        let (publisher, stats) = publisher(Arc::clone(&sink));
        publisher.publish_new().await;

        assert_eq!(publisher.refresh().await, SnapshotOutcome::Published(MessageHandle(2)));
        assert_eq!(stats.message_handle(), Some(MessageHandle(2)));
    }

    #[tokio::test]
    async fn transient_edit_failure_keeps_handle() {
        let sink = Arc::new(Sink::default());
        sink.edit_results
            .lock()
            .push_back(Err(SinkError::Transport("timeout".into())));
        let (publisher, stats) = publisher(Arc::clone(&sink));
        publisher.publish_new().await;

        assert_eq!(publisher.refresh().await, SnapshotOutcome::Failed);
        assert_eq!(stats.message_handle(), Some(MessageHandle(1)));
        assert_eq!(*sink.published.lock(), 1);
    }
}
