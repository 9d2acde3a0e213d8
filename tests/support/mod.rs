#![allow(dead_code)]

//! Shared fakes for integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use jobwatch::domain::{
    Channel, Detection, MessageHandle, PersistedStats, ProxyEndpoint, ServerEntry, StatsReport,
};
use jobwatch::error::Result;
use jobwatch::port::{
    Alert, ListingError, Notifier, ServerListing, ServerPage, SinkError, SnapshotSink, StateStore,
};

/// Fixed instant well after any real clock, so resets always move forward.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(4_000_000_000 + secs, 0).unwrap()
}

pub fn detection(name: &str, generation: &str, job_id: &str) -> Detection {
    Detection {
        name: name.to_string(),
        generation: generation.to_string(),
        rarity: "Secret".to_string(),
        job_id: job_id.to_string(),
    }
}

/// `count` servers named `{prefix}-{i}` with player counts cycling 0..=15.
pub fn servers(prefix: &str, count: usize) -> Vec<ServerEntry> {
    (0..count)
        .map(|i| ServerEntry::new(format!("{prefix}-{i}"), (i % 16) as u32))
        .collect()
}

/// Listing that replays a fixed script of responses and records every call.
#[derive(Clone, Default)]
pub struct ScriptedListing {
    script: Arc<Mutex<VecDeque<std::result::Result<ServerPage, ListingError>>>>,
    calls: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

impl ScriptedListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, entries: Vec<ServerEntry>, next: Option<&str>) -> &Self {
        self.script.lock().expect("lock script").push_back(Ok(ServerPage {
            entries,
            next_cursor: next.map(str::to_string),
        }));
        self
    }

    pub fn push_error(&self, error: ListingError) -> &Self {
        self.script
            .lock()
            .expect("lock script")
            .push_back(Err(error));
        self
    }

    /// `(cursor, proxy)` per call, proxies redacted.
    pub fn calls(&self) -> Vec<(Option<String>, Option<String>)> {
        self.calls.lock().expect("lock calls").clone()
    }
}

#[async_trait]
impl ServerListing for ScriptedListing {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        proxy: Option<&ProxyEndpoint>,
    ) -> std::result::Result<ServerPage, ListingError> {
        self.calls
            .lock()
            .expect("lock calls")
            .push((cursor.map(str::to_string), proxy.map(ProxyEndpoint::redacted)));
        self.script
            .lock()
            .expect("lock script")
            .pop_front()
            .unwrap_or_else(|| Err(ListingError::Transport("script exhausted".into())))
    }
}

/// Thread-safe alert collector.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<(Channel, Alert)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.alerts
            .lock()
            .expect("lock alerts")
            .iter()
            .map(|(channel, _)| *channel)
            .collect()
    }

    pub fn alerts(&self) -> Vec<(Channel, Alert)> {
        self.alerts.lock().expect("lock alerts").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, channel: Channel, alert: Alert) {
        self.alerts
            .lock()
            .expect("lock alerts")
            .push((channel, alert));
    }
}

/// Snapshot sink recording publishes and edits.
///
/// Edits fail with the queued errors first, then succeed.
#[derive(Clone, Default)]
pub struct RecordingSink {
    published: Arc<Mutex<Vec<StatsReport>>>,
    edited: Arc<Mutex<Vec<(MessageHandle, StatsReport)>>>,
    edit_failures: Arc<Mutex<VecDeque<SinkError>>>,
    next_handle: Arc<Mutex<i64>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            next_handle: Arc::new(Mutex::new(100)),
            ..Self::default()
        }
    }

    pub fn fail_next_edit(&self, error: SinkError) {
        self.edit_failures
            .lock()
            .expect("lock failures")
            .push_back(error);
    }

    pub fn published(&self) -> usize {
        self.published.lock().expect("lock published").len()
    }

    pub fn edits(&self) -> Vec<MessageHandle> {
        self.edited
            .lock()
            .expect("lock edited")
            .iter()
            .map(|(handle, _)| *handle)
            .collect()
    }
}

#[async_trait]
impl SnapshotSink for RecordingSink {
    async fn connect(&self) -> std::result::Result<(), SinkError> {
        Ok(())
    }

    async fn publish(&self, report: &StatsReport) -> std::result::Result<MessageHandle, SinkError> {
        self.published
            .lock()
            .expect("lock published")
            .push(report.clone());
        let mut next = self.next_handle.lock().expect("lock handle");
        *next += 1;
        Ok(MessageHandle(*next))
    }

    async fn edit(
        &self,
        handle: MessageHandle,
        report: &StatsReport,
    ) -> std::result::Result<(), SinkError> {
        if let Some(error) = self
            .edit_failures
            .lock()
            .expect("lock failures")
            .pop_front()
        {
            return Err(error);
        }
        self.edited
            .lock()
            .expect("lock edited")
            .push((handle, report.clone()));
        Ok(())
    }
}

/// In-memory state store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pool: Arc<Mutex<Option<Vec<String>>>>,
    stats: Arc<Mutex<Option<PersistedStats>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self) -> Option<Vec<String>> {
        self.pool.lock().expect("lock pool").clone()
    }

    pub fn stats(&self) -> Option<PersistedStats> {
        self.stats.lock().expect("lock stats").clone()
    }
}

impl StateStore for MemoryStore {
    fn save_pool(&self, job_ids: &[String]) -> Result<()> {
        *self.pool.lock().expect("lock pool") = Some(job_ids.to_vec());
        Ok(())
    }

    fn load_pool(&self) -> Result<Option<Vec<String>>> {
        Ok(self.pool())
    }

    fn save_stats(&self, stats: &PersistedStats) -> Result<()> {
        *self.stats.lock().expect("lock stats") = Some(stats.clone());
        Ok(())
    }

    fn load_stats(&self) -> Result<Option<PersistedStats>> {
        Ok(self.stats())
    }
}
