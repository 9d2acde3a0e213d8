//! Detection statistics: name counters, bounded history, and report building.
//!
//! [`StatsState`] is plain data. Synchronization and persistence live in
//! `application::stats::StatsStore`; everything here is pure and works on an
//! explicit `now` so it can be tested without a clock.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::channel::RouterState;

/// Format used for history timestamps (second precision).
pub const HISTORY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of names shown in a report ranking.
pub const REPORT_TOP_NAMES: usize = 10;

/// Number of recent detections shown in a report.
pub const REPORT_RECENT: usize = 5;

/// A detection accepted from the intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub name: String,
    /// Generation rate exactly as reported (e.g. `$1.5M/s`).
    pub generation: String,
    pub rarity: String,
    pub job_id: String,
}

/// One row of the detection history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub name: String,
    pub generation: String,
    pub rarity: String,
    #[serde(rename = "placeId")]
    pub place_id: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn from_detection(detection: &Detection, place_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.format(HISTORY_TIME_FORMAT).to_string(),
            name: detection.name.clone(),
            generation: detection.generation.clone(),
            rarity: detection.rarity.clone(),
            place_id: place_id.to_string(),
            job_id: detection.job_id.clone(),
        }
    }

    /// Parsed timestamp, if it is in the expected format.
    #[must_use]
    pub fn seen_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, HISTORY_TIME_FORMAT)
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

/// Opaque handle of a published snapshot message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHandle(pub i64);

/// State as read back from durable storage.
///
/// `None` fields were absent from the file and leave the in-memory value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedStats {
    pub names: HashMap<String, u64>,
    pub history: Vec<HistoryEntry>,
    pub last_reset: Option<DateTime<Utc>>,
    pub use_first_channel: Option<bool>,
    pub stats_message_id: Option<MessageHandle>,
}

/// Complete in-memory statistics state.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsState {
    pub names: HashMap<String, u64>,
    /// Most recent first.
    pub history: VecDeque<HistoryEntry>,
    pub last_reset: DateTime<Utc>,
    pub router: RouterState,
    pub stats_message_id: Option<MessageHandle>,
}

impl StatsState {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            names: HashMap::new(),
            history: VecDeque::new(),
            last_reset: now,
            router: RouterState::default(),
            stats_message_id: None,
        }
    }

    /// Count a detection and push it at the head of the history.
    pub fn record(&mut self, entry: HistoryEntry, max_history: usize) {
        *self.names.entry(entry.name.clone()).or_insert(0) += 1;
        self.history.push_front(entry);
        self.history.truncate(max_history);
    }

    /// Clear counters and history. `last_reset` never moves backwards.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.names.clear();
        self.history.clear();
        self.last_reset = self.last_reset.max(now);
    }

    #[must_use]
    pub fn next_reset(&self, interval: Duration) -> DateTime<Utc> {
        self.last_reset + interval
    }

    #[must_use]
    pub fn is_reset_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        now - self.last_reset >= interval
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.names.values().sum()
    }

    /// Export for durable storage.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedStats {
        PersistedStats {
            names: self.names.clone(),
            history: self.history.iter().cloned().collect(),
            last_reset: Some(self.last_reset),
            use_first_channel: Some(self.router.use_first_channel),
            stats_message_id: self.stats_message_id,
        }
    }

    /// Build a report of the current contents.
    #[must_use]
    pub fn report(&self, now: DateTime<Utc>, reset_interval: Duration) -> StatsReport {
        let mut ranking: Vec<(String, u64)> = self
            .names
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        // Ties keep map iteration order, which is unspecified.
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking.truncate(REPORT_TOP_NAMES);

        let recent = self
            .history
            .iter()
            .take(REPORT_RECENT)
            .map(|entry| RecentDetection {
                name: entry.name.clone(),
                generation: entry.generation.clone(),
                seen_at: entry.seen_at(),
                raw_timestamp: entry.timestamp.clone(),
            })
            .collect();

        StatsReport {
            top_names: ranking,
            total: self.total(),
            unique_names: self.names.len(),
            tracked_jobs: self.history.len(),
            recent,
            next_reset: self.next_reset(reset_interval),
            generated_at: now,
        }
    }
}

/// Merge state read from disk into the in-memory state.
///
/// Counts from disk overwrite counts for the same name; disk history goes
/// after the in-memory history and the result is trimmed to `max_history`.
#[must_use]
pub fn merge(disk: PersistedStats, mut memory: StatsState, max_history: usize) -> StatsState {
    memory.names.extend(disk.names);
    memory.history.extend(disk.history);
    memory.history.truncate(max_history);
    if let Some(last_reset) = disk.last_reset {
        memory.last_reset = last_reset;
    }
    if let Some(use_first_channel) = disk.use_first_channel {
        memory.router.use_first_channel = use_first_channel;
    }
    if disk.stats_message_id.is_some() {
        memory.stats_message_id = disk.stats_message_id;
    }
    memory
}

/// A recent detection as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDetection {
    pub name: String,
    pub generation: String,
    /// `None` when the stored timestamp could not be parsed.
    pub seen_at: Option<DateTime<Utc>>,
    pub raw_timestamp: String,
}

/// Point-in-time summary of the statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    /// Up to ten names, highest count first.
    pub top_names: Vec<(String, u64)>,
    pub total: u64,
    pub unique_names: usize,
    pub tracked_jobs: usize,
    /// Up to five entries, most recent first.
    pub recent: Vec<RecentDetection>,
    pub next_reset: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

impl StatsReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_names.is_empty()
    }
}
