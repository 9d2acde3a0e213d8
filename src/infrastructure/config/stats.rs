//! Statistics and snapshot configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::snapshot::SnapshotSettings;

fn default_cache_file() -> String {
    "cache.json".to_string()
}

const fn default_max_history() -> usize {
    50
}

const fn default_reset_interval_secs() -> u64 {
    86_400
}

const fn default_reset_check_secs() -> u64 {
    60
}

const fn default_snapshot_interval_secs() -> u64 {
    300
}

const fn default_connect_retry_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_reset_interval_secs")]
    pub reset_interval_secs: u64,
    /// How often the reset deadline is checked.
    #[serde(default = "default_reset_check_secs")]
    pub reset_check_secs: u64,
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,
    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache_file: default_cache_file(),
            max_history: default_max_history(),
            reset_interval_secs: default_reset_interval_secs(),
            reset_check_secs: default_reset_check_secs(),
            snapshot_interval_secs: default_snapshot_interval_secs(),
            connect_retry_secs: default_connect_retry_secs(),
        }
    }
}

impl StatsConfig {
    #[must_use]
    pub fn reset_interval(&self) -> chrono::Duration {
        i64::try_from(self.reset_interval_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    #[must_use]
    pub fn reset_check(&self) -> Duration {
        Duration::from_secs(self.reset_check_secs)
    }

    #[must_use]
    pub fn snapshot_settings(&self) -> SnapshotSettings {
        SnapshotSettings {
            interval: Duration::from_secs(self.snapshot_interval_secs),
            connect_retry: Duration::from_secs(self.connect_retry_secs),
        }
    }
}
