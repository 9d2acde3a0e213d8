//! On-disk formats for the pool and cache files.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{HistoryEntry, MessageHandle, PersistedStats};

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolFile {
    #[serde(default)]
    pub servers: Vec<String>,
}

/// Cache file. Every field is optional on read so older or hand-edited
/// files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheFile {
    #[serde(default)]
    pub names: HashMap<String, u64>,
    #[serde(default)]
    pub job_history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_first_webhook: Option<bool>,
    #[serde(default)]
    pub stats_message_id: Option<i64>,
}

/// Parse an ISO-8601 timestamp, with or without an offset. Naive values are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<&PersistedStats> for CacheFile {
    fn from(stats: &PersistedStats) -> Self {
        Self {
            names: stats.names.clone(),
            job_history: stats.history.clone(),
            last_reset: stats.last_reset.map(|at| at.to_rfc3339()),
            use_first_webhook: stats.use_first_channel,
            stats_message_id: stats.stats_message_id.map(|handle| handle.0),
        }
    }
}

impl From<CacheFile> for PersistedStats {
    fn from(file: CacheFile) -> Self {
        let last_reset = file.last_reset.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warn!(value = raw, "Ignoring unparseable last_reset");
            }
            parsed
        });

        Self {
            names: file.names,
            history: file.job_history,
            last_reset,
            use_first_channel: file.use_first_webhook,
            stats_message_id: file.stats_message_id.map(MessageHandle),
        }
    }
}
