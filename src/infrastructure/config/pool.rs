//! Poll cycle and downstream aggregator configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::poll::PollSettings;
use crate::domain::PlayerRange;

const fn default_send_interval_secs() -> u64 {
    30
}

const fn default_send_min_servers() -> usize {
    1
}

const fn default_max_players() -> u32 {
    999
}

fn default_pool_file() -> String {
    "pool.json".to_string()
}

const fn default_publish_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Aggregator endpoint receiving `{servers: [...]}`.
    #[serde(default)]
    pub target_api: Option<String>,
    #[serde(default = "default_send_interval_secs")]
    pub send_interval_secs: u64,
    #[serde(default = "default_send_min_servers")]
    pub send_min_servers: usize,
    #[serde(default)]
    pub min_players: u32,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    #[serde(default = "default_pool_file")]
    pub pool_file: String,
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            target_api: None,
            send_interval_secs: default_send_interval_secs(),
            send_min_servers: default_send_min_servers(),
            min_players: 0,
            max_players: default_max_players(),
            pool_file: default_pool_file(),
            publish_timeout_secs: default_publish_timeout_secs(),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn range(&self) -> PlayerRange {
        PlayerRange::new(self.min_players, self.max_players)
    }

    #[must_use]
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }

    #[must_use]
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            range: self.range(),
            send_min_servers: self.send_min_servers,
            interval: Duration::from_secs(self.send_interval_secs),
        }
    }
}
