//! Upstream listing configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::fetcher::FetchPolicy;

pub const DEFAULT_GAME_ID: &str = "109983668079237";

fn default_game_id() -> String {
    DEFAULT_GAME_ID.to_string()
}

fn default_base_url() -> String {
    "https://games.roblox.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_max_pages_per_cycle() -> u32 {
    10
}

const fn default_retries_per_proxy() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1_000
}

const fn default_page_delay_ms() -> u64 {
    500
}

/// Where and how the server listing is fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_game_id")]
    pub game_id: String,
    /// Listing API origin; the per-game path is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Raw proxy entries (`url`, `host:port`, or `host:port:user:pass`).
    #[serde(default)]
    pub proxies: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_pages_per_cycle")]
    pub max_pages_per_cycle: u32,
    #[serde(default = "default_retries_per_proxy")]
    pub retries_per_proxy: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            game_id: default_game_id(),
            base_url: default_base_url(),
            proxies: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
            max_pages_per_cycle: default_max_pages_per_cycle(),
            retries_per_proxy: default_retries_per_proxy(),
            retry_delay_ms: default_retry_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

impl ListingConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_pages: self.max_pages_per_cycle,
            retries_per_proxy: self.retries_per_proxy,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }
}
