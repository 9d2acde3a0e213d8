//! Alert webhook configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::webhook::{ChannelWebhooks, EmbedStyle, WEBHOOK_TIMEOUT};

const fn default_timeout_secs() -> u64 {
    WEBHOOK_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Low tier, first rotation slot.
    #[serde(default)]
    pub webhook_a1: Option<String>,
    /// Low tier, second rotation slot.
    #[serde(default)]
    pub webhook_a2: Option<String>,
    #[serde(default)]
    pub webhook_b: Option<String>,
    #[serde(default)]
    pub webhook_c: Option<String>,
    /// Defaults to the listing game id.
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub embed_title: Option<String>,
    #[serde(default)]
    pub embed_color: Option<u32>,
    #[serde(default)]
    pub join_url_base: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_a1: None,
            webhook_a2: None,
            webhook_b: None,
            webhook_c: None,
            place_id: None,
            embed_title: None,
            embed_color: None,
            join_url_base: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AlertConfig {
    #[must_use]
    pub fn webhooks(&self) -> ChannelWebhooks {
        ChannelWebhooks {
            rotation_primary: self.webhook_a1.clone(),
            rotation_secondary: self.webhook_a2.clone(),
            mid: self.webhook_b.clone(),
            high: self.webhook_c.clone(),
        }
    }

    #[must_use]
    pub fn embed_style(&self) -> EmbedStyle {
        let defaults = EmbedStyle::default();
        EmbedStyle {
            title: self.embed_title.clone().unwrap_or(defaults.title),
            color: self.embed_color.unwrap_or(defaults.color),
            join_url_base: self.join_url_base.clone().unwrap_or(defaults.join_url_base),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Webhook URLs paired with their variable names, for validation.
    pub(super) fn urls(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("WEBHOOK_A1", self.webhook_a1.as_deref()),
            ("WEBHOOK_A2", self.webhook_a2.as_deref()),
            ("WEBHOOK_B", self.webhook_b.as_deref()),
            ("WEBHOOK_C", self.webhook_c.as_deref()),
        ]
    }
}
