//! Fire-and-forget webhook delivery.
//!
//! [`WebhookNotifier::notify`] only enqueues; a background worker posts each
//! alert once with a bounded timeout and logs the result. The queue is
//! bounded and alerts arriving while it is full are dropped with a warning.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::payload::{EmbedStyle, WebhookPayload};
use crate::domain::Channel;
use crate::error::Result;
use crate::port::outbound::notifier::{Alert, Notifier};

/// Default timeout for a single webhook post.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(8);

/// Alerts waiting for the worker before new ones are dropped.
pub const ALERT_QUEUE_CAPACITY: usize = 256;

/// Destination URL per channel. Unset channels are skipped.
#[derive(Debug, Clone, Default)]
pub struct ChannelWebhooks {
    pub rotation_primary: Option<String>,
    pub rotation_secondary: Option<String>,
    pub mid: Option<String>,
    pub high: Option<String>,
}

impl ChannelWebhooks {
    #[must_use]
    pub fn url_for(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::RotationPrimary => self.rotation_primary.as_deref(),
            Channel::RotationSecondary => self.rotation_secondary.as_deref(),
            Channel::Mid => self.mid.as_deref(),
            Channel::High => self.high.as_deref(),
        }
        .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn configured(&self) -> usize {
        [
            Channel::RotationPrimary,
            Channel::RotationSecondary,
            Channel::Mid,
            Channel::High,
        ]
        .into_iter()
        .filter(|channel| self.url_for(*channel).is_some())
        .count()
    }
}

pub struct WebhookNotifier {
    sender: mpsc::Sender<(Channel, Alert)>,
}

impl WebhookNotifier {
    /// Build the notifier and spawn its worker. Must be called inside a Tokio
    /// runtime.
    pub fn new(webhooks: ChannelWebhooks, style: EmbedStyle, timeout: Duration) -> Result<Self> {
        Self::with_capacity(webhooks, style, timeout, ALERT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(
        webhooks: ChannelWebhooks,
        style: EmbedStyle,
        timeout: Duration,
        capacity: usize,
    ) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        info!(channels = webhooks.configured(), "Webhook notifier started");
        tokio::spawn(webhook_worker(http, webhooks, style, receiver));

        Ok(Self { sender })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, channel: Channel, alert: Alert) {
        match self.sender.try_send((channel, alert)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full((channel, alert))) => {
                warn!(channel = %channel, name = %alert.name, "Alert queue full, dropping alert");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Webhook notifier channel closed");
            }
        }
    }
}

async fn webhook_worker(
    http: HttpClient,
    webhooks: ChannelWebhooks,
    style: EmbedStyle,
    mut receiver: mpsc::Receiver<(Channel, Alert)>,
) {
    while let Some((channel, alert)) = receiver.recv().await {
        let Some(url) = webhooks.url_for(channel) else {
            warn!(channel = %channel, name = %alert.name, "No webhook configured for channel");
            continue;
        };

        let payload = WebhookPayload::for_alert(&alert, &style);
        match http.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    channel = %channel,
                    name = %alert.name,
                    generation = %alert.generation,
                    "Webhook delivered"
                );
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                warn!(channel = %channel, status, body = %body, "Webhook rejected");
            }
            Err(e) => {
                // The URL embeds the webhook secret.
                let e = e.without_url();
                error!(channel = %channel, error = %e, "Webhook request failed");
            }
        }
    }

    warn!("Webhook notifier worker shutting down");
}
